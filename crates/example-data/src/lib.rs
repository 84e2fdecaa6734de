//! Deterministic demo-firm data generation for demonstration purposes.
//!
//! This crate generates believable, reproducible portal data (an admin, a
//! handful of professionals, and client accounts with linked portal logins)
//! from a JSON seed registry. It is deliberately independent of backend
//! domain types to avoid circular dependencies: the backend maps the plain
//! structs here onto its own entities when seeding.
//!
//! # Example
//!
//! ```
//! use example_data::{SeedRegistry, generate_demo_firm};
//!
//! let json = r#"{
//!     "version": 1,
//!     "seeds": [{"name": "dev", "seed": 42, "professionalCount": 2, "clientCount": 3}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed = registry.find_seed("dev").expect("seed exists");
//! let firm = generate_demo_firm(seed).expect("generation succeeds");
//!
//! assert_eq!(firm.professionals.len(), 2);
//! assert_eq!(firm.clients.len(), 3);
//! ```

mod error;
mod firm;
mod generator;
mod registry;

pub use error::{GenerationError, RegistryError};
pub use firm::{DemoClientAccount, DemoFirm, DemoRole, DemoUser};
pub use generator::generate_demo_firm;
pub use registry::{SeedDefinition, SeedRegistry};
