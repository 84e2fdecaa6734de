//! Error types for registry parsing and generation.

use thiserror::Error;

/// Errors raised while loading a seed registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry document is not valid JSON.
    #[error("registry is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The registry declares a version this crate does not understand.
    #[error("unsupported registry version {found}; expected {expected}")]
    UnsupportedVersion {
        /// Declared version.
        found: u32,
        /// Version this crate understands.
        expected: u32,
    },
    /// Two seeds share one name.
    #[error("duplicate seed name '{name}'")]
    DuplicateSeed {
        /// The repeated name.
        name: String,
    },
}

/// Errors raised while generating demo data.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A count falls outside the supported range.
    #[error("{field} must be between 1 and {max}, got {value}")]
    CountOutOfRange {
        /// Offending field.
        field: &'static str,
        /// Requested value.
        value: u32,
        /// Upper bound.
        max: u32,
    },
}
