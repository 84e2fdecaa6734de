//! Startup seeding of the in-memory platform with deterministic demo data.
//!
//! Compiled behind the `example-data` feature. Generated credentials are
//! logged at startup so a seeded dev instance can be signed into without
//! digging through the generator.

use example_data::{DemoFirm, DemoRole, GenerationError, RegistryError, SeedRegistry};
use thiserror::Error;
use tracing::info;

use crate::domain::{
    ClientAccount, EmailAddress, IdentityId, RecordId, Role, UserProfile,
};
use crate::outbound::MemoryPlatform;

/// Registry shipped with the backend for local development.
pub const DEV_SEED_REGISTRY: &str = r#"{
    "version": 1,
    "seeds": [
        {"name": "dev", "seed": 42, "professionalCount": 3, "clientCount": 6},
        {"name": "demo-large", "seed": 1729, "professionalCount": 12, "clientCount": 40}
    ]
}"#;

/// Errors raised while seeding the platform.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The registry document failed to parse or validate.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Generation refused the seed definition.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// The requested seed name is not in the registry.
    #[error("seed '{name}' is not defined in the registry")]
    UnknownSeed {
        /// Requested name.
        name: String,
    },
    /// A generated value failed domain validation.
    #[error("generated record is invalid: {message}")]
    InvalidRecord {
        /// Validation failure description.
        message: String,
    },
}

fn invalid(err: impl std::fmt::Display) -> SeedError {
    SeedError::InvalidRecord {
        message: err.to_string(),
    }
}

/// Counts reported after a successful seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Profiles created (admin + professionals + linked users).
    pub profiles: usize,
    /// Client accounts created.
    pub clients: usize,
}

/// Seed the platform from the named recipe in the built-in registry.
pub fn seed_platform(platform: &MemoryPlatform, seed_name: &str) -> Result<SeedReport, SeedError> {
    let registry = SeedRegistry::from_json(DEV_SEED_REGISTRY)?;
    let definition = registry
        .find_seed(seed_name)
        .ok_or_else(|| SeedError::UnknownSeed {
            name: seed_name.to_owned(),
        })?;
    let firm = example_data::generate_demo_firm(definition)?;
    apply_firm(platform, &firm)
}

fn role_of(demo: DemoRole) -> Role {
    match demo {
        DemoRole::Admin => Role::Admin,
        DemoRole::Professional => Role::Professional,
        DemoRole::Client => Role::Client,
    }
}

fn seed_user(
    platform: &MemoryPlatform,
    user: &example_data::DemoUser,
) -> Result<IdentityId, SeedError> {
    let id = IdentityId::new(user.identity_id.as_str()).map_err(invalid)?;
    let email = EmailAddress::parse(&user.email).map_err(invalid)?;
    let now = platform.now();
    platform.seed_profile(UserProfile {
        id: id.clone(),
        email: email.clone(),
        name: user.name.clone(),
        role: role_of(user.role),
        active: true,
        created_at: now,
    });
    platform.register_identity(email.as_str(), user.password.clone(), id.clone());
    Ok(id)
}

fn apply_firm(platform: &MemoryPlatform, firm: &DemoFirm) -> Result<SeedReport, SeedError> {
    let mut profiles = 0_usize;

    seed_user(platform, &firm.admin)?;
    profiles += 1;
    info!(
        email = %firm.admin.email,
        password = %firm.admin.password,
        "seeded admin login"
    );

    let mut professional_ids = Vec::with_capacity(firm.professionals.len());
    for professional in &firm.professionals {
        professional_ids.push(seed_user(platform, professional)?);
        profiles += 1;
    }

    for client in &firm.clients {
        let linked_user_id = match &client.linked_user {
            Some(user) => {
                let id = seed_user(platform, user)?;
                profiles += 1;
                Some(id)
            }
            None => None,
        };
        let assigned = client
            .assigned_professionals
            .iter()
            .filter_map(|index| professional_ids.get(*index).cloned())
            .collect();
        let now = platform.now();
        platform.seed_client(ClientAccount {
            id: RecordId::new(client.id.as_str()).map_err(invalid)?,
            linked_user_id,
            name: client.name.clone(),
            email: Some(EmailAddress::parse(&client.contact_email).map_err(invalid)?),
            assigned_professional_ids: assigned,
            active: true,
            created_at: now,
            updated_at: now,
        });
    }

    Ok(SeedReport {
        profiles,
        clients: firm.clients.len(),
    })
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::ProfileRepository;
    use mockable::DefaultClock;
    use std::sync::Arc;

    #[tokio::test]
    async fn dev_seed_populates_the_platform() {
        let platform = MemoryPlatform::new(Arc::new(DefaultClock));
        let report = seed_platform(&platform, "dev").expect("seeding succeeds");
        assert!(report.profiles >= 4);
        assert_eq!(report.clients, 6);

        let profiles = ProfileRepository::list_all(&platform)
            .await
            .expect("profiles listable");
        assert_eq!(profiles.len(), report.profiles);
        assert!(profiles.iter().any(|p| p.role == Role::Admin));
    }

    #[test]
    fn unknown_seed_names_are_refused() {
        let platform = MemoryPlatform::new(Arc::new(DefaultClock));
        let err = seed_platform(&platform, "nope").expect_err("unknown seed refused");
        assert!(matches!(err, SeedError::UnknownSeed { .. }));
    }
}
