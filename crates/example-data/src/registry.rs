//! JSON seed registry: named, reproducible generation recipes.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

const SUPPORTED_VERSION: u32 = 1;

/// One named generation recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDefinition {
    /// Registry-unique name, e.g. `dev` or `demo-large`.
    pub name: String,
    /// RNG seed; equal seeds produce equal firms.
    pub seed: u64,
    /// Number of professionals to generate.
    pub professional_count: u32,
    /// Number of client accounts to generate.
    pub client_count: u32,
}

/// A versioned collection of seed definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRegistry {
    /// Document version; only version 1 is understood.
    pub version: u32,
    /// Named recipes.
    pub seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parse and validate a registry document.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let registry: Self = serde_json::from_str(json)?;
        if registry.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                found: registry.version,
                expected: SUPPORTED_VERSION,
            });
        }
        let mut seen = std::collections::HashSet::new();
        for seed in &registry.seeds {
            if !seen.insert(seed.name.as_str()) {
                return Err(RegistryError::DuplicateSeed {
                    name: seed.name.clone(),
                });
            }
        }
        Ok(registry)
    }

    /// Find a seed definition by name.
    #[must_use]
    pub fn find_seed(&self, name: &str) -> Option<&SeedDefinition> {
        self.seeds.iter().find(|seed| seed.name == name)
    }
}
