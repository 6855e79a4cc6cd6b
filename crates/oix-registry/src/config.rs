//! Registry configuration, loadable from TOML.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// Configuration for an [`ObjectRegistry`](crate::ObjectRegistry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Number of candidate slots each hash maps to.
    pub probe_count: usize,
}

impl RegistryConfig {
    /// Smallest supported probe count.
    pub const MIN_PROBES: usize = 2;
    /// Largest supported probe count.
    pub const MAX_PROBES: usize = 5;

    /// Check that every value is in range.
    pub fn validate(&self) -> RegistryResult<()> {
        if !(Self::MIN_PROBES..=Self::MAX_PROBES).contains(&self.probe_count) {
            return Err(RegistryError::InvalidConfig(format!(
                "probe_count must be between {} and {}, got {}",
                Self::MIN_PROBES,
                Self::MAX_PROBES,
                self.probe_count
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> RegistryResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { probe_count: 4 }
    }
}
