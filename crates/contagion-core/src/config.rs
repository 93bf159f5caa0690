//! Configuration for registries and infection runs

use crate::VersionLabel;

/// Registry construction configuration
#[derive(Clone, Debug, Default)]
pub struct RegistryConfig {
    /// Version every user is registered on
    pub initial_version: VersionLabel,
}

impl RegistryConfig {
    pub fn with_initial_version(mut self, version: impl Into<VersionLabel>) -> Self {
        self.initial_version = version.into();
        self
    }
}

/// Infection coordinator configuration
#[derive(Clone, Debug)]
pub struct InfectionConfig {
    /// When no set of whole components fits under a limit, infect the
    /// smallest component anyway if it overshoots by no more than the limit
    pub oversize_fallback: bool,
}

impl Default for InfectionConfig {
    fn default() -> Self {
        InfectionConfig {
            oversize_fallback: true,
        }
    }
}

impl InfectionConfig {
    /// Never exceed the requested limit
    pub fn strict() -> Self {
        InfectionConfig {
            oversize_fallback: false,
        }
    }
}
