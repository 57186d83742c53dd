//! Registry configuration

use serde::Deserialize;

use crate::{BlasterResult, ExtensionModule};

/// Which extension modules a [`Blaster`](crate::Blaster) loads, and how
/// it reacts to a module whose prerequisite is missing.
///
/// ```toml
/// modules = ["attributes", "css", "event", "eventmouse"]
/// skip_unmet_dependencies = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlasterConfig {
    /// Modules to load, in order
    pub modules: Vec<ExtensionModule>,
    /// Log and skip a module with an unmet prerequisite instead of failing
    pub skip_unmet_dependencies: bool,
}

impl Default for BlasterConfig {
    fn default() -> Self {
        Self {
            modules: ExtensionModule::ALL.to_vec(),
            skip_unmet_dependencies: false,
        }
    }
}

impl BlasterConfig {
    /// Built-in core operations only
    pub fn core_only() -> Self {
        Self {
            modules: Vec::new(),
            ..Self::default()
        }
    }

    /// Parse a TOML configuration; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> BlasterResult<Self> {
        let config = toml::from_str(source)?;
        Ok(config)
    }
}
