//! Configuration for bundle assembly and validation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (mson-bundle.toml)
//! - Environment variables (MSON_BUNDLE__*)
//!
//! ## Example config file (mson-bundle.toml):
//! ```toml
//! [bundle]
//! default_version = "0.0.1"
//!
//! [naming]
//! inverse_prefix = "inverse"
//!
//! [validation]
//! check_version = true
//! check_components = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Version stamped on bundles when the caller supplies no override
pub const DEFAULT_BUNDLE_VERSION: &str = "0.0.1";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Bundle identity settings
    #[serde(default)]
    pub bundle: AssemblyConfig,

    /// Naming policy for synthesized relationship members
    #[serde(default)]
    pub naming: NamingConfig,

    /// Optional validator checks
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Bundle identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyConfig {
    /// Version used when no override is given
    #[serde(default = "default_version")]
    pub default_version: String,
}

/// Naming policy for members inferred from relationships
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefix joined to a declared relationship name to name its reverse side
    #[serde(default = "default_inverse_prefix")]
    pub inverse_prefix: String,
}

/// Validator toggles for warning-only checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Warn when the bundle version is not valid semver
    #[serde(default = "default_true")]
    pub check_version: bool,

    /// Warn when a component has no matching schema
    #[serde(default = "default_true")]
    pub check_components: bool,
}

fn default_version() -> String {
    DEFAULT_BUNDLE_VERSION.to_string()
}

fn default_inverse_prefix() -> String {
    "inverse".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            default_version: default_version(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            inverse_prefix: default_inverse_prefix(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_version: true,
            check_components: true,
        }
    }
}

impl BundleConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally layering a required file on top
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        Ok(Self::build(config_path)?.try_deserialize()?)
    }

    fn build(config_path: Option<&str>) -> std::result::Result<Config, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "mson-bundle.toml",
            ".mson-bundle.toml",
            "config/mson-bundle.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "mson", "mson-bundle") {
            let xdg_config = config_dir.config_dir().join("mson-bundle.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (MSON_BUNDLE__NAMING__INVERSE_PREFIX, ...)
        builder = builder.add_source(
            Environment::with_prefix("MSON_BUNDLE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
