//! # Node Configuration
//!
//! Runtime parameters for the registry node, read from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `REGISTRY_ADMIN` | Administrator identity (hex, 20 bytes) | required |
//! | `REGISTRY_COMPAT` | `strict` or `legacy` engine behaviour | `strict` |
//! | `REGISTRY_ENFORCE_SEQUENCE` | Refuse non-increasing sequences | `true` |
//! | `REGISTRY_BUS_CAPACITY` | Event bus channel capacity | 1000 |
//! | `REGISTRY_JOURNAL` | JSON-lines journal to replay | none |
//!
//! ## Security Requirements
//!
//! - The administrator MUST NOT be the sentinel identity; nobody could ever
//!   sign as it, so the publisher table would be frozen.

use seller_registry::domain::entities::RegistryConfig;
use seller_registry::service::ServiceConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::{Identity, ParseError};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Engine behaviour preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompatMode {
    /// Hardened behaviour (`RegistryConfig::default()`).
    #[default]
    Strict,
    /// Quirk-for-quirk compatibility (`RegistryConfig::legacy()`).
    Legacy,
}

impl FromStr for CompatMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "legacy" => Ok(Self::Legacy),
            other => Err(ConfigError::InvalidCompat(other.to_string())),
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Registry administrator.
    pub admin: Identity,
    /// Engine behaviour preset.
    pub compat: CompatMode,
    /// Refuse envelopes whose sequence does not strictly increase.
    pub enforce_sequence: bool,
    /// Event bus channel capacity.
    pub bus_capacity: usize,
    /// Journal to replay at startup.
    pub journal: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            admin: Identity::SENTINEL,
            compat: CompatMode::Strict,
            enforce_sequence: true,
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            journal: None,
        }
    }
}

impl NodeConfig {
    /// Validate configuration before the service is built.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the administrator is the sentinel identity
    /// - the bus capacity is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin.is_sentinel() {
            return Err(ConfigError::SentinelAdmin);
        }
        if self.bus_capacity == 0 {
            return Err(ConfigError::InvalidCapacity("0".into()));
        }
        Ok(())
    }

    /// Engine switches for the selected preset.
    #[must_use]
    pub fn registry_config(&self) -> RegistryConfig {
        match self.compat {
            CompatMode::Strict => RegistryConfig::default(),
            CompatMode::Legacy => RegistryConfig::legacy(),
        }
    }

    /// Service configuration derived from this node configuration.
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            registry: self.registry_config(),
            enforce_sequence: self.enforce_sequence,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `REGISTRY_ADMIN` is not set.
    #[error("REGISTRY_ADMIN is not set")]
    MissingAdmin,

    /// `REGISTRY_ADMIN` is not a 20-byte hex identity.
    #[error("REGISTRY_ADMIN is invalid: {0}")]
    InvalidAdmin(#[from] ParseError),

    /// The administrator is the sentinel identity.
    #[error("SECURITY VIOLATION: administrator is the sentinel identity")]
    SentinelAdmin,

    /// Unknown `REGISTRY_COMPAT` value.
    #[error("REGISTRY_COMPAT must be 'strict' or 'legacy', got {0:?}")]
    InvalidCompat(String),

    /// Unusable `REGISTRY_BUS_CAPACITY` value.
    #[error("REGISTRY_BUS_CAPACITY must be a positive integer, got {0:?}")]
    InvalidCapacity(String),

    /// Unusable boolean flag.
    #[error("{name} must be 'true' or 'false', got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
}

/// Load configuration from the process environment.
///
/// A journal path given on the command line takes precedence over
/// `REGISTRY_JOURNAL`.
pub fn load_config(journal_arg: Option<PathBuf>) -> Result<NodeConfig, ConfigError> {
    let mut config = from_lookup(|key| std::env::var(key).ok())?;
    if journal_arg.is_some() {
        config.journal = journal_arg;
    }
    Ok(config)
}

/// Build a configuration from an arbitrary variable lookup.
pub fn from_lookup<F>(lookup: F) -> Result<NodeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = NodeConfig::default();

    let admin = lookup("REGISTRY_ADMIN").ok_or(ConfigError::MissingAdmin)?;
    config.admin = admin.trim().parse()?;

    if let Some(compat) = lookup("REGISTRY_COMPAT") {
        config.compat = compat.parse()?;
    }

    if let Some(flag) = lookup("REGISTRY_ENFORCE_SEQUENCE") {
        config.enforce_sequence = match flag.trim() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                return Err(ConfigError::InvalidFlag {
                    name: "REGISTRY_ENFORCE_SEQUENCE",
                    value: flag,
                })
            }
        };
    }

    if let Some(capacity) = lookup("REGISTRY_BUS_CAPACITY") {
        config.bus_capacity = capacity
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidCapacity(capacity.clone()))?;
    }

    if let Some(path) = lookup("REGISTRY_JOURNAL") {
        config.journal = Some(PathBuf::from(path));
    }

    config.validate()?;
    Ok(config)
}
