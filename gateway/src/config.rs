use kv::StoreConfig;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_MAX_CONFIGS: usize = 14;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("max_configs must be at least 1")]
    InvalidMaxConfigs,

    #[error("Empty base_dir for {0} store")]
    EmptyBaseDir(&'static str),
}

/// Gateway configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener serving subscription requests
    pub listener: Listener,
    /// Admin listener for health and readiness probes
    pub admin_listener: Listener,
    /// Registry of subscription tokens
    pub users: StoreConfig,
    /// Registry of config entries served to subscribers
    pub configs: StoreConfig,
    #[serde(default)]
    pub sampling: Sampling,
}

impl Config {
    /// Validates the gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;
        self.sampling.validate()?;

        for (name, store) in [("users", &self.users), ("configs", &self.configs)] {
            if let StoreConfig::Filesystem { base_dir } = store
                && base_dir.is_empty()
            {
                return Err(ValidationError::EmptyBaseDir(name));
            }
        }

        Ok(())
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    /// Host address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

/// Controls how configs are picked for each response
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Sampling {
    /// Upper bound on the number of configs in one response
    #[serde(default = "default_max_configs")]
    pub max_configs: usize,
    /// Fixed seed for the shuffle. Unset means a fresh thread-local generator.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_max_configs() -> usize {
    DEFAULT_MAX_CONFIGS
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling {
            max_configs: DEFAULT_MAX_CONFIGS,
            seed: None,
        }
    }
}

impl Sampling {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_configs == 0 {
            return Err(ValidationError::InvalidMaxConfigs);
        }
        Ok(())
    }
}
