use crate::error::{GeodeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Element 84 Earth Search STAC API
pub const DEFAULT_CATALOG_URL: &str = "https://earth-search.aws.element84.com/v1";

/// Sentinel-2 surface reflectance collection
pub const DEFAULT_COLLECTION: &str = "sentinel-2-l2a";

pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_CONCURRENCY: usize = 4;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for change analysis runs
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub catalog_url: ConfigValue<String>,
    pub collection: ConfigValue<String>,
    pub query_timeout_secs: ConfigValue<u64>,
    pub concurrency: ConfigValue<usize>,
    pub seed: ConfigValue<Option<u64>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            catalog_url: ConfigValue::new(DEFAULT_CATALOG_URL.to_string(), ConfigSource::Default),
            collection: ConfigValue::new(DEFAULT_COLLECTION.to_string(), ConfigSource::Default),
            query_timeout_secs: ConfigValue::new(DEFAULT_QUERY_TIMEOUT_SECS, ConfigSource::Default),
            concurrency: ConfigValue::new(DEFAULT_CONCURRENCY, ConfigSource::Default),
            seed: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeodeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(catalog_url) = file_config.catalog_url {
            self.catalog_url.update(catalog_url, ConfigSource::File);
        }

        if let Some(collection) = file_config.collection {
            self.collection.update(collection, ConfigSource::File);
        }

        if let Some(timeout) = file_config.query_timeout_secs {
            let timeout = validate_timeout_secs(timeout)?;
            self.query_timeout_secs.update(timeout, ConfigSource::File);
        }

        if let Some(concurrency) = file_config.concurrency {
            let concurrency = validate_concurrency(concurrency)?;
            self.concurrency.update(concurrency, ConfigSource::File);
        }

        if let Some(seed) = file_config.seed {
            self.seed.update(Some(seed), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEODE_CATALOG_URL
        if let Ok(url) = env::var("GEODE_CATALOG_URL") {
            self.catalog_url.update(url, ConfigSource::Environment);
        }

        // GEODE_COLLECTION
        if let Ok(collection) = env::var("GEODE_COLLECTION") {
            self.collection.update(collection, ConfigSource::Environment);
        }

        // GEODE_QUERY_TIMEOUT_SECS
        if let Ok(timeout_str) = env::var("GEODE_QUERY_TIMEOUT_SECS") {
            match parse_timeout_secs(&timeout_str) {
                Ok(timeout) => self.query_timeout_secs.update(timeout, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEODE_QUERY_TIMEOUT_SECS value '{}': expected a positive integer",
                    timeout_str
                ),
            }
        }

        // GEODE_CONCURRENCY
        if let Ok(concurrency_str) = env::var("GEODE_CONCURRENCY") {
            match parse_concurrency(&concurrency_str) {
                Ok(concurrency) => self.concurrency.update(concurrency, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEODE_CONCURRENCY value '{}': expected a positive integer",
                    concurrency_str
                ),
            }
        }

        // GEODE_SEED
        if let Ok(seed_str) = env::var("GEODE_SEED") {
            match seed_str.trim().parse::<u64>() {
                Ok(seed) => self.seed.update(Some(seed), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEODE_SEED value '{}': expected an unsigned integer",
                    seed_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(catalog_url) = overrides.catalog_url {
            self.catalog_url.update(catalog_url, ConfigSource::Cli);
        }

        if let Some(collection) = overrides.collection {
            self.collection.update(collection, ConfigSource::Cli);
        }

        if let Some(timeout) = overrides.query_timeout_secs {
            self.query_timeout_secs.update(timeout, ConfigSource::Cli);
        }

        if let Some(concurrency) = overrides.concurrency {
            self.concurrency.update(concurrency, ConfigSource::Cli);
        }

        if let Some(seed) = overrides.seed {
            self.seed.update(Some(seed), ConfigSource::Cli);
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "catalog_url".to_string(),
            (self.catalog_url.value.clone(), self.catalog_url.source),
        );

        map.insert(
            "collection".to_string(),
            (self.collection.value.clone(), self.collection.source),
        );

        map.insert(
            "query_timeout_secs".to_string(),
            (format!("{}s", self.query_timeout_secs.value), self.query_timeout_secs.source),
        );

        map.insert(
            "concurrency".to_string(),
            (self.concurrency.value.to_string(), self.concurrency.source),
        );

        map.insert(
            "seed".to_string(),
            (
                self.seed.value.map(|s| s.to_string()).unwrap_or_else(|| "random".to_string()),
                self.seed.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    catalog_url: Option<String>,
    collection: Option<String>,
    query_timeout_secs: Option<u64>,
    concurrency: Option<usize>,
    seed: Option<u64>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub catalog_url: Option<String>,
    pub collection: Option<String>,
    pub query_timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub seed: Option<u64>,
}

/// Parse a per-query timeout in whole seconds
pub fn parse_timeout_secs(s: &str) -> Result<u64> {
    let timeout = s.trim().parse::<u64>().map_err(|_| GeodeError::ConfigInvalid {
        key: "query_timeout_secs".to_string(),
        reason: format!("Invalid timeout: {}. Use a whole number of seconds", s),
    })?;
    validate_timeout_secs(timeout)
}

/// Parse the number of points processed concurrently
pub fn parse_concurrency(s: &str) -> Result<usize> {
    let concurrency = s.trim().parse::<usize>().map_err(|_| GeodeError::ConfigInvalid {
        key: "concurrency".to_string(),
        reason: format!("Invalid concurrency: {}. Use a positive integer", s),
    })?;
    validate_concurrency(concurrency)
}

fn validate_timeout_secs(timeout: u64) -> Result<u64> {
    if timeout == 0 {
        return Err(GeodeError::ConfigInvalid {
            key: "query_timeout_secs".to_string(),
            reason: "Timeout must be at least one second".to_string(),
        });
    }
    Ok(timeout)
}

fn validate_concurrency(concurrency: usize) -> Result<usize> {
    if concurrency == 0 {
        return Err(GeodeError::ConfigInvalid {
            key: "concurrency".to_string(),
            reason: "Concurrency must be at least 1".to_string(),
        });
    }
    Ok(concurrency)
}
