//! # DAG Validation Configuration
//!
//! Limits and switches for the ancestry crawler and its service, loadable
//! from TOML.
//!
//! ```toml
//! [dag]
//! max_crawl_depth = 10000
//! parent_check_hops = 2
//! coalesce_crawls = true
//! cache_capacity = 50000
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default hard ceiling on crawl depth.
pub const DEFAULT_MAX_CRAWL_DEPTH: usize = 10_000;

/// Default hop bound of the immediate-parent check.
pub const DEFAULT_PARENT_CHECK_HOPS: usize = 2;

/// Default capacity of the transaction record cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 50_000;

/// DAG validation configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagConfig {
    /// Maximum ancestry depth of a full crawl before it fails.
    pub max_crawl_depth: usize,

    /// Generations of parents the immediate-parent check inspects.
    pub parent_check_hops: usize,

    /// Share one in-flight crawl between concurrent callers asking for the
    /// same transaction and token.
    pub coalesce_crawls: bool,

    /// Number of records kept by the in-memory cache adapter.
    pub cache_capacity: usize,
}

impl Default for DagConfig {
    fn default() -> Self {
        Self {
            max_crawl_depth: DEFAULT_MAX_CRAWL_DEPTH,
            parent_check_hops: DEFAULT_PARENT_CHECK_HOPS,
            coalesce_crawls: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    dag: DagSection,
}

#[derive(Debug, Default, Deserialize)]
struct DagSection {
    max_crawl_depth: Option<usize>,
    parent_check_hops: Option<usize>,
    coalesce_crawls: Option<bool>,
    cache_capacity: Option<usize>,
}

impl DagConfig {
    /// Create a config for testing (small limits).
    pub fn for_testing() -> Self {
        Self {
            max_crawl_depth: 64,
            parent_check_hops: DEFAULT_PARENT_CHECK_HOPS,
            coalesce_crawls: true,
            cache_capacity: 256,
        }
    }

    /// Reject limits that would make every crawl fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_crawl_depth < 2 {
            return Err(ConfigError::Invalid(
                "max_crawl_depth must be at least 2".to_string(),
            ));
        }
        if self.parent_check_hops == 0 {
            return Err(ConfigError::Invalid(
                "parent_check_hops must be at least 1".to_string(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let defaults = Self::default();
        let section = file.dag;
        let config = Self {
            max_crawl_depth: section.max_crawl_depth.unwrap_or(defaults.max_crawl_depth),
            parent_check_hops: section
                .parent_check_hops
                .unwrap_or(defaults.parent_check_hops),
            coalesce_crawls: section.coalesce_crawls.unwrap_or(defaults.coalesce_crawls),
            cache_capacity: section.cache_capacity.unwrap_or(defaults.cache_capacity),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
