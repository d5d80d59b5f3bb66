//! Drill configuration, loadable from TOML.
//!
//! ```toml
//! mastery_threshold = 3
//! logging_enabled = true
//! log_dir = "logs"
//! seed = 42
//!
//! [partition]
//! defer_set = "AER"
//! empty_marker = "."
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::drill_engine::{
    error::{DrillError, Result},
    partition::{DeferSet, PartitionOptions, DEFAULT_DEFER_SET, DEFAULT_EMPTY_MARKER},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillConfig {
    /// Consecutive correct answers needed to retire a letter pair.
    #[serde(default = "default_threshold")]
    pub mastery_threshold: u32,
    /// Append one CSV row per scored round.
    #[serde(default = "default_true")]
    pub logging_enabled: bool,
    /// Where session logs are created.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Fixed RNG seed for reproducible draws; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub partition: PartitionConfig,
}

/// How raw tables are turned into groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    #[serde(default = "default_defer_set")]
    pub defer_set: String,
    #[serde(default = "default_empty_marker")]
    pub empty_marker: String,
}

impl Default for DrillConfig {
    fn default() -> Self {
        DrillConfig {
            mastery_threshold: default_threshold(),
            logging_enabled: true,
            log_dir: default_log_dir(),
            seed: None,
            partition: PartitionConfig::default(),
        }
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        PartitionConfig {
            defer_set: default_defer_set(),
            empty_marker: default_empty_marker(),
        }
    }
}

impl DrillConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    /// `DrillError::Config` for malformed TOML, `InvalidThreshold` for 0.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: DrillConfig = toml::from_str(toml_str).map_err(|e| DrillError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.mastery_threshold == 0 {
            return Err(DrillError::InvalidThreshold(self.mastery_threshold));
        }
        Ok(())
    }
}

impl PartitionConfig {
    pub fn options(&self) -> PartitionOptions {
        PartitionOptions {
            defer: DeferSet::new(&self.defer_set),
            empty_marker: self.empty_marker.clone(),
        }
    }
}

fn default_threshold() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_defer_set() -> String {
    DEFAULT_DEFER_SET.to_string()
}

fn default_empty_marker() -> String {
    DEFAULT_EMPTY_MARKER.to_string()
}
