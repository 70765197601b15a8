//! Configuration loading for the work-cell driver

use serde::Deserialize;
use std::path::Path;

use yantra_plan::PlannerConfig;

use crate::error::{CellError, Result};

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CellConfig {
    /// Engine constants; every field falls back to its UR5-class default.
    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Path to write the schedule to; stdout when absent.
    #[serde(default)]
    pub result_path: Option<String>,
}

impl CellConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CellError::Config(format!("Failed to read config file: {}", e)))?;
        let config: CellConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
