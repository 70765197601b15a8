//! Error types for the work-cell driver

use thiserror::Error;

/// Driver error type
#[derive(Error, Debug)]
pub enum CellError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Planning failed: {0}")]
    Plan(#[from] yantra_plan::PlanError),

    #[error("Planner worker panicked")]
    Worker,
}

impl From<toml::de::Error> for CellError {
    fn from(e: toml::de::Error) -> Self {
        CellError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CellError>;
