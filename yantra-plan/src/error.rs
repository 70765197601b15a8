//! Error types for YantraPlan

use thiserror::Error;

/// Planning failure. Every variant is fatal: no partial schedule is emitted.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Input shape error: {0}")]
    InputShape(String),

    #[error("Input bounds error: {0}")]
    InputBounds(String),

    #[error("Operation {op} cannot be serviced by any robot")]
    Unreachable { op: usize },

    #[error("Inverse kinematics diverged while synthesising robot {robot}")]
    IkFailure { robot: usize },

    #[error("Collisions remain after {attempts} resolution attempts")]
    CollisionUnresolved { attempts: usize },
}

pub type Result<T> = std::result::Result<T, PlanError>;
