//! Foundation layer: shared types and math primitives.

pub mod math;
pub mod types;

pub use types::{
    Assignment, JointLimits, JointVector, Operation, Plan, Schedule, Waypoint, WorkCell,
    JOINT_COUNT,
};
