//! YantraPlan - Collision-free motion scheduling for manipulator fleets
//!
//! Plans time-stamped TCP waypoint schedules for a work cell of K identical
//! six-axis arms executing N pick-and-place operations, minimising the
//! makespan while respecting reachability, joint limits, and a minimum
//! pairwise separation at every instant.
//!
//! # Architecture
//!
//! The crate is organized into layers, leaves first:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    planner                          │  ← Pipeline driver
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │        assignment / trajectory / collision          │  ← Planning stages
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │               kinematics / timing                   │  ← Arm model
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   core / io                         │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! A planning run is single-threaded and synchronous; the engine performs no
//! I/O and holds no shared mutable state, so callers may run independent
//! plans concurrently by constructing independent [`Planner`] instances.
//!
//! # Example
//!
//! ```
//! use yantra_plan::{Planner, PlannerConfig};
//!
//! let input = "\
//! 1 1
//! 0.0 0.0 0.0
//! -170 170 90 45
//! -120 120 90 45
//! -120 120 90 45
//! -170 170 90 45
//! -120 120 90 45
//! -170 170 90 45
//! 0.1 0.2
//! 0.4 0.3 0.3 0.3 0.4 0.3 500
//! ";
//!
//! let plan = Planner::new(PlannerConfig::default()).plan(input).unwrap();
//! assert!(plan.makespan_ms > 0);
//! println!("{}", plan.render());
//! ```

// ============================================================================
// Layer 1: Foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Arm model (depends on core)
// ============================================================================
pub mod config;
pub mod kinematics;
pub mod timing;

// ============================================================================
// Layer 3: Planning stages (depend on core, kinematics, timing)
// ============================================================================
pub mod assignment;
pub mod collision;
pub mod trajectory;

// ============================================================================
// Layer 4: Driver and I/O
// ============================================================================
pub mod io;
pub mod planner;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::PlannerConfig;
pub use core::types::{
    Assignment, JointLimits, JointVector, Operation, Plan, Schedule, Waypoint, WorkCell,
    JOINT_COUNT,
};
pub use error::{PlanError, Result};
pub use kinematics::{Arm, IkConfig, IkResult};
pub use planner::Planner;
