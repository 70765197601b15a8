//! Planner configuration.
//!
//! Every tunable constant the engine consumes lives here. The defaults are
//! sized for a UR5-class manipulator; deployments with a different arm must
//! substitute at least `max_reach`.

use serde::Deserialize;

/// Engine-wide configuration with UR5-class defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Maximum distance from a robot base at which a target is even
    /// considered for inverse kinematics (meters).
    /// Default: 1.7
    #[serde(default = "default_max_reach")]
    pub max_reach: f64,

    /// Maximum length of a straight-line trajectory sub-segment (meters).
    /// Default: 0.05
    #[serde(default = "default_segment_length")]
    pub segment_length: f64,

    /// Time step for sampled pairwise separation checks (milliseconds).
    /// Default: 5
    #[serde(default = "default_collision_step_ms")]
    pub collision_step_ms: i64,

    /// Delay added to shifted schedules per resolution attempt (milliseconds).
    /// Default: 200
    #[serde(default = "default_resolution_delay_ms")]
    pub resolution_delay_ms: i64,

    /// Maximum number of resolution attempts before the plan fails.
    /// Default: 200
    #[serde(default = "default_max_resolution_attempts")]
    pub max_resolution_attempts: usize,

    /// Iteration cap for the inverse-kinematics solver.
    /// Default: 200
    #[serde(default = "default_ik_max_iterations")]
    pub ik_max_iterations: usize,

    /// Residual TCP position error below which an IK solve succeeds (meters).
    /// Default: 1e-3
    #[serde(default = "default_ik_position_tolerance")]
    pub ik_position_tolerance: f64,

    /// Weight of the seed-distance smoothing term in the IK cost.
    /// Default: 0.05
    #[serde(default = "default_ik_smoothing_weight")]
    pub ik_smoothing_weight: f64,

    /// Weight of the near-singularity penalty in the IK cost.
    /// Default: 1e-6
    #[serde(default = "default_ik_singularity_weight")]
    pub ik_singularity_weight: f64,

    /// Largest operation count for which assignment is solved exactly by
    /// branch-and-bound; larger instances use list scheduling alone.
    /// Default: 10
    #[serde(default = "default_exact_assignment_max_ops")]
    pub exact_assignment_max_ops: usize,

    /// Node cap for the exact assignment search.
    /// Default: 200 000
    #[serde(default = "default_assignment_node_cap")]
    pub assignment_node_cap: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_reach: default_max_reach(),
            segment_length: default_segment_length(),
            collision_step_ms: default_collision_step_ms(),
            resolution_delay_ms: default_resolution_delay_ms(),
            max_resolution_attempts: default_max_resolution_attempts(),
            ik_max_iterations: default_ik_max_iterations(),
            ik_position_tolerance: default_ik_position_tolerance(),
            ik_smoothing_weight: default_ik_smoothing_weight(),
            ik_singularity_weight: default_ik_singularity_weight(),
            exact_assignment_max_ops: default_exact_assignment_max_ops(),
            assignment_node_cap: default_assignment_node_cap(),
        }
    }
}

impl PlannerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the reach gate.
    pub fn with_max_reach(mut self, meters: f64) -> Self {
        self.max_reach = meters;
        self
    }

    /// Builder-style setter for the sub-segment length.
    pub fn with_segment_length(mut self, meters: f64) -> Self {
        self.segment_length = meters;
        self
    }

    /// Builder-style setter for the collision sampling step.
    pub fn with_collision_step_ms(mut self, ms: i64) -> Self {
        self.collision_step_ms = ms;
        self
    }

    /// Builder-style setter for the exact-assignment size threshold.
    /// Set to 0 to always use list scheduling.
    pub fn with_exact_assignment_max_ops(mut self, ops: usize) -> Self {
        self.exact_assignment_max_ops = ops;
        self
    }
}

fn default_max_reach() -> f64 {
    1.7
}
fn default_segment_length() -> f64 {
    0.05
}
fn default_collision_step_ms() -> i64 {
    5
}
fn default_resolution_delay_ms() -> i64 {
    200
}
fn default_max_resolution_attempts() -> usize {
    200
}
fn default_ik_max_iterations() -> usize {
    200
}
fn default_ik_position_tolerance() -> f64 {
    1e-3
}
fn default_ik_smoothing_weight() -> f64 {
    0.05
}
fn default_ik_singularity_weight() -> f64 {
    1e-6
}
fn default_exact_assignment_max_ops() -> usize {
    10
}
fn default_assignment_node_cap() -> usize {
    200_000
}
