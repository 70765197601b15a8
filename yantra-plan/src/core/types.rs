//! Core data types shared by every planning stage.

use nalgebra::{SVector, Vector3};

/// Number of joints in the manipulator model.
pub const JOINT_COUNT: usize = 6;

/// A joint configuration, in radians.
pub type JointVector = SVector<f64, JOINT_COUNT>;

/// Per-joint kinematic limits, as given in the input (degrees).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointLimits {
    /// Minimum joint angle in degrees.
    pub min_angle_deg: f64,
    /// Maximum joint angle in degrees.
    pub max_angle_deg: f64,
    /// Peak joint velocity in degrees per second.
    pub max_velocity_deg: f64,
    /// Peak joint acceleration in degrees per second squared.
    pub max_accel_deg: f64,
}

impl JointLimits {
    pub fn new(min_angle_deg: f64, max_angle_deg: f64, max_velocity_deg: f64, max_accel_deg: f64) -> Self {
        Self {
            min_angle_deg,
            max_angle_deg,
            max_velocity_deg,
            max_accel_deg,
        }
    }

    /// Lower angle bound in radians.
    #[inline]
    pub fn min_rad(&self) -> f64 {
        self.min_angle_deg.to_radians()
    }

    /// Upper angle bound in radians.
    #[inline]
    pub fn max_rad(&self) -> f64 {
        self.max_angle_deg.to_radians()
    }

    /// Peak velocity in radians per second.
    #[inline]
    pub fn max_velocity_rad(&self) -> f64 {
        self.max_velocity_deg.to_radians()
    }

    /// Peak acceleration in radians per second squared.
    #[inline]
    pub fn max_accel_rad(&self) -> f64 {
        self.max_accel_deg.to_radians()
    }

    /// Whether `angle_rad` lies within the angle bounds.
    #[inline]
    pub fn contains_rad(&self, angle_rad: f64) -> bool {
        angle_rad >= self.min_rad() && angle_rad <= self.max_rad()
    }
}

/// One pick-and-place operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Operation {
    /// World-frame pick point in meters.
    pub pick: Vector3<f64>,
    /// World-frame place point in meters.
    pub place: Vector3<f64>,
    /// Dwell time spent at the pick point and again at the place point.
    pub process_time_ms: i64,
}

/// A time-stamped TCP sample. Consecutive waypoints with equal times mark an
/// instant (a dwell boundary); TCP position between samples is linear.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waypoint {
    pub time_ms: i64,
    pub position: Vector3<f64>,
}

impl Waypoint {
    pub fn new(time_ms: i64, position: Vector3<f64>) -> Self {
        Self { time_ms, position }
    }
}

/// One robot's schedule: waypoints with non-decreasing times.
pub type Schedule = Vec<Waypoint>;

/// A validated planning request.
#[derive(Clone, Debug)]
pub struct WorkCell {
    /// World-frame base origin of each robot.
    pub bases: Vec<Vector3<f64>>,
    /// Joint limits, identical across robots.
    pub joint_limits: [JointLimits; JOINT_COUNT],
    /// Radius the tool sweeps around the TCP (meters).
    pub tool_clearance: f64,
    /// Required clearance between tool envelopes (meters).
    pub safe_distance: f64,
    /// Operations to execute, in input order.
    pub operations: Vec<Operation>,
}

impl WorkCell {
    #[inline]
    pub fn num_robots(&self) -> usize {
        self.bases.len()
    }

    #[inline]
    pub fn num_operations(&self) -> usize {
        self.operations.len()
    }

    /// Minimum pairwise TCP distance every plan must maintain.
    #[inline]
    pub fn min_separation(&self) -> f64 {
        self.safe_distance + 2.0 * self.tool_clearance
    }
}

/// A total mapping of operations onto robots. `per_robot[r]` lists operation
/// indices in execution order; every operation appears exactly once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub per_robot: Vec<Vec<usize>>,
}

impl Assignment {
    pub fn empty(num_robots: usize) -> Self {
        Self {
            per_robot: vec![Vec::new(); num_robots],
        }
    }
}

/// A completed plan: one schedule per robot plus the makespan.
#[derive(Clone, Debug)]
pub struct Plan {
    /// Completion time of the last-finishing robot.
    pub makespan_ms: i64,
    /// Schedules indexed by robot, ascending.
    pub schedules: Vec<Schedule>,
}
