//! Trapezoidal joint-space motion timing.
//!
//! Each joint follows a symmetric velocity trapezoid: a constant-acceleration
//! ramp to the peak velocity, a cruise, and a mirror-image ramp down. Short
//! displacements never reach the peak and degenerate to a triangle. A move
//! between two TCP points takes as long as its slowest joint.

use nalgebra::Vector3;

use crate::core::types::{JointLimits, JointVector, JOINT_COUNT};
use crate::kinematics::Arm;

/// Travel time in seconds for one joint over an angular displacement.
///
/// `delta_rad` is the absolute displacement in radians; limits supply the
/// peak velocity and acceleration.
pub fn joint_travel_time(delta_rad: f64, limits: &JointLimits) -> f64 {
    let distance = delta_rad.abs();
    let v = limits.max_velocity_rad();
    let a = limits.max_accel_rad();

    let t_acc = v / a;
    let s_acc = 0.5 * a * t_acc * t_acc;

    if 2.0 * s_acc >= distance {
        // Triangular: the peak velocity is never reached.
        2.0 * (distance / a).sqrt()
    } else {
        2.0 * t_acc + (distance - 2.0 * s_acc) / v
    }
}

/// Duration in seconds of a joint-space slew, the maximum across joints.
pub fn slew_duration(
    from: &JointVector,
    to: &JointVector,
    limits: &[JointLimits; JOINT_COUNT],
) -> f64 {
    (0..JOINT_COUNT)
        .map(|j| joint_travel_time(to[j] - from[j], &limits[j]))
        .fold(0.0, f64::max)
}

/// A feasible joint-space move: the arrival configuration and how long the
/// slowest joint needs.
#[derive(Clone, Copy, Debug)]
pub struct Move {
    pub joints: JointVector,
    pub duration_ms: i64,
}

/// Time a move between two TCP points, carrying joint state.
///
/// IK runs at both endpoints; the second solve is seeded with the first so
/// the arm stays in one branch. When the start point has no solution (the
/// rest pose at the base origin never does) the seed itself stands in as the
/// start configuration. An unsolvable end point makes the move infeasible.
pub fn move_between(
    arm: &Arm,
    from: &Vector3<f64>,
    to: &Vector3<f64>,
    seed: &JointVector,
) -> Option<Move> {
    let start = arm.solve(from, seed);
    let start_joints = start.solution().unwrap_or(*seed);

    let end = arm.solve(to, &start_joints).solution()?;

    let seconds = slew_duration(&start_joints, &end, arm.limits());
    Some(Move {
        joints: end,
        duration_ms: (seconds * 1000.0).round() as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::config::PlannerConfig;

    fn limits() -> JointLimits {
        JointLimits::new(-170.0, 170.0, 90.0, 45.0)
    }

    #[test]
    fn test_zero_displacement_takes_no_time() {
        assert_relative_eq!(joint_travel_time(0.0, &limits()), 0.0);
    }

    #[test]
    fn test_triangular_case() {
        // Far below 2 * s_acc: t = 2 * sqrt(d / a).
        let l = limits();
        let d = 0.1;
        let expected = 2.0 * (d / l.max_accel_rad()).sqrt();
        assert_relative_eq!(joint_travel_time(d, &l), expected, epsilon = 1e-12);
        assert_relative_eq!(joint_travel_time(-d, &l), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_trapezoidal_case() {
        // Far above 2 * s_acc: cruise time dominates.
        let l = limits();
        let v = l.max_velocity_rad();
        let a = l.max_accel_rad();
        let s_acc = 0.5 * v * v / a;
        let d = 4.0 * s_acc;
        let expected = 2.0 * (v / a) + (d - 2.0 * s_acc) / v;
        assert_relative_eq!(joint_travel_time(d, &l), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_continuous_at_profile_boundary() {
        // At |delta| = 2 * s_acc the triangular and trapezoidal formulas
        // must agree; probe both sides of the boundary.
        let l = limits();
        let v = l.max_velocity_rad();
        let a = l.max_accel_rad();
        let boundary = v * v / a;

        let below = joint_travel_time(boundary - 1e-9, &l);
        let at = joint_travel_time(boundary, &l);
        let above = joint_travel_time(boundary + 1e-9, &l);

        assert_relative_eq!(below, at, epsilon = 1e-6);
        assert_relative_eq!(above, at, epsilon = 1e-6);
        assert_relative_eq!(at, 2.0 * v / a, epsilon = 1e-9);
    }

    #[test]
    fn test_travel_time_monotone_in_distance() {
        let l = limits();
        let mut last = 0.0;
        for i in 1..200 {
            let t = joint_travel_time(i as f64 * 0.05, &l);
            assert!(t > last);
            last = t;
        }
    }

    #[test]
    fn test_slew_duration_is_max_over_joints() {
        let all = [limits(); JOINT_COUNT];
        let from = JointVector::zeros();
        let mut to = JointVector::zeros();
        to[2] = 0.4;
        to[5] = 1.2;

        let expected = joint_travel_time(1.2, &limits());
        assert_relative_eq!(slew_duration(&from, &to, &all), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_move_between_unreachable_end_is_infeasible() {
        let all = [limits(); JOINT_COUNT];
        let config = PlannerConfig::default();
        let arm = Arm::new(Vector3::zeros(), &all, &config);

        let from = Vector3::new(0.4, 0.3, 0.3);
        let to = Vector3::new(1.6, 0.0, 0.0);
        assert!(move_between(&arm, &from, &to, &JointVector::zeros()).is_none());
    }

    #[test]
    fn test_move_between_reports_positive_duration() {
        let all = [limits(); JOINT_COUNT];
        let config = PlannerConfig::default();
        let arm = Arm::new(Vector3::zeros(), &all, &config);

        let from = Vector3::new(0.4, 0.3, 0.3);
        let to = Vector3::new(0.3, 0.4, 0.35);
        let mv = move_between(&arm, &from, &to, &JointVector::zeros()).unwrap();
        assert!(mv.duration_ms > 0);
        assert!((arm.tcp(&mv.joints) - to).norm() < 2e-3);
    }
}
