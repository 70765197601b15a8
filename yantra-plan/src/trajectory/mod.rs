//! Per-robot trajectory synthesis.
//!
//! Turns an ordered operation list into a time-stamped waypoint schedule:
//! approach the pick point, dwell for the grasp, transfer to the place point,
//! dwell for the release. Straight segments are split into sub-segments no
//! longer than the configured length, which bounds the deviation joint-space
//! interpolation introduces between samples and gives the collision checker
//! dense anchors. The joint solution of each sub-segment seeds the next IK
//! call, keeping the arm in a single branch.

use nalgebra::Vector3;

use crate::config::PlannerConfig;
use crate::core::math::lerp;
use crate::core::types::{JointVector, Schedule, Waypoint, WorkCell};
use crate::error::{PlanError, Result};
use crate::kinematics::Arm;
use crate::timing::move_between;

/// Split the straight segment `from -> to` into endpoints of sub-segments no
/// longer than `segment_length`. The last returned point is exactly `to`;
/// `from` itself is not included.
pub fn segment_points(
    from: &Vector3<f64>,
    to: &Vector3<f64>,
    segment_length: f64,
) -> Vec<Vector3<f64>> {
    let distance = (to - from).norm();
    let count = ((distance / segment_length).ceil() as usize).max(1);
    (1..=count)
        .map(|k| lerp(from, to, k as f64 / count as f64))
        .collect()
}

/// Synthesise the schedule of one robot over its assigned operations.
///
/// A robot with no operations parks at its base: the schedule is the single
/// waypoint `(0, base)`.
pub fn synthesise(
    robot: usize,
    cell: &WorkCell,
    operations: &[usize],
    config: &PlannerConfig,
) -> Result<Schedule> {
    let arm = Arm::new(cell.bases[robot], &cell.joint_limits, config);

    let mut time_ms = 0i64;
    let mut position = cell.bases[robot];
    let mut joints = JointVector::zeros();
    let mut schedule = vec![Waypoint::new(0, position)];

    for &index in operations {
        let op = &cell.operations[index];

        // Approach, then hold the grasp.
        advance_along(
            &arm, robot, &op.pick, config, &mut time_ms, &mut position, &mut joints,
            &mut schedule,
        )?;
        time_ms += op.process_time_ms;
        schedule.push(Waypoint::new(time_ms, op.pick));

        // Transfer, then hold the release.
        advance_along(
            &arm, robot, &op.place, config, &mut time_ms, &mut position, &mut joints,
            &mut schedule,
        )?;
        time_ms += op.process_time_ms;
        schedule.push(Waypoint::new(time_ms, op.place));
    }

    log::debug!(
        "robot {}: {} waypoints, finishes at {} ms",
        robot + 1,
        schedule.len(),
        time_ms
    );
    Ok(schedule)
}

/// Walk the straight segment to `target` sub-segment by sub-segment,
/// advancing time, position, and joint state and emitting waypoints.
#[allow(clippy::too_many_arguments)]
fn advance_along(
    arm: &Arm,
    robot: usize,
    target: &Vector3<f64>,
    config: &PlannerConfig,
    time_ms: &mut i64,
    position: &mut Vector3<f64>,
    joints: &mut JointVector,
    schedule: &mut Schedule,
) -> Result<()> {
    for point in segment_points(position, target, config.segment_length) {
        let mv = move_between(arm, position, &point, joints)
            .ok_or(PlanError::IkFailure { robot })?;
        *time_ms += mv.duration_ms;
        *position = point;
        *joints = mv.joints;
        schedule.push(Waypoint::new(*time_ms, point));
    }
    Ok(())
}
