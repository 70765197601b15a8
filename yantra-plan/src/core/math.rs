//! Math primitives for joint vectors and schedules.

use nalgebra::Vector3;

use super::types::{JointLimits, JointVector, JOINT_COUNT};

/// Linear interpolation between two points.
///
/// `t` should be in [0, 1] where 0 returns `a` and 1 returns `b`.
#[inline]
pub fn lerp(a: &Vector3<f64>, b: &Vector3<f64>, t: f64) -> Vector3<f64> {
    a + (b - a) * t
}

/// Whether every joint of `joints` lies within its limits.
#[inline]
pub fn joints_in_limits(joints: &JointVector, limits: &[JointLimits; JOINT_COUNT]) -> bool {
    (0..JOINT_COUNT).all(|j| limits[j].contains_rad(joints[j]))
}

/// Clamp every joint of `joints` into its limits.
pub fn project_into_limits(
    joints: &JointVector,
    limits: &[JointLimits; JOINT_COUNT],
) -> JointVector {
    let mut projected = *joints;
    for j in 0..JOINT_COUNT {
        projected[j] = projected[j].clamp(limits[j].min_rad(), limits[j].max_rad());
    }
    projected
}
