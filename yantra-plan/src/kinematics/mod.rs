//! Kinematics layer: DH forward kinematics, numerical inverse kinematics,
//! and reachability.

pub mod dh;
pub mod ik;

pub use dh::{dh_transform, forward_kinematics, position_jacobian, tcp_world, DhRow, DH_TABLE};
pub use ik::{solve_ik, IkConfig, IkResult};

use nalgebra::Vector3;

use crate::config::PlannerConfig;
use crate::core::types::{JointLimits, JointVector, JOINT_COUNT};

/// One manipulator fixed at a world-frame base.
///
/// Bundles the base offset, the shared joint limits, and the IK settings so
/// the planning stages can speak in world coordinates.
pub struct Arm<'a> {
    base: Vector3<f64>,
    limits: &'a [JointLimits; JOINT_COUNT],
    ik: IkConfig,
    max_reach: f64,
}

impl<'a> Arm<'a> {
    pub fn new(
        base: Vector3<f64>,
        limits: &'a [JointLimits; JOINT_COUNT],
        config: &PlannerConfig,
    ) -> Self {
        let ik = IkConfig::default()
            .with_max_iterations(config.ik_max_iterations)
            .with_position_tolerance(config.ik_position_tolerance)
            .with_smoothing_weight(config.ik_smoothing_weight)
            .with_singularity_weight(config.ik_singularity_weight);
        Self {
            base,
            limits,
            ik,
            max_reach: config.max_reach,
        }
    }

    #[inline]
    pub fn base(&self) -> Vector3<f64> {
        self.base
    }

    #[inline]
    pub fn limits(&self) -> &[JointLimits; JOINT_COUNT] {
        self.limits
    }

    /// World-frame TCP position for a joint configuration.
    #[inline]
    pub fn tcp(&self, joints: &JointVector) -> Vector3<f64> {
        tcp_world(joints, &self.base)
    }

    /// Solve IK for a world-frame target.
    pub fn solve(&self, target_world: &Vector3<f64>, seed: &JointVector) -> IkResult {
        let target_local = target_world - self.base;
        solve_ik(&target_local, seed, self.limits, &self.ik)
    }

    /// Whether the arm can reach a world-frame target.
    ///
    /// A cheap distance gate rejects far targets before the IK probe from the
    /// neutral seed runs.
    pub fn reachable(&self, target_world: &Vector3<f64>) -> bool {
        if (target_world - self.base).norm() > self.max_reach {
            return false;
        }
        self.solve(target_world, &JointVector::zeros()).converged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide_limits() -> [JointLimits; JOINT_COUNT] {
        [JointLimits::new(-170.0, 170.0, 90.0, 45.0); JOINT_COUNT]
    }

    #[test]
    fn test_reachable_distance_gate() {
        let limits = wide_limits();
        let config = PlannerConfig::default();
        let arm = Arm::new(Vector3::new(10.0, 0.0, 0.0), &limits, &config);

        // 10m from the base: rejected without running IK.
        assert!(!arm.reachable(&Vector3::zeros()));
        // Inside the gate and kinematically reachable.
        assert!(arm.reachable(&Vector3::new(10.4, 0.3, 0.3)));
    }

    #[test]
    fn test_solve_world_frame_offsets_base() {
        let limits = wide_limits();
        let config = PlannerConfig::default();
        let base = Vector3::new(2.0, -1.0, 0.5);
        let arm = Arm::new(base, &limits, &config);

        let target = base + Vector3::new(0.4, 0.3, 0.2);
        let result = arm.solve(&target, &JointVector::zeros());
        assert!(result.converged);
        assert!((arm.tcp(&result.joints) - target).norm() < 2e-3);
    }
}
