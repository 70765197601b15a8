//! Denavit-Hartenberg model of the manipulator.
//!
//! Every robot in the fleet shares this fixed six-row table, which describes
//! a UR5-class arm (link lengths in meters, twists in radians). The table is
//! a constant of the engine, not an input.

use nalgebra::{Matrix4, SMatrix, Vector3};

use crate::core::types::{JointVector, JOINT_COUNT};

/// One row of the DH table.
#[derive(Clone, Copy, Debug)]
pub struct DhRow {
    /// Link length `a` (meters).
    pub a: f64,
    /// Link twist `alpha` (radians).
    pub alpha: f64,
    /// Link offset `d` (meters).
    pub d: f64,
    /// Joint angle offset added to the commanded angle (radians).
    pub theta_offset: f64,
}

/// DH parameters for a UR5-class six-axis arm.
pub const DH_TABLE: [DhRow; JOINT_COUNT] = [
    DhRow { a: 0.0, alpha: std::f64::consts::FRAC_PI_2, d: 0.089159, theta_offset: 0.0 },
    DhRow { a: -0.425, alpha: 0.0, d: 0.0, theta_offset: 0.0 },
    DhRow { a: -0.39225, alpha: 0.0, d: 0.0, theta_offset: 0.0 },
    DhRow { a: 0.0, alpha: std::f64::consts::FRAC_PI_2, d: 0.10915, theta_offset: 0.0 },
    DhRow { a: 0.0, alpha: -std::f64::consts::FRAC_PI_2, d: 0.09465, theta_offset: 0.0 },
    DhRow { a: 0.0, alpha: 0.0, d: 0.0823, theta_offset: 0.0 },
];

/// Step size for the forward-difference Jacobian.
const JACOBIAN_EPS: f64 = 1e-6;

/// Homogeneous transform of one DH row at joint angle `theta` (radians).
pub fn dh_transform(row: &DhRow, theta: f64) -> Matrix4<f64> {
    let (st, ct) = (theta + row.theta_offset).sin_cos();
    let (sa, ca) = row.alpha.sin_cos();
    Matrix4::new(
        ct, -st * ca, st * sa, row.a * ct,
        st, ct * ca, -ct * sa, row.a * st,
        0.0, sa, ca, row.d,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// TCP position in the robot's local frame for a joint configuration.
pub fn forward_kinematics(joints: &JointVector) -> Vector3<f64> {
    let mut t = Matrix4::identity();
    for (row, &theta) in DH_TABLE.iter().zip(joints.iter()) {
        t *= dh_transform(row, theta);
    }
    t.fixed_view::<3, 1>(0, 3).into_owned()
}

/// TCP position in the world frame: local forward kinematics offset by the
/// robot's base.
#[inline]
pub fn tcp_world(joints: &JointVector, base: &Vector3<f64>) -> Vector3<f64> {
    base + forward_kinematics(joints)
}

/// 3x6 position Jacobian by forward differences.
pub fn position_jacobian(joints: &JointVector) -> SMatrix<f64, 3, JOINT_COUNT> {
    let at_joints = forward_kinematics(joints);
    let mut jacobian = SMatrix::<f64, 3, JOINT_COUNT>::zeros();
    for j in 0..JOINT_COUNT {
        let mut perturbed = *joints;
        perturbed[j] += JACOBIAN_EPS;
        let column = (forward_kinematics(&perturbed) - at_joints) / JACOBIAN_EPS;
        jacobian.set_column(j, &column);
    }
    jacobian
}
