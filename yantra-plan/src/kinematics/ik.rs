//! Damped Gauss-Newton inverse kinematics with joint-bound projection.
//!
//! Solves the bounded nonlinear least squares problem of finding a joint
//! configuration whose forward kinematics reaches a target TCP position.
//!
//! The iteration blends between Gauss-Newton (fast convergence near the
//! solution) and gradient descent (robust far from it) via a
//! Levenberg-Marquardt damping factor. Candidate steps are projected into the
//! joint limits, so every iterate is feasible by construction. Acceptance is
//! judged on the scalar cost
//!
//! ```text
//! cost(theta) = ||fk(theta) - target||
//!             + smoothing_weight * ||theta - seed||
//!             + singularity penalty near rank-deficient Jacobians
//! ```
//!
//! A solve succeeds when the residual position error falls below the
//! tolerance; the bound projection guarantees the limits.

use nalgebra::{SMatrix, Vector3};

use crate::core::math::project_into_limits;
use crate::core::types::{JointLimits, JointVector, JOINT_COUNT};

use super::dh::{forward_kinematics, position_jacobian};

/// Configuration for the IK solver.
#[derive(Clone, Debug)]
pub struct IkConfig {
    /// Maximum number of iterations.
    /// Default: 200
    pub max_iterations: usize,

    /// Residual position error below which the solve succeeds (meters).
    /// Default: 1e-3
    pub position_tolerance: f64,

    /// Weight of the `||theta - seed||` smoothing term.
    /// Default: 0.05
    pub smoothing_weight: f64,

    /// Weight of the near-singularity penalty.
    /// Default: 1e-6
    pub singularity_weight: f64,

    /// Smallest singular value below which the penalty engages.
    /// Default: 1e-3
    pub singularity_threshold: f64,

    /// Step-norm threshold under which iteration stops.
    /// Default: 1e-10
    pub step_tolerance: f64,

    /// Initial LM damping factor (lambda).
    /// Default: 1e-3
    pub lm_initial_lambda: f64,

    /// Factor to scale lambda up (on bad step) or down (on good step).
    /// Default: 10.0
    pub lm_lambda_factor: f64,

    /// Minimum lambda value (floor after successful steps).
    /// Default: 1e-7
    pub lm_min_lambda: f64,

    /// Maximum lambda value (triggers failure if exceeded).
    /// Default: 1e7
    pub lm_max_lambda: f64,
}

impl Default for IkConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            position_tolerance: 1e-3,
            smoothing_weight: 0.05,
            singularity_weight: 1e-6,
            singularity_threshold: 1e-3,
            step_tolerance: 1e-10,
            lm_initial_lambda: 1e-3,
            lm_lambda_factor: 10.0,
            lm_min_lambda: 1e-7,
            lm_max_lambda: 1e7,
        }
    }
}

impl IkConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for the iteration cap.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Builder-style setter for the position tolerance.
    pub fn with_position_tolerance(mut self, meters: f64) -> Self {
        self.position_tolerance = meters;
        self
    }

    /// Builder-style setter for the smoothing weight.
    pub fn with_smoothing_weight(mut self, weight: f64) -> Self {
        self.smoothing_weight = weight;
        self
    }

    /// Builder-style setter for the singularity-penalty weight.
    pub fn with_singularity_weight(mut self, weight: f64) -> Self {
        self.singularity_weight = weight;
        self
    }
}

/// Result of an IK solve.
#[derive(Clone, Debug)]
pub struct IkResult {
    /// Final joint configuration (radians), inside the limits.
    pub joints: JointVector,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Final TCP position error (meters).
    pub residual: f64,
    /// Whether the residual fell below the position tolerance.
    pub converged: bool,
}

impl IkResult {
    /// The joint solution, or `None` when the solve did not converge.
    pub fn solution(&self) -> Option<JointVector> {
        self.converged.then_some(self.joints)
    }
}

/// Solve position-only IK for a target in the robot's local frame.
///
/// The seed doubles as the smoothing anchor: among the many joint
/// configurations reaching the target, the solver prefers one close to the
/// seed, which keeps consecutive solves along a trajectory in a single arm
/// branch.
pub fn solve_ik(
    target_local: &Vector3<f64>,
    seed: &JointVector,
    limits: &[JointLimits; JOINT_COUNT],
    config: &IkConfig,
) -> IkResult {
    let mut joints = project_into_limits(seed, limits);
    let mut residual = (forward_kinematics(&joints) - target_local).norm();

    if residual < config.position_tolerance {
        return IkResult {
            joints,
            iterations: 0,
            residual,
            converged: true,
        };
    }

    let mut cost = scalar_cost(&joints, target_local, seed, config);
    let mut lambda = config.lm_initial_lambda;
    let mut iterations = 0;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;

        let error = forward_kinematics(&joints) - target_local;
        let jacobian = position_jacobian(&joints);

        // Normal equations of the position residual, with Tikhonov
        // regularization toward the seed standing in for the smoothing term.
        let mut hessian = jacobian.transpose() * jacobian;
        let mut gradient = jacobian.transpose() * error;
        for j in 0..JOINT_COUNT {
            hessian[(j, j)] += config.smoothing_weight + lambda;
            gradient[j] += config.smoothing_weight * (joints[j] - seed[j]);
        }

        let Some(cholesky) = nalgebra::Cholesky::new(hessian) else {
            lambda *= config.lm_lambda_factor;
            if lambda > config.lm_max_lambda {
                break;
            }
            continue;
        };
        let step = -cholesky.solve(&gradient);

        let trial = project_into_limits(&(joints + step), limits);
        let trial_cost = scalar_cost(&trial, target_local, seed, config);

        if trial_cost < cost {
            // Good step: accept and relax the damping.
            let step_norm = (trial - joints).norm();
            joints = trial;
            cost = trial_cost;
            residual = (forward_kinematics(&joints) - target_local).norm();
            lambda = (lambda / config.lm_lambda_factor).max(config.lm_min_lambda);

            if residual < config.position_tolerance || step_norm < config.step_tolerance {
                break;
            }
        } else {
            // Bad step: reject and increase the damping.
            lambda *= config.lm_lambda_factor;
            if lambda > config.lm_max_lambda {
                break;
            }
        }
    }

    IkResult {
        joints,
        iterations,
        residual,
        converged: residual < config.position_tolerance,
    }
}

/// The scalar cost used to accept or reject candidate steps.
fn scalar_cost(
    joints: &JointVector,
    target_local: &Vector3<f64>,
    seed: &JointVector,
    config: &IkConfig,
) -> f64 {
    let position = (forward_kinematics(joints) - target_local).norm();
    let smoothness = (joints - seed).norm();
    position
        + config.smoothing_weight * smoothness
        + singularity_penalty(&position_jacobian(joints), config)
}

/// Penalty that repels iterates from rank-deficient Jacobians. Ill-conditioned
/// decompositions contribute zero rather than poisoning the cost.
fn singularity_penalty(jacobian: &SMatrix<f64, 3, JOINT_COUNT>, config: &IkConfig) -> f64 {
    let singular_values = jacobian.svd(false, false).singular_values;
    let sigma_min = singular_values.min();
    if sigma_min.is_finite() && sigma_min < config.singularity_threshold {
        config.singularity_weight / (1e-8 + sigma_min)
    } else {
        0.0
    }
}
