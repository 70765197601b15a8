//! Operation-to-robot assignment under a makespan objective.
//!
//! The cost of servicing one operation in isolation is the move from the
//! robot's base to the pick point, the pick-to-place transfer, and two
//! process dwells; unreachable operations cost infinity. Small instances are
//! solved exactly by branch-and-bound over the resulting binary program;
//! larger ones fall back to list scheduling: operations are taken in input
//! order and each goes to the eligible robot with the earliest projected
//! completion, ties to the lower index.

mod branch_bound;

use nalgebra::Vector3;

use crate::config::PlannerConfig;
use crate::core::types::{Assignment, JointVector, WorkCell};
use crate::error::{PlanError, Result};
use crate::kinematics::Arm;
use crate::timing::move_between;

/// Isolation service times, `None` where the operation is unreachable.
pub struct CostMatrix {
    costs: Vec<Vec<Option<i64>>>,
}

impl CostMatrix {
    /// Estimate every robot/operation pairing.
    ///
    /// Fails with [`PlanError::Unreachable`] when some operation has no
    /// eligible robot; individual IK failures merely disqualify one robot.
    pub fn build(cell: &WorkCell, arms: &[Arm]) -> Result<Self> {
        let mut costs = Vec::with_capacity(cell.num_operations());

        for (i, op) in cell.operations.iter().enumerate() {
            let mut row = Vec::with_capacity(arms.len());
            for arm in arms {
                row.push(service_cost(arm, &arm.base(), op.pick, op.place, op.process_time_ms));
            }
            if row.iter().all(Option::is_none) {
                return Err(PlanError::Unreachable { op: i });
            }
            costs.push(row);
        }

        Ok(Self { costs })
    }

    #[inline]
    pub fn get(&self, op: usize, robot: usize) -> Option<i64> {
        self.costs[op][robot]
    }

    #[inline]
    pub fn is_eligible(&self, op: usize, robot: usize) -> bool {
        self.costs[op][robot].is_some()
    }

    pub fn num_operations(&self) -> usize {
        self.costs.len()
    }
}

/// Isolation cost of one operation for one robot, `None` when ineligible.
fn service_cost(
    arm: &Arm,
    from: &Vector3<f64>,
    pick: Vector3<f64>,
    place: Vector3<f64>,
    process_time_ms: i64,
) -> Option<i64> {
    if !arm.reachable(&pick) || !arm.reachable(&place) {
        return None;
    }
    let approach = move_between(arm, from, &pick, &JointVector::zeros())?;
    let transfer = move_between(arm, &pick, &place, &approach.joints)?;
    Some(approach.duration_ms + transfer.duration_ms + 2 * process_time_ms)
}

/// Running state of one robot during list scheduling.
struct RobotState {
    position: Vector3<f64>,
    joints: JointVector,
    load_ms: i64,
}

/// Assign every operation to a robot.
pub fn assign(cell: &WorkCell, config: &PlannerConfig) -> Result<Assignment> {
    let arms: Vec<Arm> = cell
        .bases
        .iter()
        .map(|&base| Arm::new(base, &cell.joint_limits, config))
        .collect();

    let cost = CostMatrix::build(cell, &arms)?;
    let greedy = list_schedule(cell, &arms, &cost)?;

    if cell.num_robots() > 1 && cell.num_operations() <= config.exact_assignment_max_ops {
        let exact = branch_bound::refine(&cost, cell.num_robots(), &greedy, config.assignment_node_cap);
        log::debug!(
            "assignment: exact search makespan {} ms vs greedy {} ms",
            branch_bound::isolation_makespan(&cost, &exact),
            branch_bound::isolation_makespan(&cost, &greedy),
        );
        return Ok(exact);
    }

    Ok(greedy)
}

/// List-scheduling heuristic: input order, earliest projected completion.
fn list_schedule(cell: &WorkCell, arms: &[Arm], cost: &CostMatrix) -> Result<Assignment> {
    let mut states: Vec<RobotState> = cell
        .bases
        .iter()
        .map(|&base| RobotState {
            position: base,
            joints: JointVector::zeros(),
            load_ms: 0,
        })
        .collect();
    let mut assignment = Assignment::empty(cell.num_robots());

    for (i, op) in cell.operations.iter().enumerate() {
        let mut best: Option<(usize, i64, JointVector)> = None;

        for (r, arm) in arms.iter().enumerate() {
            if !cost.is_eligible(i, r) {
                continue;
            }
            let state = &states[r];
            let Some(approach) = move_between(arm, &state.position, &op.pick, &state.joints)
            else {
                continue;
            };
            let Some(transfer) = move_between(arm, &op.pick, &op.place, &approach.joints) else {
                continue;
            };
            let projected = state.load_ms
                + approach.duration_ms
                + transfer.duration_ms
                + 2 * op.process_time_ms;

            if best.as_ref().map_or(true, |&(_, t, _)| projected < t) {
                best = Some((r, projected, transfer.joints));
            }
        }

        let (r, projected, joints) = best.ok_or(PlanError::Unreachable { op: i })?;
        assignment.per_robot[r].push(i);
        states[r].position = op.place;
        states[r].joints = joints;
        states[r].load_ms = projected;
    }

    Ok(assignment)
}
