//! Exact assignment by depth-first branch-and-bound.
//!
//! Explores the binary program of the makespan objective directly: operations
//! are placed one at a time (in input order) on each eligible robot, and a
//! subtree is pruned as soon as its cheapest possible makespan already
//! matches or exceeds the incumbent. The incumbent starts at the greedy
//! solution, so the search can only improve on it, and a node cap bounds the
//! worst case on adversarial instances.

use crate::core::types::Assignment;

use super::CostMatrix;

/// Makespan of an assignment under isolation costs.
pub(super) fn isolation_makespan(cost: &CostMatrix, assignment: &Assignment) -> i64 {
    assignment
        .per_robot
        .iter()
        .enumerate()
        .map(|(r, ops)| {
            ops.iter()
                .map(|&i| cost.get(i, r).expect("assigned operation must be eligible"))
                .sum::<i64>()
        })
        .max()
        .unwrap_or(0)
}

struct Search<'a> {
    cost: &'a CostMatrix,
    num_robots: usize,
    node_cap: usize,
    nodes: usize,
    best_makespan: i64,
    best: Vec<usize>,
    current: Vec<usize>,
}

/// Improve on an incumbent assignment, returning the best found.
///
/// The result is never worse than the incumbent under isolation costs; when
/// the node cap trips, whatever has been proven so far is kept.
pub(super) fn refine(
    cost: &CostMatrix,
    num_robots: usize,
    incumbent: &Assignment,
    node_cap: usize,
) -> Assignment {
    let num_ops = cost.num_operations();

    let mut incumbent_flat = vec![0usize; num_ops];
    for (r, ops) in incumbent.per_robot.iter().enumerate() {
        for &i in ops {
            incumbent_flat[i] = r;
        }
    }

    let mut search = Search {
        cost,
        num_robots,
        node_cap,
        nodes: 0,
        best_makespan: isolation_makespan(cost, incumbent),
        best: incumbent_flat,
        current: vec![0usize; num_ops],
    };

    let mut loads = vec![0i64; num_robots];
    search.descend(0, &mut loads);

    if search.nodes >= search.node_cap {
        log::debug!("assignment: node cap {} reached, keeping best-so-far", node_cap);
    }

    let mut result = Assignment::empty(num_robots);
    for (i, &r) in search.best.iter().enumerate() {
        result.per_robot[r].push(i);
    }
    result
}

impl Search<'_> {
    fn descend(&mut self, op: usize, loads: &mut [i64]) {
        if self.nodes >= self.node_cap {
            return;
        }
        self.nodes += 1;

        if op == self.cost.num_operations() {
            let makespan = loads.iter().copied().max().unwrap_or(0);
            if makespan < self.best_makespan {
                self.best_makespan = makespan;
                self.best.copy_from_slice(&self.current);
            }
            return;
        }

        for r in 0..self.num_robots {
            let Some(c) = self.cost.get(op, r) else {
                continue;
            };
            let new_load = loads[r] + c;
            if new_load >= self.best_makespan {
                continue;
            }

            loads[r] = new_load;
            self.current[op] = r;
            self.descend(op + 1, loads);
            loads[r] = new_load - c;
        }
    }
}
