//! The planning pipeline driver.
//!
//! A [`Planner`] is constructed per request and runs the whole pipeline
//! synchronously: parse and validate the input, assign operations to robots,
//! synthesise per-robot schedules, resolve collisions, and render the result.
//! It holds no state across runs; callers wanting parallel plans instantiate
//! independent planners.

use crate::assignment;
use crate::collision;
use crate::config::PlannerConfig;
use crate::core::types::Plan;
use crate::error::Result;
use crate::io;
use crate::trajectory;

/// Motion-schedule planner for a fleet of identical six-axis manipulators.
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a complete work cell from input text.
    ///
    /// Fails without a partial result on malformed input, an operation no
    /// robot can service, IK divergence during synthesis, or unresolvable
    /// collisions.
    pub fn plan(&self, input: &str) -> Result<Plan> {
        let cell = io::parse(input)?;
        log::info!(
            "planning {} operations across {} robots",
            cell.num_operations(),
            cell.num_robots()
        );

        let assignment = assignment::assign(&cell, &self.config)?;

        let mut schedules = Vec::with_capacity(cell.num_robots());
        for robot in 0..cell.num_robots() {
            schedules.push(trajectory::synthesise(
                robot,
                &cell,
                &assignment.per_robot[robot],
                &self.config,
            )?);
        }

        collision::resolve(&mut schedules, cell.min_separation(), &self.config)?;

        let makespan_ms = schedules
            .iter()
            .filter_map(|s| s.last())
            .map(|wp| wp.time_ms)
            .max()
            .unwrap_or(0);
        log::info!("plan complete, makespan {} ms", makespan_ms);

        Ok(Plan {
            makespan_ms,
            schedules,
        })
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Plan {
    /// Render the plan as the output text block.
    pub fn render(&self) -> String {
        io::render(self)
    }
}
