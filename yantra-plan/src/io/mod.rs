//! Line-oriented text input and output.
//!
//! The input is UTF-8 text with whitespace-separated fields; blank lines are
//! ignored. Exactly `1 + K + 6 + 1 + N` non-empty lines:
//!
//! ```text
//! K N
//! bx by bz                  (per robot)
//! min max vmax amax         (per joint, six lines)
//! tool_clearance safe_distance
//! pick_x pick_y pick_z place_x place_y place_z process_time_ms   (per op)
//! ```
//!
//! The output is the makespan followed by one `R<i> <m>` block per robot,
//! coordinates to one decimal place.

use nalgebra::Vector3;

use crate::core::types::{JointLimits, Operation, Plan, WorkCell, JOINT_COUNT};
use crate::error::{PlanError, Result};

/// Parse and validate a planning request.
pub fn parse(input: &str) -> Result<WorkCell> {
    let lines: Vec<&str> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(PlanError::InputShape("empty input".to_string()));
    }

    let header = fields(lines[0], 2, "header")?;
    let num_robots = parse_count(header[0], "K")?;
    let num_operations = parse_count(header[1], "N")?;

    let expected = 1 + num_robots + JOINT_COUNT + 1 + num_operations;
    if lines.len() != expected {
        return Err(PlanError::InputShape(format!(
            "expected {} non-empty lines, found {}",
            expected,
            lines.len()
        )));
    }

    let mut cursor = 1;

    let mut bases = Vec::with_capacity(num_robots);
    for r in 0..num_robots {
        let f = numbers(lines[cursor + r], 3, "robot base")?;
        bases.push(Vector3::new(f[0], f[1], f[2]));
    }
    cursor += num_robots;

    let mut joint_limits = [JointLimits::new(0.0, 0.0, 0.0, 0.0); JOINT_COUNT];
    for (j, slot) in joint_limits.iter_mut().enumerate() {
        let f = numbers(lines[cursor + j], 4, "joint limits")?;
        let limits = JointLimits::new(f[0], f[1], f[2], f[3]);
        if limits.min_angle_deg > limits.max_angle_deg {
            return Err(PlanError::InputBounds(format!(
                "joint {}: min angle {} exceeds max angle {}",
                j + 1,
                limits.min_angle_deg,
                limits.max_angle_deg
            )));
        }
        if limits.max_velocity_deg <= 0.0 || limits.max_accel_deg <= 0.0 {
            return Err(PlanError::InputBounds(format!(
                "joint {}: velocity and acceleration must be positive",
                j + 1
            )));
        }
        *slot = limits;
    }
    cursor += JOINT_COUNT;

    let f = numbers(lines[cursor], 2, "safety parameters")?;
    let (tool_clearance, safe_distance) = (f[0], f[1]);
    if tool_clearance < 0.0 {
        return Err(PlanError::InputBounds(
            "tool clearance must be non-negative".to_string(),
        ));
    }
    if safe_distance <= 0.0 {
        return Err(PlanError::InputBounds(
            "safe distance must be positive".to_string(),
        ));
    }
    cursor += 1;

    let mut operations = Vec::with_capacity(num_operations);
    for i in 0..num_operations {
        let f = numbers(lines[cursor + i], 7, "operation")?;
        if f[6] < 0.0 {
            return Err(PlanError::InputBounds(format!(
                "operation {}: process time must be non-negative",
                i + 1
            )));
        }
        operations.push(Operation {
            pick: Vector3::new(f[0], f[1], f[2]),
            place: Vector3::new(f[3], f[4], f[5]),
            process_time_ms: f[6].round() as i64,
        });
    }

    Ok(WorkCell {
        bases,
        joint_limits,
        tool_clearance,
        safe_distance,
        operations,
    })
}

/// Render a plan as the output text block.
pub fn render(plan: &Plan) -> String {
    let mut out = String::new();
    out.push_str(&plan.makespan_ms.to_string());
    out.push('\n');

    for (r, schedule) in plan.schedules.iter().enumerate() {
        out.push_str(&format!("R{} {}\n", r + 1, schedule.len()));
        for wp in schedule {
            out.push_str(&format!(
                "{} {:.1} {:.1} {:.1}\n",
                wp.time_ms, wp.position.x, wp.position.y, wp.position.z
            ));
        }
    }

    out
}

fn fields<'a>(line: &'a str, count: usize, what: &str) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != count {
        return Err(PlanError::InputShape(format!(
            "{} line needs {} fields, found {}",
            what,
            count,
            fields.len()
        )));
    }
    Ok(fields)
}

fn numbers(line: &str, count: usize, what: &str) -> Result<Vec<f64>> {
    fields(line, count, what)?
        .iter()
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|_| PlanError::InputShape(format!("{}: malformed number {:?}", what, field)))
        })
        .collect()
}

fn parse_count(field: &str, what: &str) -> Result<usize> {
    let value: i64 = field
        .parse()
        .map_err(|_| PlanError::InputShape(format!("{} is not an integer: {:?}", what, field)))?;
    if value < 1 {
        return Err(PlanError::InputShape(format!("{} must be at least 1", what)));
    }
    Ok(value as usize)
}
