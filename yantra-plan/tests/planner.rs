//! End-to-end planner tests over complete work cells.
//!
//! Each scenario feeds input text through the full pipeline and checks the
//! plan invariants: feasibility of every waypoint, monotone time, dwell
//! conservation, pairwise separation, and makespan consistency.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use yantra_plan::collision::{find_violation, position_at, resolve};
use yantra_plan::core::types::{JointVector, Plan, Schedule};
use yantra_plan::kinematics::{forward_kinematics, Arm};
use yantra_plan::{assignment, trajectory};
use yantra_plan::{io, JointLimits, PlanError, Planner, PlannerConfig, JOINT_COUNT};

/// Joint-limit block used by every scenario: wide range on joints 1, 4, 6.
const LIMIT_LINES: &str = "\
-170 170 90 45
-120 120 90 45
-120 120 90 45
-170 170 90 45
-120 120 90 45
-170 170 90 45
0.1 0.2
";

fn input(bases: &[[f64; 3]], ops: &[[f64; 7]]) -> String {
    let mut text = format!("{} {}\n", bases.len(), ops.len());
    for b in bases {
        text.push_str(&format!("{} {} {}\n", b[0], b[1], b[2]));
    }
    text.push_str(LIMIT_LINES);
    for op in ops {
        text.push_str(&format!(
            "{} {} {} {} {} {} {}\n",
            op[0], op[1], op[2], op[3], op[4], op[5], op[6]
        ));
    }
    text
}

fn scenario_limits() -> [JointLimits; JOINT_COUNT] {
    [
        JointLimits::new(-170.0, 170.0, 90.0, 45.0),
        JointLimits::new(-120.0, 120.0, 90.0, 45.0),
        JointLimits::new(-120.0, 120.0, 90.0, 45.0),
        JointLimits::new(-170.0, 170.0, 90.0, 45.0),
        JointLimits::new(-120.0, 120.0, 90.0, 45.0),
        JointLimits::new(-170.0, 170.0, 90.0, 45.0),
    ]
}

/// Times never decrease within any schedule.
fn assert_monotone_time(plan: &Plan) {
    for schedule in &plan.schedules {
        assert!(
            schedule.windows(2).all(|w| w[0].time_ms <= w[1].time_ms),
            "waypoint times must be non-decreasing"
        );
    }
}

/// The emitted makespan is the maximum of per-robot last times.
fn assert_makespan_consistent(plan: &Plan) {
    let expected = plan
        .schedules
        .iter()
        .filter_map(|s| s.last())
        .map(|wp| wp.time_ms)
        .max()
        .unwrap_or(0);
    assert_eq!(plan.makespan_ms, expected);
}

/// Every waypoint admits an in-limit IK solution, walking the schedule so
/// each solve is seeded by its predecessor.
fn assert_waypoints_feasible(plan: &Plan, bases: &[[f64; 3]]) {
    let limits = scenario_limits();
    let config = PlannerConfig::default();
    for (r, schedule) in plan.schedules.iter().enumerate() {
        let base = Vector3::from_row_slice(&bases[r]);
        let arm = Arm::new(base, &limits, &config);
        let mut seed = JointVector::zeros();
        // The first waypoint is the rest pose at the base origin itself,
        // which no TCP configuration reaches; feasibility starts after it.
        for wp in schedule.iter().skip(1) {
            let result = arm.solve(&wp.position, &seed);
            assert!(
                result.converged,
                "robot {} waypoint at t={} is infeasible",
                r + 1,
                wp.time_ms
            );
            seed = result.joints;
        }
    }
}

/// Total rest time at a point equals the process time (P3).
fn dwell_at(schedule: &Schedule, point: &Vector3<f64>) -> i64 {
    schedule
        .windows(2)
        .filter(|w| {
            (w[0].position - point).norm() < 1e-9 && (w[1].position - point).norm() < 1e-9
        })
        .map(|w| w[1].time_ms - w[0].time_ms)
        .sum()
}

/// Sample the whole horizon and return the smallest pairwise distance.
fn min_pairwise_distance(plan: &Plan, step_ms: i64) -> f64 {
    let mut min = f64::INFINITY;
    let mut t = 0;
    while t <= plan.makespan_ms {
        for r1 in 0..plan.schedules.len() {
            for r2 in (r1 + 1)..plan.schedules.len() {
                let d = (position_at(&plan.schedules[r1], t)
                    - position_at(&plan.schedules[r2], t))
                .norm();
                min = min.min(d);
            }
        }
        t += step_ms;
    }
    min
}

#[test]
fn test_single_robot_single_op_four_phases() {
    let bases = [[0.0, 0.0, 0.0]];
    let ops = [[0.4, 0.3, 0.3, 0.3, 0.4, 0.35, 500.0]];
    let plan = Planner::default().plan(&input(&bases, &ops)).unwrap();

    assert_monotone_time(&plan);
    assert_makespan_consistent(&plan);
    assert_waypoints_feasible(&plan, &bases);

    let schedule = &plan.schedules[0];
    let pick = Vector3::new(0.4, 0.3, 0.3);
    let place = Vector3::new(0.3, 0.4, 0.35);

    // Grasp and release dwells both conserve the process time.
    assert_eq!(dwell_at(schedule, &pick), 500);
    assert_eq!(dwell_at(schedule, &place), 500);

    // The schedule starts at the base and ends at the place point.
    assert_eq!(schedule[0].time_ms, 0);
    assert!((schedule[0].position - Vector3::zeros()).norm() < 1e-9);
    assert!((schedule.last().unwrap().position - place).norm() < 1e-9);
    assert_eq!(plan.makespan_ms, schedule.last().unwrap().time_ms);
}

#[test]
fn test_two_robots_one_op_idle_robot_parks() {
    let bases = [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]];
    let ops = [[0.3, 0.3, 0.3, 0.4, 0.4, 0.3, 200.0]];
    let plan = Planner::default().plan(&input(&bases, &ops)).unwrap();

    // The closer robot does the work; the other parks at its base.
    assert!(plan.schedules[0].len() > 1);
    assert_eq!(plan.schedules[1].len(), 1);
    assert_eq!(plan.schedules[1][0].time_ms, 0);
    assert!((plan.schedules[1][0].position - Vector3::new(1.5, 0.0, 0.0)).norm() < 1e-9);

    let text = plan.render();
    assert!(text.contains("R2 1\n0 1.5 0.0 0.0"), "{text}");

    assert!(min_pairwise_distance(&plan, 5) >= 0.4);
}

#[test]
fn test_concurrent_ops_without_conflict_resolve_is_noop() {
    let bases = [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]];
    let ops = [
        [0.35, 0.25, 0.3, 0.45, 0.35, 0.3, 300.0],
        [1.15, 0.25, 0.3, 1.05, 0.35, 0.3, 300.0],
    ];
    let plan = Planner::default().plan(&input(&bases, &ops)).unwrap();

    // Both robots work, with overlapping time windows.
    assert!(plan.schedules.iter().all(|s| s.len() > 1));
    assert!(min_pairwise_distance(&plan, 5) >= 0.4);

    // Applying the resolver to the finished plan changes nothing.
    let mut schedules = plan.schedules.clone();
    let attempts = resolve(&mut schedules, 0.4, &PlannerConfig::default()).unwrap();
    assert_eq!(attempts, 0);
    assert_eq!(schedules, plan.schedules);
}

#[test]
fn test_shared_corridor_forces_delays() {
    let bases = [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]];
    let ops = [
        [0.72, 0.0, 0.3, 0.3, 0.0, 0.3, 1500.0],
        [0.78, 0.0, 0.3, 1.2, 0.0, 0.3, 1500.0],
    ];
    let text = input(&bases, &ops);
    let config = PlannerConfig::default();

    // Build the unresolved schedules by hand: the corridor must collide.
    let cell = io::parse(&text).unwrap();
    let assigned = assignment::assign(&cell, &config).unwrap();
    let mut schedules: Vec<Schedule> = (0..cell.num_robots())
        .map(|r| trajectory::synthesise(r, &cell, &assigned.per_robot[r], &config).unwrap())
        .collect();
    assert!(
        find_violation(&schedules, cell.min_separation(), config.collision_step_ms).is_some(),
        "unresolved corridor schedules must violate separation"
    );
    let unresolved_makespan = schedules
        .iter()
        .filter_map(|s| s.last())
        .map(|wp| wp.time_ms)
        .max()
        .unwrap();

    let attempts = resolve(&mut schedules, cell.min_separation(), &config).unwrap();
    assert!(attempts > 0);

    // The full pipeline agrees with the hand-built resolution.
    let plan = Planner::new(config.clone()).plan(&text).unwrap();
    assert_eq!(plan.schedules, schedules);
    assert!(min_pairwise_distance(&plan, 5) >= 0.4);
    assert_makespan_consistent(&plan);

    // The second robot was pushed back by whole delay steps; the plan only
    // ever stretches.
    let shift = plan.schedules[1][0].time_ms;
    assert_eq!(shift, attempts as i64 * config.resolution_delay_ms);
    assert!(plan.makespan_ms >= unresolved_makespan);
}

#[test]
fn test_far_operation_is_unreachable() {
    let bases = [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]];
    let ops = [[3.0, 3.0, 0.0, 3.1, 3.0, 0.0, 100.0]];
    let err = Planner::default().plan(&input(&bases, &ops)).unwrap_err();
    assert!(matches!(err, PlanError::Unreachable { op: 0 }));
}

#[test]
fn test_missing_joint_line_is_shape_error() {
    let full = input(&[[0.0, 0.0, 0.0]], &[[0.4, 0.3, 0.3, 0.3, 0.4, 0.3, 100.0]]);
    let truncated = full.replace("-120 120 90 45\n-170 170 90 45\n0.1 0.2", "0.1 0.2");
    let err = Planner::default().plan(&truncated).unwrap_err();
    assert!(matches!(err, PlanError::InputShape(_)));
}

#[test]
fn test_fk_ik_round_trip() {
    // Draw joint vectors inside the limits, keep those whose TCP lands well
    // inside the workspace, and require the planner's own reachability to
    // agree, with IK recovering the position from the original seed.
    let limits = scenario_limits();
    let config = PlannerConfig::default();
    let arm = Arm::new(Vector3::zeros(), &limits, &config);
    let mut rng = StdRng::seed_from_u64(7);

    let mut checked = 0;
    while checked < 12 {
        let mut joints = JointVector::zeros();
        for j in 0..JOINT_COUNT {
            joints[j] = rng.gen_range(limits[j].min_rad()..limits[j].max_rad());
        }
        let target = forward_kinematics(&joints);
        let radius = (target.x * target.x + target.y * target.y).sqrt();
        if radius < 0.3 || !(0.3..=0.85).contains(&target.norm()) || !(0.05..=0.6).contains(&target.z) {
            continue;
        }
        checked += 1;

        assert!(arm.reachable(&target), "target {target:?} should be reachable");

        let recovered = arm.solve(&target, &joints);
        assert!(recovered.converged);
        assert!((forward_kinematics(&recovered.joints) - target).norm() < 1e-3);

        // A perturbed seed still converges back onto the target position.
        let mut nudged = joints;
        for j in 0..JOINT_COUNT {
            nudged[j] = (nudged[j] + rng.gen_range(-0.05..0.05))
                .clamp(limits[j].min_rad(), limits[j].max_rad());
        }
        let from_nudge = arm.solve(&target, &nudged);
        assert!(from_nudge.converged);
        assert!((forward_kinematics(&from_nudge.joints) - target).norm() < 1e-3);
    }
}

#[test]
fn test_zero_process_time_keeps_instant_markers() {
    let bases = [[0.0, 0.0, 0.0]];
    let ops = [[0.4, 0.3, 0.3, 0.3, 0.4, 0.3, 0.0]];
    let plan = Planner::default().plan(&input(&bases, &ops)).unwrap();

    assert_monotone_time(&plan);
    // Zero dwells still mark the contact instants with duplicate waypoints.
    let schedule = &plan.schedules[0];
    let pick = Vector3::new(0.4, 0.3, 0.3);
    assert_eq!(dwell_at(schedule, &pick), 0);
    let at_pick = schedule
        .iter()
        .filter(|wp| (wp.position - pick).norm() < 1e-9)
        .count();
    assert_eq!(at_pick, 2);
}

#[test]
fn test_multiple_ops_balance_across_robots() {
    let bases = [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]];
    let ops = [
        [0.3, 0.25, 0.3, 0.4, 0.3, 0.3, 250.0],
        [1.2, 0.25, 0.3, 1.1, 0.3, 0.3, 250.0],
        [0.35, -0.25, 0.3, 0.45, -0.3, 0.3, 250.0],
        [1.15, -0.25, 0.3, 1.05, -0.3, 0.3, 250.0],
    ];
    let plan = Planner::default().plan(&input(&bases, &ops)).unwrap();

    assert_monotone_time(&plan);
    assert_makespan_consistent(&plan);
    assert_waypoints_feasible(&plan, &bases);
    assert!(min_pairwise_distance(&plan, 5) >= 0.4);

    // The side ops are cheap for exactly one robot each; neither robot idles.
    assert!(plan.schedules.iter().all(|s| s.len() > 1));
}
