//! Sampled multi-robot separation checking and resolution.
//!
//! Schedules are piecewise-linear TCP paths. For every robot pair whose
//! active time windows overlap, the pair's distance is sampled across the
//! overlap at a fixed step; any sample under the minimum separation marks the
//! schedule as colliding. Resolution delays every robot except the
//! lowest-indexed one by a fixed amount and re-checks, up to an attempt cap.
//!
//! Sampling is conservative given the trajectory sub-segmenting: between
//! consecutive samples each arm moves a small fraction of the separation
//! bound at realistic joint velocities.

use nalgebra::Vector3;

use crate::config::PlannerConfig;
use crate::core::math::lerp;
use crate::core::types::{Schedule, Waypoint};
use crate::error::{PlanError, Result};

/// First separation violation found in a schedule set.
#[derive(Clone, Copy, Debug)]
pub struct Violation {
    pub robots: (usize, usize),
    pub time_ms: i64,
    pub distance: f64,
}

/// TCP position of a schedule at a time, by linear interpolation.
///
/// Clamped at both ends: before the first waypoint the robot sits at its
/// first position, after the last at its final one. Zero-length dwell
/// boundaries (equal times) resolve to the earlier waypoint.
pub fn position_at(schedule: &[Waypoint], time_ms: i64) -> Vector3<f64> {
    debug_assert!(!schedule.is_empty(), "schedules always hold one waypoint");

    let first = &schedule[0];
    if time_ms <= first.time_ms {
        return first.position;
    }
    for pair in schedule.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if time_ms <= b.time_ms {
            if a.time_ms == b.time_ms {
                return a.position;
            }
            let t = (time_ms - a.time_ms) as f64 / (b.time_ms - a.time_ms) as f64;
            return lerp(&a.position, &b.position, t);
        }
    }
    schedule[schedule.len() - 1].position
}

/// Find the first pairwise separation violation, if any.
pub fn find_violation(
    schedules: &[Schedule],
    min_separation: f64,
    step_ms: i64,
) -> Option<Violation> {
    for r1 in 0..schedules.len() {
        for r2 in (r1 + 1)..schedules.len() {
            let (first1, last1) = window(&schedules[r1]);
            let (first2, last2) = window(&schedules[r2]);

            let start = first1.max(first2);
            let end = last1.min(last2);
            if start > end {
                continue;
            }

            let mut time_ms = start;
            loop {
                let distance =
                    (position_at(&schedules[r1], time_ms) - position_at(&schedules[r2], time_ms))
                        .norm();
                if distance < min_separation {
                    return Some(Violation {
                        robots: (r1, r2),
                        time_ms,
                        distance,
                    });
                }
                if time_ms == end {
                    break;
                }
                time_ms = (time_ms + step_ms).min(end);
            }
        }
    }
    None
}

/// Delay every waypoint of a schedule by `delay_ms`.
fn delay_schedule(schedule: &mut Schedule, delay_ms: i64) {
    for wp in schedule.iter_mut() {
        wp.time_ms += delay_ms;
    }
}

/// Resolve collisions in place by delaying all robots but the first.
///
/// Returns the number of attempts spent. Already-clean schedules pass
/// through untouched.
pub fn resolve(
    schedules: &mut [Schedule],
    min_separation: f64,
    config: &PlannerConfig,
) -> Result<usize> {
    let mut attempts = 0;

    while let Some(violation) =
        find_violation(schedules, min_separation, config.collision_step_ms)
    {
        if attempts >= config.max_resolution_attempts {
            return Err(PlanError::CollisionUnresolved { attempts });
        }
        log::debug!(
            "collision between robots {} and {} at {} ms ({:.3} m < {:.3} m), delaying",
            violation.robots.0 + 1,
            violation.robots.1 + 1,
            violation.time_ms,
            violation.distance,
            min_separation
        );
        for schedule in schedules.iter_mut().skip(1) {
            delay_schedule(schedule, config.resolution_delay_ms);
        }
        attempts += 1;
    }

    if attempts > 0 {
        log::info!("collisions resolved after {} attempts", attempts);
    }
    Ok(attempts)
}

fn window(schedule: &[Waypoint]) -> (i64, i64) {
    (
        schedule.first().map_or(0, |wp| wp.time_ms),
        schedule.last().map_or(0, |wp| wp.time_ms),
    )
}
