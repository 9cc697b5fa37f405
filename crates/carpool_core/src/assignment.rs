//! Phased assignment engine: orders drivers furthest-first, fills each car in
//! score order, then sweeps leftover outbound passengers into the
//! least-detour car with seats.
//!
//! Drivers far from the event sit at the top of the order because their
//! direct route crosses the most passenger homes; matching them first keeps
//! the cheap pickups for the cars that can make them.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::context::MatcherContext;
use crate::matching::{evaluate_pair, CapacityMatcher, MatchDecision, Matcher};
use crate::people::{genders_align, Driver, GenderPreference, Passenger, TripDirection};

/// Runs the full assignment for one matching call, mutating the context
/// ledger. Expects already-filtered inputs.
pub fn run_assignment(passengers: &[Passenger], drivers: &[Driver], ctx: &mut MatcherContext) {
    let order = driver_processing_order(passengers, drivers, ctx);

    match ctx.direction {
        TripDirection::FromEvent => {
            let early: Vec<&Driver> = order.iter().copied().filter(|d| d.leaving_early).collect();
            let normal: Vec<&Driver> = order.iter().copied().filter(|d| !d.leaving_early).collect();

            assign_scored_phase(&early, passengers, true, ctx);
            assign_scored_phase(&normal, passengers, false, ctx);
            sweep_unmatched(passengers, &normal, ctx);
        }
        TripDirection::ToEvent => {
            assign_inbound(&order, passengers, ctx);
        }
    }
}

/// Drivers sorted furthest-first by direct distance. Ties prefer the driver
/// whose gender satisfies more of the same-gender-preferring passengers; the
/// count is materialized once rather than recomputed per comparison.
fn driver_processing_order<'a>(
    passengers: &[Passenger],
    drivers: &'a [Driver],
    ctx: &MatcherContext,
) -> Vec<&'a Driver> {
    let same_gender_demand: HashMap<&str, usize> = drivers
        .iter()
        .map(|driver| {
            let count = passengers
                .iter()
                .filter(|p| {
                    p.gender_preference == GenderPreference::SameGender
                        && genders_align(p.gender, driver.gender)
                })
                .count();
            (driver.id.as_str(), count)
        })
        .collect();

    let mut order: Vec<&Driver> = drivers.iter().collect();
    order.sort_by(|a, b| {
        let dist_a = ctx.direct_distance(&a.id);
        let dist_b = ctx.direct_distance(&b.id);
        dist_b
            .partial_cmp(&dist_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| same_gender_demand[b.id.as_str()].cmp(&same_gender_demand[a.id.as_str()]))
    });
    order
}

/// Scores every eligible candidate against the driver, then appends in
/// descending score order while seats remain and the score is positive.
/// Scores are not recomputed as the car fills.
fn assign_scored_phase(
    drivers_in_order: &[&Driver],
    passengers: &[Passenger],
    want_early: bool,
    ctx: &mut MatcherContext,
) {
    for driver in drivers_in_order {
        let mut scored: Vec<(&Passenger, f64)> = passengers
            .iter()
            .filter(|p| ctx.is_available(&p.id) && p.leaving_early == want_early)
            .filter_map(|p| {
                evaluate_pair(p, driver, ctx)
                    .accepted_score()
                    .map(|score| (p, score))
            })
            .collect();
        // Stable sort: equal scores keep passenger enumeration order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        for (passenger, score) in scored {
            if score <= 0.0 {
                break;
            }
            if CapacityMatcher.evaluate(passenger, driver, ctx) == MatchDecision::HardReject {
                break;
            }
            ctx.assign(&driver.id, &passenger.id);
            debug!(
                driver = %driver.id,
                passenger = %passenger.id,
                score,
                "assigned by score"
            );
        }
    }
}

/// Inbound pass: single phase over all drivers, with the total detour
/// re-checked against the cap at append time as the route grows.
fn assign_inbound(order: &[&Driver], passengers: &[Passenger], ctx: &mut MatcherContext) {
    for driver in order {
        let mut scored: Vec<(&Passenger, f64)> = passengers
            .iter()
            .filter(|p| ctx.is_available(&p.id))
            .filter_map(|p| {
                evaluate_pair(p, driver, ctx)
                    .accepted_score()
                    .map(|score| (p, score))
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        for (passenger, score) in scored {
            if CapacityMatcher.evaluate(passenger, driver, ctx) == MatchDecision::HardReject {
                break;
            }
            let mut extended = ctx.assigned(&driver.id).to_vec();
            extended.push(passenger.id.clone());
            if ctx.total_detour(&driver.id, &extended) > ctx.config.max_detour_miles {
                // A nearer candidate later in score order may still fit.
                continue;
            }
            ctx.assign(&driver.id, &passenger.id);
            debug!(
                driver = %driver.id,
                passenger = %passenger.id,
                score,
                "assigned inbound"
            );
        }
    }
}

/// Everyone-gets-a-ride pass for outbound trips: each remaining non-early
/// passenger goes to the seat whose route grows the least. Detour is the
/// objective here, not a filter; the hard constraints that define group
/// validity (early partition, enforced gender preference) still hold.
fn sweep_unmatched(
    passengers: &[Passenger],
    normal_drivers_in_order: &[&Driver],
    ctx: &mut MatcherContext,
) {
    for passenger in passengers.iter().filter(|p| !p.leaving_early) {
        if !ctx.is_available(&passenger.id) {
            continue;
        }

        let mut best: Option<(&Driver, f64)> = None;
        for driver in normal_drivers_in_order {
            if ctx.remaining_seats(&driver.id) == 0 {
                continue;
            }
            if ctx.config.enforce_gender_preference
                && passenger.gender_preference == GenderPreference::SameGender
                && !genders_align(passenger.gender, driver.gender)
            {
                continue;
            }

            let current = ctx.assigned(&driver.id);
            let mut extended = current.to_vec();
            extended.push(passenger.id.clone());
            let incremental =
                ctx.route_distance(&driver.id, &extended) - ctx.route_distance(&driver.id, current);
            if !incremental.is_finite() {
                continue;
            }

            match best {
                None => best = Some((driver, incremental)),
                Some((_, best_incremental)) if incremental < best_incremental => {
                    best = Some((driver, incremental))
                }
                _ => {}
            }
        }

        if let Some((driver, incremental)) = best {
            ctx.assign(&driver.id, &passenger.id);
            debug!(
                driver = %driver.id,
                passenger = %passenger.id,
                incremental,
                "assigned by sweep"
            );
        }
    }
}
