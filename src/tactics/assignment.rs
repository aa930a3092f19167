//! Objective assignment over the squad
//!
//! Each unit ranks the candidate points by weighted path length and keeps
//! its `U` best, where `U` is the number of units. Every combination of one
//! rank per unit is then scored and the cheapest conflict-free one wins.
//!
//! The search visits `U^U` combinations, so it is bounded by
//! `max_units` (four in a normal match).

use ordered_float::OrderedFloat;

use crate::battlefield::Battlefield;
use crate::core::error::{Result, TacticsError};
use crate::core::types::Point;
use crate::tactics::travel_distance;

/// Per unit, the index into the candidate points it was given, if any
pub type Assignment = Vec<Option<usize>>;

/// One entry in a unit's preference list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCandidate {
    pub point_index: usize,
    pub cost: f64,
}

#[derive(Debug, Clone)]
pub struct AssignmentOptimizer {
    max_units: usize,
}

impl AssignmentOptimizer {
    pub fn new(max_units: usize) -> Self {
        Self { max_units }
    }

    pub fn max_units(&self) -> usize {
        self.max_units
    }

    /// Assign at most one point per unit and at most one unit per point.
    ///
    /// `multiplier(i)` weights the path length to `points[i]`. Unassigned
    /// units only appear when there are fewer points than units.
    pub fn assign<W, F>(
        &self,
        world: &W,
        points: &[Point],
        units: &[Point],
        multiplier: F,
    ) -> Result<Assignment>
    where
        W: Battlefield + ?Sized,
        F: Fn(usize) -> f64,
    {
        let unit_count = units.len();
        if unit_count > self.max_units {
            return Err(TacticsError::SearchTooLarge {
                units: unit_count,
                limit: self.max_units,
            });
        }

        // 0^0 == 1: an empty squad has exactly one (empty) combination
        let combinations = u32::try_from(unit_count)
            .ok()
            .and_then(|exp| unit_count.checked_pow(exp))
            .ok_or(TacticsError::SearchTooLarge {
                units: unit_count,
                limit: self.max_units,
            })?;

        let preferences: Vec<Vec<RankedCandidate>> = units
            .iter()
            .map(|unit| rank_candidates(world, *unit, points, &multiplier, unit_count))
            .collect();

        let slack = unit_count.saturating_sub(points.len());

        let mut ranks = vec![0usize; unit_count];
        let mut best: Option<(f64, Assignment)> = None;

        for combination in 0..combinations {
            decode_ranks(combination, unit_count, &mut ranks);

            let Some((cost, assignment)) = score_combination(&preferences, &ranks, slack) else {
                continue;
            };

            if best.as_ref().map_or(true, |(best_cost, _)| cost < *best_cost) {
                best = Some((cost, assignment));
            }
        }

        let assignment = best
            .map(|(_, assignment)| assignment)
            .unwrap_or_else(|| vec![None; unit_count]);

        tracing::debug!(
            "Assigned {} of {} units over {} candidates",
            assignment.iter().filter(|a| a.is_some()).count(),
            unit_count,
            points.len()
        );

        Ok(assignment)
    }
}

/// Weighted costs from `unit` to every point, cheapest first, truncated to `keep`.
///
/// The sort is stable, so equal costs keep candidate list order.
pub fn rank_candidates<W, F>(
    world: &W,
    unit: Point,
    points: &[Point],
    multiplier: &F,
    keep: usize,
) -> Vec<RankedCandidate>
where
    W: Battlefield + ?Sized,
    F: Fn(usize) -> f64,
{
    let mut ranked: Vec<RankedCandidate> = points
        .iter()
        .enumerate()
        .map(|(point_index, point)| RankedCandidate {
            point_index,
            cost: travel_distance(world, unit, *point) as f64 * multiplier(point_index),
        })
        .collect();

    ranked.sort_by_key(|c| OrderedFloat(c.cost));
    ranked.truncate(keep);
    ranked
}

/// Spell `combination` in base `unit_count`, unit 0 as the most significant digit
fn decode_ranks(mut combination: usize, unit_count: usize, ranks: &mut [usize]) {
    for rank in ranks.iter_mut().rev() {
        *rank = combination % unit_count;
        combination /= unit_count;
    }
}

/// Total cost of one rank choice per unit, or None if it is not allowed
fn score_combination(
    preferences: &[Vec<RankedCandidate>],
    ranks: &[usize],
    slack: usize,
) -> Option<(f64, Assignment)> {
    let mut assignment = Vec::with_capacity(ranks.len());
    let mut empty = 0;
    let mut cost = 0.0;

    for (choices, &rank) in preferences.iter().zip(ranks) {
        match choices.get(rank) {
            Some(choice) => {
                if assignment.contains(&Some(choice.point_index)) {
                    return None;
                }
                cost += choice.cost;
                assignment.push(Some(choice.point_index));
            }
            None => {
                empty += 1;
                if empty > slack {
                    return None;
                }
                assignment.push(None);
            }
        }
    }

    Some((cost, assignment))
}
