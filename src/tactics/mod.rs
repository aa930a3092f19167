//! Per-turn squad tactics
//!
//! Pipeline, leaf first:
//! - `threat` scores how dangerous a square is
//! - `reroute` finds a safer neighbouring step when the direct one is not
//! - `objective` holds the per-unit goal and chosen action
//! - `assignment` spreads objectives over the squad
//! - `coordinator` runs the whole turn and issues the actions

pub mod assignment;
pub mod coordinator;
pub mod objective;
pub mod reroute;
pub mod threat;

use crate::battlefield::{Battlefield, UnitSnapshot};
use crate::core::types::Point;

pub use assignment::{Assignment, AssignmentOptimizer};
pub use coordinator::{apply_record, TurnCoordinator};
pub use objective::{Action, ActionKind, Candidate, CandidateKind, Objective, TurnDecision, TurnRecord};
pub use reroute::reroute;
pub use threat::{square_safety, Safety};

/// Distance used for "no path". Compares greater than any real path.
pub const UNREACHABLE: u32 = u32::MAX;

/// Path length with the oracle's "0 means no path" folded into [`UNREACHABLE`]
pub fn travel_distance<W: Battlefield + ?Sized>(world: &W, from: Point, to: Point) -> u32 {
    if from == to {
        return 0;
    }
    match world.path_length(from, to) {
        0 => UNREACHABLE,
        steps => steps,
    }
}

/// Closest enemy by path length; the earliest roster slot wins ties
pub fn nearest_enemy<'a, W, I>(world: &W, from: Point, enemies: I) -> Option<&'a UnitSnapshot>
where
    W: Battlefield + ?Sized,
    I: IntoIterator<Item = &'a UnitSnapshot>,
{
    enemies
        .into_iter()
        .min_by_key(|enemy| travel_distance(world, from, enemy.position))
}
