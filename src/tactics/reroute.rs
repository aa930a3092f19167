//! Sidestep search used when the direct next step is unsafe

use crate::battlefield::{Battlefield, UnitSnapshot};
use crate::core::types::Point;
use crate::tactics::threat::square_safety;
use crate::tactics::travel_distance;

/// Find a tolerable neighbour of `src` that is strictly closer to `dst`.
///
/// A neighbour that is as close as the direct (unsafe) step would have been
/// is taken immediately. Otherwise the closest tolerable neighbour wins, with
/// earlier neighbours in probe order kept on ties. `None` means hold position.
pub fn reroute<W: Battlefield + ?Sized>(
    world: &W,
    src: Point,
    dst: Point,
    enemies: &[UnitSnapshot],
) -> Option<Point> {
    let current = travel_distance(world, src, dst);
    let direct_step = src.step(world.next_step_direction(src, dst));
    let ideal = travel_distance(world, direct_step, dst);

    let mut best: Option<(Point, u32)> = None;

    for candidate in src.neighbors() {
        let distance = travel_distance(world, candidate, dst);
        if distance >= current {
            continue;
        }
        if !square_safety(world, candidate, enemies).is_tolerable() {
            continue;
        }
        if distance == ideal {
            return Some(candidate);
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    best.map(|(p, _)| p)
}
