//! Square safety against the enemy roster
//!
//! A square is in danger when an enemy can hit it right now, and calls for
//! caution when an enemy could hit it after a single step. The worst rating
//! over all enemies wins.

use serde::{Deserialize, Serialize};

use crate::battlefield::{Battlefield, UnitSnapshot};
use crate::core::types::Point;

/// Danger rating of a square. Lower is safer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Safety {
    #[default]
    Safe,
    Caution,
    Danger,
}

impl Safety {
    pub const SAFE_SCORE: f64 = 0.0;
    pub const CAUTION_SCORE: f64 = 5.0;
    pub const DANGER_SCORE: f64 = 10.0;

    /// Numeric score: 0.0, 5.0 or 10.0
    pub fn score(&self) -> f64 {
        match self {
            Safety::Safe => Self::SAFE_SCORE,
            Safety::Caution => Self::CAUTION_SCORE,
            Safety::Danger => Self::DANGER_SCORE,
        }
    }

    /// Squares at or below caution may be stepped on
    pub fn is_tolerable(&self) -> bool {
        *self <= Safety::Caution
    }
}

/// Rate `point` against every enemy in `enemies`.
///
/// Stops at the first enemy that can already hit the square. Callers pass
/// living enemies only.
pub fn square_safety<W: Battlefield + ?Sized>(
    world: &W,
    point: Point,
    enemies: &[UnitSnapshot],
) -> Safety {
    let mut safety = Safety::Safe;

    for enemy in enemies {
        let range = enemy.weapon.range();

        if world.can_shooter_hit_target(enemy.position, point, range) {
            return Safety::Danger;
        }

        if safety < Safety::Caution
            && enemy
                .position
                .neighbors()
                .iter()
                .any(|n| world.can_shooter_hit_target(*n, point, range))
        {
            safety = Safety::Caution;
        }
    }

    safety
}
