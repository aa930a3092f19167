//! What each unit is trying to do this turn, and what it does about it

use serde::{Deserialize, Serialize};

use crate::battlefield::{Battlefield, UnitSnapshot};
use crate::core::config::{CostMultipliers, ObjectiveSource};
use crate::core::types::{CallSign, Point, Team};

/// A unit's goal for the turn.
///
/// Replaced wholesale every turn, never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Objective {
    Pickup(Point),
    Capture(Point),
    Shoot(CallSign),
    #[default]
    None,
}

impl Objective {
    /// Square the unit has to reach. Combat objectives have none.
    pub fn location(&self) -> Option<Point> {
        match self {
            Objective::Pickup(p) | Objective::Capture(p) => Some(*p),
            Objective::Shoot(_) | Objective::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Objective::None)
    }

    /// Can this objective still be carried out against the current snapshot?
    pub fn is_doable<W: Battlefield + ?Sized>(
        &self,
        world: &W,
        enemies: &[UnitSnapshot],
        team: Team,
    ) -> bool {
        match self {
            Objective::None => false,
            Objective::Pickup(p) => world.pickup_at(*p).is_some(),
            Objective::Capture(p) => world
                .control_points()
                .iter()
                .any(|cp| cp.position == *p && cp.is_capturable_by(team)),
            Objective::Shoot(target) => enemies
                .iter()
                .any(|e| e.call_sign == *target && e.is_alive()),
        }
    }
}

/// Discriminant of [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Move,
    PickUp,
    Shoot,
    ActivateShield,
    None,
}

/// The single request issued for a unit this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Action {
    Move(Point),
    PickUp(Point),
    Shoot { target: CallSign, at: Point },
    ActivateShield,
    #[default]
    None,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Move(_) => ActionKind::Move,
            Action::PickUp(_) => ActionKind::PickUp,
            Action::Shoot { .. } => ActionKind::Shoot,
            Action::ActivateShield => ActionKind::ActivateShield,
            Action::None => ActionKind::None,
        }
    }
}

/// Decision for one living friendly unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnDecision {
    pub call_sign: CallSign,
    pub objective: Objective,
    pub action: Action,
}

impl TurnDecision {
    pub fn idle(call_sign: CallSign) -> Self {
        Self {
            call_sign,
            objective: Objective::None,
            action: Action::None,
        }
    }

    pub fn shoot(call_sign: CallSign, enemy: &UnitSnapshot) -> Self {
        Self {
            call_sign,
            objective: Objective::Shoot(enemy.call_sign),
            action: Action::Shoot {
                target: enemy.call_sign,
                at: enemy.position,
            },
        }
    }
}

/// Every decision taken in one turn, in roster order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u64,
    pub decisions: Vec<TurnDecision>,
}

impl TurnRecord {
    pub fn get(&self, call_sign: CallSign) -> Option<&TurnDecision> {
        self.decisions.iter().find(|d| d.call_sign == call_sign)
    }

    /// Units that end the turn without any request
    pub fn inactive_units(&self) -> impl Iterator<Item = CallSign> + '_ {
        self.decisions
            .iter()
            .filter(|d| d.action.kind() == ActionKind::None)
            .map(|d| d.call_sign)
    }

    pub fn count(&self, kind: ActionKind) -> usize {
        self.decisions
            .iter()
            .filter(|d| d.action.kind() == kind)
            .count()
    }
}

/// Category of a non-combat candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateKind {
    Pickup,
    ControlPoint,
    Mainframe,
}

/// A square the squad could be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub point: Point,
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn objective(&self) -> Objective {
        match self.kind {
            CandidateKind::Pickup => Objective::Pickup(self.point),
            CandidateKind::ControlPoint | CandidateKind::Mainframe => {
                Objective::Capture(self.point)
            }
        }
    }

    pub fn multiplier(&self, multipliers: &CostMultipliers) -> f64 {
        match self.kind {
            CandidateKind::Pickup => multipliers.pickup,
            CandidateKind::Mainframe => multipliers.mainframe,
            CandidateKind::ControlPoint => multipliers.control_point,
        }
    }
}

impl ObjectiveSource {
    /// Candidates this source contributes, in world list order
    pub fn candidates<W: Battlefield + ?Sized>(&self, world: &W, team: Team) -> Vec<Candidate> {
        match self {
            ObjectiveSource::Pickups => world
                .pickups()
                .iter()
                .map(|p| Candidate {
                    point: p.position,
                    kind: CandidateKind::Pickup,
                })
                .collect(),
            ObjectiveSource::ControlPoints | ObjectiveSource::Mainframes => {
                let mainframes = *self == ObjectiveSource::Mainframes;
                world
                    .control_points()
                    .iter()
                    .filter(|cp| cp.is_mainframe == mainframes && cp.is_capturable_by(team))
                    .map(|cp| Candidate {
                        point: cp.position,
                        kind: if mainframes {
                            CandidateKind::Mainframe
                        } else {
                            CandidateKind::ControlPoint
                        },
                    })
                    .collect()
            }
        }
    }
}

/// Concatenate the candidates of every source, in source order
pub fn gather_candidates<W: Battlefield + ?Sized>(
    world: &W,
    sources: &[ObjectiveSource],
    team: Team,
) -> Vec<Candidate> {
    sources
        .iter()
        .flat_map(|source| source.candidates(world, team))
        .collect()
}
