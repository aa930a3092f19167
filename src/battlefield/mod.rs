//! Battlefield snapshot and the collaborator interfaces the tactics core uses
//!
//! The match engine owns the world. The core only reads it through
//! [`Battlefield`] and issues one-shot requests through [`ActionSink`].

pub mod grid;

use serde::{Deserialize, Serialize};

use crate::core::types::{CallSign, Direction, Point, Team};

pub use grid::GridWorld;

/// Weapon carried by a unit. Only its range matters to the tactics core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeaponType {
    #[default]
    MiniBlaster,
    ScatterGun,
    LaserRifle,
    RailGun,
}

impl WeaponType {
    /// Firing range in squares
    pub fn range(&self) -> u32 {
        match self {
            WeaponType::MiniBlaster => 3,
            WeaponType::ScatterGun => 2,
            WeaponType::LaserRifle => 5,
            WeaponType::RailGun => 10,
        }
    }
}

/// Read-only view of one unit for the current turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub call_sign: CallSign,
    pub position: Point,
    pub health: i32,
    pub weapon: WeaponType,
    pub shielded: bool,
    pub num_shields: u32,
}

impl UnitSnapshot {
    pub fn new(call_sign: CallSign, position: Point) -> Self {
        Self {
            call_sign,
            position,
            health: 20,
            weapon: WeaponType::MiniBlaster,
            shielded: false,
            num_shields: 0,
        }
    }

    pub fn with_weapon(mut self, weapon: WeaponType) -> Self {
        self.weapon = weapon;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    /// Dead units keep their roster slot but are never acted upon
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Item lying on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupType {
    RepairKit,
    ShieldUpgrade,
    ScatterGun,
    LaserRifle,
    RailGun,
}

impl PickupType {
    /// Weapon granted by this pickup, if it is a weapon
    pub fn weapon(&self) -> Option<WeaponType> {
        match self {
            PickupType::ScatterGun => Some(WeaponType::ScatterGun),
            PickupType::LaserRifle => Some(WeaponType::LaserRifle),
            PickupType::RailGun => Some(WeaponType::RailGun),
            PickupType::RepairKit | PickupType::ShieldUpgrade => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub position: Point,
    pub kind: PickupType,
}

impl Pickup {
    pub fn new(position: Point, kind: PickupType) -> Self {
        Self { position, kind }
    }
}

/// Capturable square. Mainframes are the high-value variety.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub name: String,
    pub position: Point,
    pub is_mainframe: bool,
    pub controlling_team: Option<Team>,
}

impl ControlPoint {
    pub fn new(name: impl Into<String>, position: Point, is_mainframe: bool) -> Self {
        Self {
            name: name.into(),
            position,
            is_mainframe,
            controlling_team: None,
        }
    }

    /// Neutral points and points held by the other side are worth taking
    pub fn is_capturable_by(&self, team: Team) -> bool {
        self.controlling_team != Some(team)
    }
}

/// Pathfinding, line-of-sight, and map-content oracle supplied by the engine
pub trait Battlefield {
    /// Number of steps on the shortest path. 0 means "no path" unless `a == b`.
    fn path_length(&self, a: Point, b: Point) -> u32;

    /// First step of the shortest path from `a` towards `b`
    fn next_step_direction(&self, a: Point, b: Point) -> Direction;

    /// Can a weapon with `range` fired from `shooter` reach `target`?
    fn can_shooter_hit_target(&self, shooter: Point, target: Point, range: u32) -> bool;

    fn pickups(&self) -> &[Pickup];

    fn control_points(&self) -> &[ControlPoint];

    fn pickup_at(&self, point: Point) -> Option<&Pickup> {
        self.pickups().iter().find(|p| p.position == point)
    }

    /// Closest control point by chessboard distance; the first listed wins ties
    fn control_point_near(&self, point: Point) -> Option<&ControlPoint> {
        self.control_points()
            .iter()
            .min_by_key(|cp| cp.position.chebyshev(&point))
    }
}

/// Per-unit commands accepted by the engine
pub trait ActionSink {
    fn move_to(&mut self, unit: CallSign, point: Point);

    fn shoot_at(&mut self, unit: CallSign, target: CallSign);

    fn pick_up(&mut self, unit: CallSign);

    fn activate_shield(&mut self, unit: CallSign);
}
