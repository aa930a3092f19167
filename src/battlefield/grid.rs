//! Rectangular reference battlefield
//!
//! 8-connected movement with unit step cost, walls block both movement and
//! line of sight. Distances come from breadth-first distance fields grown
//! outwards from the goal, cached per goal until the map changes.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ahash::{AHashMap, AHashSet};

use crate::battlefield::{Battlefield, ControlPoint, Pickup};
use crate::core::types::{Direction, Point, Team};

type DistanceField = Rc<[Option<u32>]>;

#[derive(Debug, Clone)]
pub struct GridWorld {
    pub width: u32,
    pub height: u32,
    walls: AHashSet<Point>,
    pickups: Vec<Pickup>,
    control_points: Vec<ControlPoint>,
    fields: RefCell<AHashMap<Point, DistanceField>>,
}

impl GridWorld {
    /// Create an open map with no walls, pickups, or control points
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            walls: AHashSet::new(),
            pickups: Vec::new(),
            control_points: Vec::new(),
            fields: RefCell::new(AHashMap::new()),
        }
    }

    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width as i32 && p.y < self.height as i32
    }

    pub fn is_wall(&self, p: Point) -> bool {
        self.walls.contains(&p)
    }

    pub fn is_passable(&self, p: Point) -> bool {
        self.in_bounds(p) && !self.is_wall(p)
    }

    pub fn add_wall(&mut self, p: Point) {
        if self.in_bounds(p) && self.walls.insert(p) {
            self.fields.get_mut().clear();
        }
    }

    pub fn add_pickup(&mut self, pickup: Pickup) {
        self.pickups.push(pickup);
    }

    /// Remove and return the pickup lying at `p`
    pub fn remove_pickup_at(&mut self, p: Point) -> Option<Pickup> {
        let idx = self.pickups.iter().position(|pk| pk.position == p)?;
        Some(self.pickups.remove(idx))
    }

    pub fn add_control_point(&mut self, control_point: ControlPoint) {
        self.control_points.push(control_point);
    }

    /// Hand the control point at `p` to `team`. Returns false if there is none.
    pub fn set_controlling_team(&mut self, p: Point, team: Option<Team>) -> bool {
        match self.control_points.iter_mut().find(|cp| cp.position == p) {
            Some(cp) => {
                cp.controlling_team = team;
                true
            }
            None => false,
        }
    }

    fn index(&self, p: Point) -> usize {
        p.y as usize * self.width as usize + p.x as usize
    }

    /// Steps from every square to `goal`, or None where unreachable
    fn distance_field(&self, goal: Point) -> DistanceField {
        if let Some(field) = self.fields.borrow().get(&goal) {
            return Rc::clone(field);
        }

        let mut field = vec![None; (self.width * self.height) as usize];
        if self.is_passable(goal) {
            let mut frontier = VecDeque::new();
            field[self.index(goal)] = Some(0);
            frontier.push_back(goal);

            while let Some(current) = frontier.pop_front() {
                let next_cost = field[self.index(current)].unwrap_or(0) + 1;
                for neighbor in current.neighbors() {
                    if !self.is_passable(neighbor) {
                        continue;
                    }
                    let slot = &mut field[self.index(neighbor)];
                    if slot.is_none() {
                        *slot = Some(next_cost);
                        frontier.push_back(neighbor);
                    }
                }
            }
        }

        let field: DistanceField = field.into();
        self.fields.borrow_mut().insert(goal, Rc::clone(&field));
        field
    }

    fn steps_between(&self, a: Point, b: Point) -> Option<u32> {
        if !self.is_passable(a) || !self.is_passable(b) {
            return None;
        }
        self.distance_field(b)[self.index(a)]
    }

    /// Squares strictly between `from` and `to` on a Bresenham line
    fn line_between(from: Point, to: Point) -> Vec<Point> {
        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (from.x, from.y);
        let mut between = Vec::new();

        loop {
            if x == to.x && y == to.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            let p = Point::new(x, y);
            if p != to {
                between.push(p);
            }
        }

        between
    }

    /// Check line of sight between two squares
    pub fn has_line_of_sight(&self, from: Point, to: Point) -> bool {
        Self::line_between(from, to)
            .iter()
            .all(|p| !self.is_wall(*p))
    }
}

impl Battlefield for GridWorld {
    fn path_length(&self, a: Point, b: Point) -> u32 {
        if a == b {
            return 0;
        }
        self.steps_between(a, b).unwrap_or(0)
    }

    fn next_step_direction(&self, a: Point, b: Point) -> Direction {
        if a == b {
            return Direction::Noop;
        }
        let Some(steps) = self.steps_between(a, b) else {
            return Direction::Noop;
        };

        let field = self.distance_field(b);
        let mut best: Option<(Direction, i64)> = None;
        for direction in Direction::PROBE_ORDER {
            let candidate = a.step(direction);
            if !self.in_bounds(candidate) || field[self.index(candidate)] != Some(steps - 1) {
                continue;
            }
            let straightness = candidate.distance_squared(&b);
            if best.map_or(true, |(_, d)| straightness < d) {
                best = Some((direction, straightness));
            }
        }

        best.map(|(d, _)| d).unwrap_or(Direction::Noop)
    }

    fn can_shooter_hit_target(&self, shooter: Point, target: Point, range: u32) -> bool {
        self.in_bounds(shooter)
            && self.in_bounds(target)
            && shooter.chebyshev(&target) <= range
            && self.has_line_of_sight(shooter, target)
    }

    fn pickups(&self) -> &[Pickup] {
        &self.pickups
    }

    fn control_points(&self) -> &[ControlPoint] {
        &self.control_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battlefield::PickupType;

    #[test]
    fn test_straight_path_length() {
        let world = GridWorld::new(10, 10);
        assert_eq!(world.path_length(Point::new(0, 0), Point::new(3, 0)), 3);
        assert_eq!(world.path_length(Point::new(0, 0), Point::new(3, 3)), 3);
        assert_eq!(world.path_length(Point::new(4, 4), Point::new(4, 4)), 0);
    }

    #[test]
    fn test_straight_corridor_steps_straight() {
        let world = GridWorld::new(10, 10);
        let mut pos = Point::new(0, 0);
        let goal = Point::new(3, 0);
        let mut visited = Vec::new();
        while pos != goal {
            pos = pos.step(world.next_step_direction(pos, goal));
            visited.push(pos);
        }
        assert_eq!(
            visited,
            vec![Point::new(1, 0), Point::new(2, 0), Point::new(3, 0)]
        );
    }

    #[test]
    fn test_path_around_wall() {
        let mut world = GridWorld::new(10, 10);
        for y in 0..9 {
            world.add_wall(Point::new(5, y));
        }
        // Has to go down to row 9 to get around
        assert_eq!(world.path_length(Point::new(4, 0), Point::new(6, 0)), 18);
        assert_ne!(
            world.next_step_direction(Point::new(4, 0), Point::new(6, 0)),
            Direction::East
        );
    }

    #[test]
    fn test_unreachable_is_zero() {
        let mut world = GridWorld::new(5, 5);
        let goal = Point::new(2, 2);
        for n in goal.neighbors() {
            world.add_wall(n);
        }
        assert_eq!(world.path_length(Point::new(0, 0), goal), 0);
        assert_eq!(
            world.next_step_direction(Point::new(0, 0), goal),
            Direction::Noop
        );
    }

    #[test]
    fn test_wall_endpoint_is_unreachable() {
        let mut world = GridWorld::new(5, 5);
        world.add_wall(Point::new(3, 3));
        assert_eq!(world.path_length(Point::new(0, 0), Point::new(3, 3)), 0);
        assert_eq!(world.path_length(Point::new(0, 0), Point::new(-1, 0)), 0);
    }

    #[test]
    fn test_field_cache_invalidated_by_new_wall() {
        let mut world = GridWorld::new(5, 1);
        assert_eq!(world.path_length(Point::new(0, 0), Point::new(4, 0)), 4);
        world.add_wall(Point::new(2, 0));
        assert_eq!(world.path_length(Point::new(0, 0), Point::new(4, 0)), 0);
    }

    #[test]
    fn test_line_of_sight_blocked_by_wall() {
        let mut world = GridWorld::new(10, 10);
        let from = Point::new(0, 0);
        let to = Point::new(5, 0);
        assert!(world.can_shooter_hit_target(from, to, 5));
        world.add_wall(Point::new(2, 0));
        assert!(!world.can_shooter_hit_target(from, to, 5));
    }

    #[test]
    fn test_shot_limited_by_range() {
        let world = GridWorld::new(10, 10);
        assert!(world.can_shooter_hit_target(Point::new(0, 0), Point::new(3, 2), 3));
        assert!(!world.can_shooter_hit_target(Point::new(0, 0), Point::new(4, 2), 3));
    }

    #[test]
    fn test_adjacent_shot_has_nothing_between() {
        let mut world = GridWorld::new(4, 4);
        world.add_wall(Point::new(2, 2));
        assert!(world.has_line_of_sight(Point::new(1, 1), Point::new(2, 2)));
    }

    #[test]
    fn test_pickup_bookkeeping() {
        let mut world = GridWorld::new(4, 4);
        world.add_pickup(Pickup::new(Point::new(1, 2), PickupType::RailGun));
        assert!(world.pickup_at(Point::new(1, 2)).is_some());
        let taken = world.remove_pickup_at(Point::new(1, 2));
        assert_eq!(taken.map(|p| p.kind), Some(PickupType::RailGun));
        assert!(world.pickup_at(Point::new(1, 2)).is_none());
    }

    #[test]
    fn test_control_point_ownership() {
        let mut world = GridWorld::new(4, 4);
        world.add_control_point(ControlPoint::new("Hub", Point::new(2, 2), true));
        assert!(world.set_controlling_team(Point::new(2, 2), Some(Team::Amber)));
        assert!(!world.set_controlling_team(Point::new(0, 0), Some(Team::Amber)));
        assert_eq!(
            world.control_points()[0].controlling_team,
            Some(Team::Amber)
        );
    }
}
