//! Multi-turn squad integration tests

use std::path::PathBuf;

use squad_tactics::battlefield::*;
use squad_tactics::core::*;
use squad_tactics::tactics::*;

/// Sink that plays the orders straight onto the friendly roster
struct RosterSink<'a> {
    friendlies: &'a mut [UnitSnapshot; SQUAD_SIZE],
    pickups_taken: Vec<Point>,
    shots: Vec<(CallSign, CallSign)>,
}

impl ActionSink for RosterSink<'_> {
    fn move_to(&mut self, unit: CallSign, point: Point) {
        self.friendlies[unit as usize].position = point;
    }

    fn shoot_at(&mut self, unit: CallSign, target: CallSign) {
        self.shots.push((unit, target));
    }

    fn pick_up(&mut self, unit: CallSign) {
        self.pickups_taken.push(self.friendlies[unit as usize].position);
    }

    fn activate_shield(&mut self, _unit: CallSign) {}
}

fn roster(alive: &[(CallSign, Point)]) -> [UnitSnapshot; SQUAD_SIZE] {
    CallSign::ALL.map(|cs| match alive.iter().find(|(c, _)| *c == cs) {
        Some((_, p)) => UnitSnapshot::new(cs, *p),
        None => UnitSnapshot::new(cs, Point::new(0, 0)).with_health(0),
    })
}

fn play_turn(
    coordinator: &mut TurnCoordinator,
    world: &GridWorld,
    enemies: &[UnitSnapshot; SQUAD_SIZE],
    friendlies: &mut [UnitSnapshot; SQUAD_SIZE],
) -> (TurnRecord, Vec<Point>, Vec<(CallSign, CallSign)>) {
    let snapshot = friendlies.clone();
    let mut sink = RosterSink {
        friendlies,
        pickups_taken: Vec::new(),
        shots: Vec::new(),
    };
    let record = coordinator
        .on_turn(world, enemies, &snapshot, &mut sink)
        .clone();
    (record, sink.pickups_taken, sink.shots)
}

#[test]
fn test_walks_to_pickup_and_collects_it() {
    let mut world = GridWorld::new(10, 10);
    world.add_pickup(Pickup::new(Point::new(3, 0), PickupType::LaserRifle));
    let enemies = roster(&[]);
    let mut friendlies = roster(&[(CallSign::Alpha, Point::new(0, 0))]);
    let mut coordinator = TurnCoordinator::new(TacticsConfig::new(Team::Blue));

    let mut actions = Vec::new();
    for _ in 0..4 {
        let (record, taken, _) = play_turn(&mut coordinator, &world, &enemies, &mut friendlies);
        let decision = record.get(CallSign::Alpha).unwrap();
        assert_eq!(decision.objective, Objective::Pickup(Point::new(3, 0)));
        actions.push(decision.action);

        for p in taken {
            world.remove_pickup_at(p);
        }
    }

    assert_eq!(
        actions,
        vec![
            Action::Move(Point::new(1, 0)),
            Action::Move(Point::new(2, 0)),
            Action::Move(Point::new(3, 0)),
            Action::PickUp(Point::new(3, 0)),
        ]
    );
    assert!(world.pickups().is_empty());

    // Nothing left to do and nobody to hunt
    let (record, _, _) = play_turn(&mut coordinator, &world, &enemies, &mut friendlies);
    assert_eq!(record.turn, 4);
    assert_eq!(record.inactive_units().collect::<Vec<_>>(), vec![CallSign::Alpha]);
}

#[test]
fn test_sidesteps_covered_square() {
    let mut world = GridWorld::new(20, 20);
    world.add_pickup(Pickup::new(Point::new(10, 10), PickupType::RepairKit));
    let mut enemies = roster(&[(CallSign::Alpha, Point::new(4, 5))]);
    enemies[0].weapon = WeaponType::LaserRifle;
    let mut friendlies = roster(&[(CallSign::Alpha, Point::new(0, 10))]);
    let mut coordinator = TurnCoordinator::new(TacticsConfig::new(Team::Blue));

    let (record, _, shots) = play_turn(&mut coordinator, &world, &enemies, &mut friendlies);

    assert!(shots.is_empty());
    assert_eq!(
        record.get(CallSign::Alpha).unwrap().action,
        Action::Move(Point::new(1, 11))
    );
    assert_eq!(friendlies[0].position, Point::new(1, 11));
}

#[test]
fn test_shot_takes_priority_over_objective() {
    let mut world = GridWorld::new(20, 20);
    world.add_pickup(Pickup::new(Point::new(3, 0), PickupType::RailGun));
    let enemies = roster(&[(CallSign::Charlie, Point::new(0, 3))]);
    let mut friendlies = roster(&[
        (CallSign::Alpha, Point::new(0, 0)),
        (CallSign::Bravo, Point::new(19, 19)),
    ]);
    let mut coordinator = TurnCoordinator::new(TacticsConfig::new(Team::Blue));

    let (record, _, shots) = play_turn(&mut coordinator, &world, &enemies, &mut friendlies);

    // Alpha was given the pickup but fires instead
    assert_eq!(shots, vec![(CallSign::Alpha, CallSign::Charlie)]);
    assert_eq!(
        record.get(CallSign::Alpha).unwrap().objective,
        Objective::Shoot(CallSign::Charlie)
    );
    assert_eq!(friendlies[0].position, Point::new(0, 0));

    // Bravo had nothing assigned and closes in
    let bravo = record.get(CallSign::Bravo).unwrap();
    assert_eq!(bravo.objective, Objective::Shoot(CallSign::Charlie));
    assert_eq!(bravo.action.kind(), ActionKind::Move);
}

#[test]
fn test_walls_block_the_shot() {
    let mut world = GridWorld::new(10, 10);
    world.add_wall(Point::new(0, 2));
    let enemies = roster(&[(CallSign::Alpha, Point::new(0, 3))]);
    let mut friendlies = roster(&[(CallSign::Alpha, Point::new(0, 0))]);
    let mut coordinator = TurnCoordinator::new(TacticsConfig::new(Team::Blue));

    let (record, _, shots) = play_turn(&mut coordinator, &world, &enemies, &mut friendlies);

    assert!(shots.is_empty());
    let decision = record.get(CallSign::Alpha).unwrap();
    assert_eq!(decision.objective, Objective::Shoot(CallSign::Alpha));
    assert_eq!(decision.action.kind(), ActionKind::Move);
}

#[test]
fn test_turns_count_up_and_reset() {
    let world = GridWorld::new(5, 5);
    let enemies = roster(&[]);
    let mut friendlies = roster(&[(CallSign::Delta, Point::new(2, 2))]);
    let mut coordinator = TurnCoordinator::new(TacticsConfig::new(Team::Amber));

    for expected in 0..3 {
        let (record, _, _) = play_turn(&mut coordinator, &world, &enemies, &mut friendlies);
        assert_eq!(record.turn, expected);
    }
    assert_eq!(coordinator.previous_turn().map(|r| r.turn), Some(2));

    coordinator.reset();
    let (record, _, _) = play_turn(&mut coordinator, &world, &enemies, &mut friendlies);
    assert_eq!(record.turn, 0);
}

#[test]
fn test_shipped_presets_drive_the_coordinator() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/tactics");
    let default = load_config(&dir.join("default.toml")).unwrap();
    let legacy = load_config(&dir.join("legacy.toml")).unwrap();

    let mut world = GridWorld::new(20, 20);
    world.add_control_point(ControlPoint::new("Flag", Point::new(10, 0), false));
    world.add_control_point(ControlPoint::new("Core", Point::new(0, 19), true));
    let enemies = roster(&[]);
    let friendlies = roster(&[
        (CallSign::Alpha, Point::new(8, 0)),
        (CallSign::Bravo, Point::new(12, 0)),
    ]);

    let corrected = TurnCoordinator::new(default).decide(&world, &enemies, &friendlies);
    let targets: Vec<Objective> = corrected.decisions.iter().map(|d| d.objective).collect();
    assert!(targets.contains(&Objective::Capture(Point::new(0, 19))));

    let old = TurnCoordinator::new(legacy).decide(&world, &enemies, &friendlies);
    assert!(old
        .decisions
        .iter()
        .all(|d| d.objective == Objective::Capture(Point::new(10, 0))));
}

#[test]
fn test_record_serializes_to_json() {
    let mut world = GridWorld::new(10, 10);
    world.add_pickup(Pickup::new(Point::new(2, 0), PickupType::RepairKit));
    let friendlies = roster(&[(CallSign::Alpha, Point::new(0, 0))]);
    let record = TurnCoordinator::new(TacticsConfig::default()).decide(&world, &[], &friendlies);

    let json = serde_json::to_string(&record).unwrap();
    let back: TurnRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
