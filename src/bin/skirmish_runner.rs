//! Headless Skirmish Runner
//!
//! Plays a short scripted skirmish on a grid map and prints what the squad
//! decided every turn. Enemies stand still; shots deal fixed damage.

use ahash::AHashSet;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::path::PathBuf;

use squad_tactics::battlefield::{
    ActionSink, Battlefield, ControlPoint, GridWorld, Pickup, PickupType, UnitSnapshot,
};
use squad_tactics::core::{load_config, CallSign, Point, Result, TacticsConfig, Team, SQUAD_SIZE};
use squad_tactics::tactics::{TurnCoordinator, TurnRecord};

const SHOT_DAMAGE: i32 = 5;
const REPAIR_AMOUNT: i32 = 10;

/// Headless Skirmish Runner - watch the squad policy play out turn by turn
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run a scripted skirmish and print every turn's decisions")]
struct Args {
    /// Tactics preset (TOML). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the legacy candidate list instead of the configured one
    #[arg(long)]
    legacy: bool,

    /// Number of turns to play
    #[arg(long, default_value_t = 12)]
    turns: u64,

    /// Map width in squares
    #[arg(long, default_value_t = 20)]
    width: u32,

    /// Map height in squares
    #[arg(long, default_value_t = 12)]
    height: u32,

    /// Random walls to scatter over the map
    #[arg(long, default_value_t = 0)]
    walls: u32,

    /// Random seed for wall placement
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// Final tally printed after the last turn
#[derive(Serialize)]
struct SkirmishSummary {
    turns_played: u64,
    friendly_alive: usize,
    enemy_alive: usize,
    control_points_held: usize,
    pickups_left: usize,
    seed: u64,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Move(CallSign, Point),
    Shoot(CallSign, CallSign),
    PickUp(CallSign),
    Shield(CallSign),
}

/// Commands queued by the coordinator, resolved after the turn
#[derive(Default)]
struct Orders {
    commands: Vec<Command>,
}

impl ActionSink for Orders {
    fn move_to(&mut self, unit: CallSign, point: Point) {
        self.commands.push(Command::Move(unit, point));
    }

    fn shoot_at(&mut self, unit: CallSign, target: CallSign) {
        self.commands.push(Command::Shoot(unit, target));
    }

    fn pick_up(&mut self, unit: CallSign) {
        self.commands.push(Command::PickUp(unit));
    }

    fn activate_shield(&mut self, unit: CallSign) {
        self.commands.push(Command::Shield(unit));
    }
}

struct Skirmish {
    world: GridWorld,
    team: Team,
    friendlies: [UnitSnapshot; SQUAD_SIZE],
    enemies: [UnitSnapshot; SQUAD_SIZE],
}

impl Skirmish {
    fn new(width: u32, height: u32, walls: u32, team: Team, rng: &mut StdRng) -> Self {
        let mut world = GridWorld::new(width, height);
        let w = width as i32;
        let h = height as i32;

        let friendlies = CallSign::ALL.map(|cs| {
            let slot = cs as i32;
            UnitSnapshot::new(cs, Point::new(1, 1 + slot * (h - 2) / 4))
        });
        let enemies = CallSign::ALL.map(|cs| {
            let slot = cs as i32;
            UnitSnapshot::new(cs, Point::new(w - 2, 1 + slot * (h - 2) / 4))
        });

        world.add_pickup(Pickup::new(Point::new(w / 4, h / 4), PickupType::LaserRifle));
        world.add_pickup(Pickup::new(Point::new(w / 4, 3 * h / 4), PickupType::RepairKit));
        world.add_control_point(ControlPoint::new("North Relay", Point::new(w / 2, 1), false));
        world.add_control_point(ControlPoint::new("South Relay", Point::new(w / 2, h - 2), false));
        world.add_control_point(ControlPoint::new("Mainframe", Point::new(w / 2, h / 2), true));

        let mut reserved: AHashSet<Point> = friendlies
            .iter()
            .chain(enemies.iter())
            .map(|u| u.position)
            .collect();
        reserved.extend(world.pickups().iter().map(|p| p.position));
        reserved.extend(world.control_points().iter().map(|cp| cp.position));

        for _ in 0..walls {
            let p = Point::new(rng.gen_range(0..w), rng.gen_range(0..h));
            if !reserved.contains(&p) {
                world.add_wall(p);
            }
        }

        Self {
            world,
            team,
            friendlies,
            enemies,
        }
    }

    fn friendly_mut(&mut self, cs: CallSign) -> &mut UnitSnapshot {
        &mut self.friendlies[cs as usize]
    }

    /// Apply queued commands, then update control point ownership
    fn resolve(&mut self, orders: Orders) {
        for command in orders.commands {
            match command {
                Command::Move(cs, to) => {
                    let from = self.friendlies[cs as usize].position;
                    if from.chebyshev(&to) == 1 && self.world.is_passable(to) {
                        self.friendly_mut(cs).position = to;
                    }
                }
                Command::Shoot(cs, target) => {
                    let enemy = &mut self.enemies[target as usize];
                    enemy.health -= SHOT_DAMAGE;
                    tracing::debug!("{} hits {} ({} hp left)", cs, target, enemy.health);
                }
                Command::PickUp(cs) => {
                    let at = self.friendlies[cs as usize].position;
                    if let Some(pickup) = self.world.remove_pickup_at(at) {
                        let unit = self.friendly_mut(cs);
                        match (pickup.kind.weapon(), pickup.kind) {
                            (Some(weapon), _) => unit.weapon = weapon,
                            (None, PickupType::RepairKit) => unit.health += REPAIR_AMOUNT,
                            (None, _) => unit.num_shields += 1,
                        }
                    }
                }
                Command::Shield(cs) => {
                    let unit = self.friendly_mut(cs);
                    if unit.num_shields > 0 {
                        unit.num_shields -= 1;
                        unit.shielded = true;
                    }
                }
            }
        }

        let occupied: Vec<Point> = self
            .friendlies
            .iter()
            .filter(|u| u.is_alive())
            .map(|u| u.position)
            .collect();
        for p in occupied {
            self.world.set_controlling_team(p, Some(self.team));
        }
    }

    fn summary(&self, turns_played: u64, seed: u64) -> SkirmishSummary {
        SkirmishSummary {
            turns_played,
            friendly_alive: self.friendlies.iter().filter(|u| u.is_alive()).count(),
            enemy_alive: self.enemies.iter().filter(|u| u.is_alive()).count(),
            control_points_held: self
                .world
                .control_points()
                .iter()
                .filter(|cp| cp.controlling_team == Some(self.team))
                .count(),
            pickups_left: self.world.pickups().len(),
            seed,
        }
    }
}

fn print_turn(record: &TurnRecord, format: &str) -> Result<()> {
    if format == "text" {
        println!("Turn {}", record.turn);
        for d in &record.decisions {
            println!("  {:<8} {:?} -> {:?}", d.call_sign.to_string(), d.objective, d.action);
        }
    } else {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("squad_tactics=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TacticsConfig::new(Team::Blue),
    };
    if args.legacy {
        config.objective_sources = TacticsConfig::legacy(config.team).objective_sources;
    }
    config.validate()?;

    if args.format != "json" && args.format != "text" {
        tracing::warn!("Unknown format '{}', defaulting to json", args.format);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut skirmish = Skirmish::new(
        args.width.max(6),
        args.height.max(6),
        args.walls,
        config.team,
        &mut rng,
    );
    let mut coordinator = TurnCoordinator::new(config);

    tracing::info!(
        "Skirmish on {}x{} map, {} turns, seed {}",
        skirmish.world.width,
        skirmish.world.height,
        args.turns,
        seed
    );

    let mut turns_played = 0;
    for _ in 0..args.turns {
        if skirmish.friendlies.iter().all(|u| !u.is_alive()) {
            break;
        }

        let mut orders = Orders::default();
        let record = coordinator.on_turn(
            &skirmish.world,
            &skirmish.enemies,
            &skirmish.friendlies,
            &mut orders,
        );
        print_turn(record, &args.format)?;

        skirmish.resolve(orders);
        turns_played += 1;
    }

    let summary = skirmish.summary(turns_played, seed);
    if args.format == "text" {
        println!(
            "Played {} turns: {} friendly / {} enemy alive, {} control points held, {} pickups left",
            summary.turns_played,
            summary.friendly_alive,
            summary.enemy_alive,
            summary.control_points_held,
            summary.pickups_left
        );
    } else {
        println!("{}", serde_json::to_string(&summary)?);
    }

    Ok(())
}
