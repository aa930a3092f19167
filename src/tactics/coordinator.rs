//! Turn coordinator - the per-turn decision pass for the whole squad
//!
//! One call per game turn: assign objectives, move or pick up, let any
//! available shot override that, send idle units hunting, then hand every
//! action to the engine. Nothing carries over between turns except the
//! record of the last turn.

use crate::battlefield::{ActionSink, Battlefield, UnitSnapshot};
use crate::core::config::{CombatTargeting, TacticsConfig};
use crate::core::types::{Point, SQUAD_SIZE};
use crate::tactics::assignment::AssignmentOptimizer;
use crate::tactics::objective::{
    gather_candidates, Action, ActionKind, Objective, TurnDecision, TurnRecord,
};
use crate::tactics::reroute::reroute;
use crate::tactics::threat::square_safety;
use crate::tactics::nearest_enemy;

pub struct TurnCoordinator {
    config: TacticsConfig,
    optimizer: AssignmentOptimizer,
    turn: u64,
    /// Decisions of the last completed turn. Kept for inspection only.
    previous: Option<TurnRecord>,
}

impl TurnCoordinator {
    pub fn new(config: TacticsConfig) -> Self {
        let optimizer = AssignmentOptimizer::new(config.max_search_units);
        Self {
            config,
            optimizer,
            turn: 0,
            previous: None,
        }
    }

    pub fn config(&self) -> &TacticsConfig {
        &self.config
    }

    pub fn previous_turn(&self) -> Option<&TurnRecord> {
        self.previous.as_ref()
    }

    /// Forget everything from the previous match
    pub fn reset(&mut self) {
        self.turn = 0;
        self.previous = None;
    }

    /// Decide, apply, and remember one turn
    pub fn on_turn<W, S>(
        &mut self,
        world: &W,
        enemies: &[UnitSnapshot; SQUAD_SIZE],
        friendlies: &[UnitSnapshot; SQUAD_SIZE],
        sink: &mut S,
    ) -> &TurnRecord
    where
        W: Battlefield + ?Sized,
        S: ActionSink + ?Sized,
    {
        let record = self.decide(world, enemies, friendlies);
        apply_record(&record, sink);
        self.turn += 1;
        self.previous.insert(record)
    }

    /// Work out one decision per living friendly unit without side effects
    pub fn decide<W: Battlefield + ?Sized>(
        &self,
        world: &W,
        enemies: &[UnitSnapshot],
        friendlies: &[UnitSnapshot],
    ) -> TurnRecord {
        let enemies: Vec<UnitSnapshot> = enemies.iter().filter(|u| u.is_alive()).cloned().collect();
        let friendlies: Vec<UnitSnapshot> =
            friendlies.iter().filter(|u| u.is_alive()).cloned().collect();

        let objectives = self.assign_objectives(world, &friendlies);

        let mut decisions: Vec<TurnDecision> = friendlies
            .iter()
            .zip(objectives)
            .map(|(unit, objective)| TurnDecision {
                call_sign: unit.call_sign,
                objective,
                action: self.pursue(world, unit, objective, &enemies),
            })
            .collect();

        self.combat_sweep(world, &friendlies, &enemies, &mut decisions);
        self.idle_fallback(world, &friendlies, &enemies, &mut decisions);

        let record = TurnRecord {
            turn: self.turn,
            decisions,
        };

        for decision in &record.decisions {
            if decision.action.kind() != ActionKind::None {
                continue;
            }
            if decision.objective.is_none() {
                tracing::warn!("{} has nothing to do this turn", decision.call_sign);
            } else {
                tracing::warn!(
                    "{} ends the turn without acting on {:?}",
                    decision.call_sign,
                    decision.objective
                );
            }
        }

        tracing::info!(
            "Turn {}: {} moves, {} pickups, {} shots, {} holding",
            record.turn,
            record.count(ActionKind::Move),
            record.count(ActionKind::PickUp),
            record.count(ActionKind::Shoot),
            record.count(ActionKind::None)
        );

        record
    }

    /// Spread non-combat objectives over the living squad
    fn assign_objectives<W: Battlefield + ?Sized>(
        &self,
        world: &W,
        friendlies: &[UnitSnapshot],
    ) -> Vec<Objective> {
        let candidates = gather_candidates(world, &self.config.objective_sources, self.config.team);
        let points: Vec<Point> = candidates.iter().map(|c| c.point).collect();
        let positions: Vec<Point> = friendlies.iter().map(|u| u.position).collect();
        let multipliers = &self.config.multipliers;

        match self
            .optimizer
            .assign(world, &points, &positions, |i| candidates[i].multiplier(multipliers))
        {
            Ok(assignment) => friendlies
                .iter()
                .zip(assignment)
                .map(|(unit, slot)| {
                    let objective = slot.map_or(Objective::None, |i| candidates[i].objective());
                    tracing::debug!("{} assigned {:?}", unit.call_sign, objective);
                    objective
                })
                .collect(),
            Err(e) => {
                tracing::error!("Objective assignment skipped: {}", e);
                vec![Objective::None; friendlies.len()]
            }
        }
    }

    /// Step towards (or act on) a positional objective
    fn pursue<W: Battlefield + ?Sized>(
        &self,
        world: &W,
        unit: &UnitSnapshot,
        objective: Objective,
        enemies: &[UnitSnapshot],
    ) -> Action {
        let Some(location) = objective.location() else {
            return Action::None;
        };

        if !objective.is_doable(world, enemies, self.config.team) {
            tracing::debug!("{}: {:?} is no longer doable", unit.call_sign, objective);
            return Action::None;
        }

        if unit.position == location {
            if let Objective::Pickup(point) = objective {
                return Action::PickUp(point);
            }
            if let Some(cp) = world.control_point_near(location) {
                tracing::debug!("{} holding {}", unit.call_sign, cp.name);
            }
            return Action::None;
        }

        let next = unit
            .position
            .step(world.next_step_direction(unit.position, location));
        if next == unit.position {
            tracing::debug!("{}: no path to {}", unit.call_sign, location);
            return Action::None;
        }

        if square_safety(world, next, enemies).is_tolerable() {
            return Action::Move(next);
        }

        match reroute(world, unit.position, location, enemies) {
            Some(detour) => {
                tracing::debug!(
                    "{}: {} is covered, sidestepping to {}",
                    unit.call_sign,
                    next,
                    detour
                );
                Action::Move(detour)
            }
            None => Action::None,
        }
    }

    /// Any unit with a shot takes it, whatever it was about to do
    fn combat_sweep<W: Battlefield + ?Sized>(
        &self,
        world: &W,
        friendlies: &[UnitSnapshot],
        enemies: &[UnitSnapshot],
        decisions: &mut [TurnDecision],
    ) {
        for (unit, decision) in friendlies.iter().zip(decisions.iter_mut()) {
            let range = unit.weapon.range();
            let in_range = enemies
                .iter()
                .filter(|enemy| world.can_shooter_hit_target(unit.position, enemy.position, range));

            let target = match self.config.combat_targeting {
                CombatTargeting::LastInRoster => in_range.last(),
                CombatTargeting::NearestByPath => nearest_enemy(world, unit.position, in_range),
            };

            if let Some(enemy) = target {
                if decision.action.kind() == ActionKind::Move {
                    tracing::debug!(
                        "{} drops {:?} to fire on {}",
                        unit.call_sign,
                        decision.objective,
                        enemy.call_sign
                    );
                }
                *decision = TurnDecision::shoot(unit.call_sign, enemy);
            }
        }
    }

    /// Units without any objective hunt the nearest enemy
    fn idle_fallback<W: Battlefield + ?Sized>(
        &self,
        world: &W,
        friendlies: &[UnitSnapshot],
        enemies: &[UnitSnapshot],
        decisions: &mut [TurnDecision],
    ) {
        for (unit, decision) in friendlies.iter().zip(decisions.iter_mut()) {
            if !decision.objective.is_none() {
                continue;
            }
            let Some(enemy) = nearest_enemy(world, unit.position, enemies) else {
                continue;
            };

            if world.can_shooter_hit_target(unit.position, enemy.position, unit.weapon.range()) {
                *decision = TurnDecision::shoot(unit.call_sign, enemy);
                continue;
            }

            let next = unit
                .position
                .step(world.next_step_direction(unit.position, enemy.position));
            decision.objective = Objective::Shoot(enemy.call_sign);
            decision.action = if next == unit.position {
                Action::None
            } else {
                Action::Move(next)
            };
        }
    }
}

/// Send every decided action to the engine
pub fn apply_record<S: ActionSink + ?Sized>(record: &TurnRecord, sink: &mut S) {
    for decision in &record.decisions {
        let unit = decision.call_sign;
        match decision.action {
            Action::Move(point) => sink.move_to(unit, point),
            Action::PickUp(_) => sink.pick_up(unit),
            Action::Shoot { target, .. } => sink.shoot_at(unit, target),
            Action::ActivateShield => sink.activate_shield(unit),
            Action::None => {}
        }
    }
}
