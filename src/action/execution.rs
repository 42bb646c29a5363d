//! Execution Phase: P1 stationary actions (Rest, Eat, Drink, Attack) then
//! P2 movement, with conflict resolution by (AGI desc, STR desc, id asc).
//!
//! Move-into-occupied-tile is simplified to "always blocked" — displacement
//! only happens via an explicit, successful Attack — so movement conflicts
//! only arise between movers targeting a tile that is empty at the start
//! of the phase.

use std::collections::HashMap;

use rand::Rng;

use crate::action::{ActionKind, PlannedAction};
use crate::constants::{
    ATTACK_DAMAGE_MAX, ATTACK_DAMAGE_MIN, ATTACK_HIT_CHANCE_BASE, ATTACK_HIT_CHANCE_MAX,
    ATTACK_HIT_CHANCE_MIN, DRINK_RESOURCE_CONSUME_PROB, DRINK_THIRST_GAIN, MEAT_GAIN_CARNIVORE,
    MEAT_GAIN_OTHER, PLANT_GAIN_HERBIVORE, PLANT_GAIN_OTHER, REST_ENERGY_GAIN, REST_HEALTH_GAIN,
};
use crate::error::ActionFailure;
use crate::agent::{Category, DeathCause};
use crate::grid::{Occupant, ResourceKind, Terrain, World};
use crate::ids::AgentId;
use crate::population::Population;
use crate::report::{ActionOutcome, Casualty, WeekReport};

pub fn apply(
    planned: &[PlannedAction],
    population: &mut Population,
    world: &mut World,
    rng: &mut impl Rng,
    report: &mut WeekReport,
) {
    let (stationary, movement): (Vec<_>, Vec<_>) =
        planned.iter().partition(|p| !p.kind.is_movement());

    for action in stationary {
        let outcome = match action.kind {
            ActionKind::Rest => execute_rest(action.agent_id, population),
            ActionKind::Eat => execute_eat(action, population, world, report),
            ActionKind::Drink => execute_drink(action, population, world, rng, report),
            ActionKind::Attack => execute_attack(action, population, world, rng, report),
            _ => unreachable!("movement kinds were partitioned out"),
        };
        record(report, outcome);
    }

    apply_movement(&movement, population, world, report);
}

fn record(report: &mut WeekReport, outcome: ActionOutcome) {
    if outcome.success {
        report.actions_executed += 1;
    } else {
        report.actions_failed += 1;
    }
    report.outcomes.push(outcome);
}

fn execute_rest(agent_id: AgentId, population: &mut Population) -> ActionOutcome {
    let animal = population.get_mut(agent_id).expect("planned action for live agent");
    let cap_energy = animal.max_energy();
    let cap_health = animal.max_health();
    animal.gain_energy(REST_ENERGY_GAIN.min(cap_energy - animal.vitals.energy));
    animal.heal(REST_HEALTH_GAIN.min(cap_health - animal.vitals.health));
    ActionOutcome {
        agent_id,
        action: ActionKind::Rest,
        success: true,
        failure: None,
    }
}

fn execute_eat(
    action: &PlannedAction,
    population: &mut Population,
    world: &mut World,
    report: &mut WeekReport,
) -> ActionOutcome {
    let fail = |f: ActionFailure| ActionOutcome {
        agent_id: action.agent_id,
        action: ActionKind::Eat,
        success: false,
        failure: Some(f),
    };

    let Some((tx, ty)) = action.target else {
        return fail(ActionFailure::NoTarget);
    };
    let animal = population.get_mut(action.agent_id).expect("planned action for live agent");
    if !animal.vitals.has_enough_energy(ActionKind::Eat.energy_cost()) {
        return fail(ActionFailure::InsufficientResource);
    }
    let category = animal.category;

    let Ok(tile) = world.tile_at_mut(tx, ty) else {
        return fail(ActionFailure::NoTarget);
    };
    let Some(resource) = tile.resource.as_mut() else {
        report.resource_conflicts += 1;
        return fail(ActionFailure::NoTarget);
    };
    if !category.can_eat(resource.kind) {
        return fail(ActionFailure::NoTarget);
    }

    let gain = nutrition_gain(resource.kind, category);
    let exhausted = resource.consume_one();
    if exhausted {
        tile.resource = None;
    }

    let animal = population.get_mut(action.agent_id).expect("agent still present");
    animal.spend_energy(ActionKind::Eat.energy_cost());
    animal.gain_hunger(gain);
    animal.fitness.resource_units_consumed += gain;

    ActionOutcome {
        agent_id: action.agent_id,
        action: ActionKind::Eat,
        success: true,
        failure: None,
    }
}

fn nutrition_gain(kind: ResourceKind, category: Category) -> f32 {
    match kind {
        ResourceKind::Plant => {
            if category == Category::Herbivore {
                PLANT_GAIN_HERBIVORE
            } else {
                PLANT_GAIN_OTHER
            }
        }
        ResourceKind::Prey | ResourceKind::Carcass => {
            if category == Category::Carnivore {
                MEAT_GAIN_CARNIVORE
            } else {
                MEAT_GAIN_OTHER
            }
        }
        ResourceKind::Water => 0.0,
    }
}

fn execute_drink(
    action: &PlannedAction,
    population: &mut Population,
    world: &mut World,
    rng: &mut impl Rng,
    report: &mut WeekReport,
) -> ActionOutcome {
    let fail = |f: ActionFailure| ActionOutcome {
        agent_id: action.agent_id,
        action: ActionKind::Drink,
        success: false,
        failure: Some(f),
    };

    let Some((tx, ty)) = action.target else {
        return fail(ActionFailure::NoTarget);
    };
    let animal = population.get_mut(action.agent_id).expect("planned action for live agent");
    if !animal.vitals.has_enough_energy(ActionKind::Drink.energy_cost()) {
        return fail(ActionFailure::InsufficientResource);
    }

    let Ok(tile) = world.tile_at_mut(tx, ty) else {
        return fail(ActionFailure::NoTarget);
    };
    let has_water_resource = matches!(&tile.resource, Some(r) if r.kind == ResourceKind::Water);
    let has_water_terrain = tile.terrain == Terrain::Water;
    if !has_water_resource && !has_water_terrain {
        report.resource_conflicts += 1;
        return fail(ActionFailure::NoTarget);
    }

    if has_water_resource && rng.gen_bool(DRINK_RESOURCE_CONSUME_PROB) {
        let resource = tile.resource.as_mut().expect("checked above");
        if resource.consume_one() {
            tile.resource = None;
        }
    }

    let animal = population.get_mut(action.agent_id).expect("agent still present");
    animal.spend_energy(ActionKind::Drink.energy_cost());
    animal.vitals.gain_thirst(DRINK_THIRST_GAIN);
    animal.fitness.resource_units_consumed += DRINK_THIRST_GAIN;

    ActionOutcome {
        agent_id: action.agent_id,
        action: ActionKind::Drink,
        success: true,
        failure: None,
    }
}

fn execute_attack(
    action: &PlannedAction,
    population: &mut Population,
    world: &mut World,
    rng: &mut impl Rng,
    report: &mut WeekReport,
) -> ActionOutcome {
    let fail = |f: ActionFailure| ActionOutcome {
        agent_id: action.agent_id,
        action: ActionKind::Attack,
        success: false,
        failure: Some(f),
    };

    let Some((tx, ty)) = action.target else {
        return fail(ActionFailure::NoTarget);
    };
    let attacker = population.get(action.agent_id).expect("planned action for live agent");
    if !attacker.vitals.has_enough_energy(ActionKind::Attack.energy_cost()) {
        return fail(ActionFailure::InsufficientResource);
    }
    let attacker_strength = attacker.traits.strength;
    let (ax, ay) = (attacker.x, attacker.y);

    let Ok(tile) = world.tile_at(tx, ty) else {
        return fail(ActionFailure::NoTarget);
    };
    let Some(Occupant { id: defender_id, .. }) = tile.occupant else {
        return fail(ActionFailure::NoTarget);
    };
    if defender_id == action.agent_id {
        return fail(ActionFailure::NoTarget);
    }

    let Some(defender) = population.get(defender_id) else {
        return fail(ActionFailure::TargetGone);
    };
    if !defender.is_alive() {
        return fail(ActionFailure::TargetGone);
    }
    let defender_agility = defender.traits.agility;

    population
        .get_mut(action.agent_id)
        .expect("attacker present")
        .spend_energy(ActionKind::Attack.energy_cost());

    let hit_chance = (ATTACK_HIT_CHANCE_BASE
        + (attacker_strength as f32 - defender_agility as f32) / 200.0)
        .clamp(ATTACK_HIT_CHANCE_MIN, ATTACK_HIT_CHANCE_MAX);

    if rng.gen::<f32>() < hit_chance {
        let damage =
            rng.gen_range(ATTACK_DAMAGE_MIN..=ATTACK_DAMAGE_MAX) + (attacker_strength as f32 - 50.0) / 10.0;
        let defender = population.get_mut(defender_id).expect("checked above");
        defender.take_damage(damage.max(0.0));

        if defender.vitals.health <= 0.0 {
            defender.kill(DeathCause::Health);
            let _ = world.set_occupant(tx, ty, None);
            let _ = world.set_occupant(ax, ay, None);
            let attacker_category = population.get(action.agent_id).expect("attacker present").category;
            let _ = world.set_occupant(
                tx,
                ty,
                Some(Occupant {
                    id: action.agent_id,
                    category: attacker_category,
                }),
            );
            let attacker = population.get_mut(action.agent_id).expect("attacker present");
            attacker.x = tx;
            attacker.y = ty;
            attacker.fitness.kills += 1;
            report.casualties.push(Casualty {
                agent_id: defender_id,
                cause: DeathCause::Health,
            });
        }
    }

    ActionOutcome {
        agent_id: action.agent_id,
        action: ActionKind::Attack,
        success: true,
        failure: None,
    }
}

fn apply_movement(
    movement: &[&PlannedAction],
    population: &mut Population,
    world: &mut World,
    report: &mut WeekReport,
) {
    let mut by_target: HashMap<(i32, i32), Vec<&PlannedAction>> = HashMap::new();
    for action in movement {
        let target = action.target.expect("movement action always has a target");
        by_target.entry(target).or_default().push(action);
    }

    // Deterministic iteration order over target tiles: by (x, y).
    let mut targets: Vec<(i32, i32)> = by_target.keys().copied().collect();
    targets.sort_unstable();

    for target in targets {
        let candidates = &by_target[&target];
        resolve_target(target, candidates, population, world, report);
    }
}

fn resolve_target(
    target: (i32, i32),
    candidates: &[&PlannedAction],
    population: &mut Population,
    world: &mut World,
    report: &mut WeekReport,
) {
    let (tx, ty) = target;

    let blocked_reason = match world.tile_at(tx, ty) {
        Err(_) => Some(ActionFailure::NoTarget),
        Ok(tile) if tile.terrain == Terrain::Mountains => Some(ActionFailure::Mountain),
        Ok(tile) if tile.occupant.is_some() => Some(ActionFailure::Encounter),
        Ok(_) => None,
    };

    if let Some(reason) = blocked_reason {
        for action in candidates {
            record(
                report,
                ActionOutcome {
                    agent_id: action.agent_id,
                    action: action.kind,
                    success: false,
                    failure: Some(reason),
                },
            );
        }
        return;
    }

    // Tile is empty and passable: only agents with enough energy compete.
    let mut eligible: Vec<&PlannedAction> = Vec::new();
    for action in candidates {
        let animal = population.get(action.agent_id).expect("planned action for live agent");
        if animal.vitals.has_enough_energy(ActionKind::MoveN.energy_cost()) {
            eligible.push(action);
        } else {
            record(
                report,
                ActionOutcome {
                    agent_id: action.agent_id,
                    action: action.kind,
                    success: false,
                    failure: Some(ActionFailure::InsufficientResource),
                },
            );
        }
    }

    if eligible.is_empty() {
        return;
    }

    if eligible.len() > 1 {
        report.movement_conflicts += 1;
    }

    eligible.sort_by(|a, b| {
        let animal_a = population.get(a.agent_id).unwrap();
        let animal_b = population.get(b.agent_id).unwrap();
        animal_b
            .traits
            .agility
            .cmp(&animal_a.traits.agility)
            .then(animal_b.traits.strength.cmp(&animal_a.traits.strength))
            .then(a.agent_id.as_u64().cmp(&b.agent_id.as_u64()))
    });

    let winner = eligible[0];
    for loser in &eligible[1..] {
        record(
            report,
            ActionOutcome {
                agent_id: loser.agent_id,
                action: loser.kind,
                success: false,
                failure: Some(ActionFailure::ConflictLost),
            },
        );
    }

    let animal = population.get_mut(winner.agent_id).expect("winner present");
    let (sx, sy) = (animal.x, animal.y);
    let category = animal.category;
    animal.spend_energy(ActionKind::MoveN.energy_cost());
    animal.x = tx;
    animal.y = ty;
    animal.fitness.distance_traveled += 1;

    let _ = world.set_occupant(sx, sy, None);
    let _ = world.set_occupant(tx, ty, Some(Occupant { id: winner.agent_id, category }));

    record(
        report,
        ActionOutcome {
            agent_id: winner.agent_id,
            action: winner.kind,
            success: true,
            failure: None,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Traits;
    use crate::grid::Resource;
    use rand::SeedableRng;

    fn spawn(population: &mut Population, category: Category, agi: u32, str_: u32, x: i32, y: i32) -> AgentId {
        population.spawn(category, Traits::new(str_, agi, 50, 50, 50), x, y, None)
    }

    #[test]
    fn movement_conflict_winner_is_highest_agility() {
        let mut population = Population::new();
        let a = spawn(&mut population, Category::Herbivore, 90, 50, 1, 1);
        let b = spawn(&mut population, Category::Herbivore, 60, 90, 3, 1);
        let mut world = World::new(5, 5);
        world
            .set_occupant(1, 1, Some(Occupant { id: a, category: Category::Herbivore }))
            .unwrap();
        world
            .set_occupant(3, 1, Some(Occupant { id: b, category: Category::Herbivore }))
            .unwrap();

        let planned = vec![
            PlannedAction { agent_id: a, kind: ActionKind::MoveE, target: Some((2, 1)), energy_cost: 5.0 },
            PlannedAction { agent_id: b, kind: ActionKind::MoveW, target: Some((2, 1)), energy_cost: 5.0 },
        ];
        let mut report = WeekReport::new(0);
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
        apply(&planned, &mut population, &mut world, &mut rng, &mut report);

        assert_eq!(population.get(a).unwrap().x, 2);
        assert_eq!(population.get(b).unwrap().x, 3);
        assert_eq!(report.movement_conflicts, 1);
    }

    #[test]
    fn eat_consumes_resource_and_removes_when_exhausted() {
        let mut population = Population::new();
        let id = spawn(&mut population, Category::Herbivore, 50, 50, 1, 1);
        population.get_mut(id).unwrap().vitals.hunger = 0.0;
        let mut world = World::new(3, 3);
        world.tile_at_mut(1, 0).unwrap().resource = Some(Resource::new(ResourceKind::Plant, 30.0, 1));
        let planned = vec![PlannedAction { agent_id: id, kind: ActionKind::Eat, target: Some((1, 0)), energy_cost: 2.0 }];
        let mut report = WeekReport::new(0);
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
        apply(&planned, &mut population, &mut world, &mut rng, &mut report);

        assert_eq!(population.get(id).unwrap().vitals.hunger, 30.0);
        assert!(world.tile_at(1, 0).unwrap().resource.is_none());
        assert_eq!(report.actions_executed, 1);
    }

    #[test]
    fn move_into_occupied_tile_is_always_blocked() {
        let mut population = Population::new();
        let a = spawn(&mut population, Category::Herbivore, 90, 90, 1, 1);
        let b = spawn(&mut population, Category::Herbivore, 10, 10, 2, 1);
        let mut world = World::new(5, 5);
        world.set_occupant(1, 1, Some(Occupant { id: a, category: Category::Herbivore })).unwrap();
        world.set_occupant(2, 1, Some(Occupant { id: b, category: Category::Herbivore })).unwrap();

        let planned = vec![PlannedAction { agent_id: a, kind: ActionKind::MoveE, target: Some((2, 1)), energy_cost: 5.0 }];
        let mut report = WeekReport::new(0);
        let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
        apply(&planned, &mut population, &mut world, &mut rng, &mut report);

        assert_eq!(population.get(a).unwrap().x, 1);
        assert_eq!(report.outcomes[0].failure, Some(ActionFailure::Encounter));
    }
}
