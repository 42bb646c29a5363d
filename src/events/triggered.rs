//! Triggered events: fire when a condition over simulation state holds
//! and an independent probability check then succeeds. Effects are
//! grounded on the reference `OverpopulationEvent` / `ExtinctionThreatEvent`
//! / `ResourceScarcityEvent` / `DiseaseOutbreakEvent` implementations
//! (`event_engine/triggered_events.py`), translated from status-dict
//! mutation into `Vitals`/`Resource` method calls.

use rand::Rng;

use crate::constants::{
    DISEASE_AFFECTED_RATIO_THRESHOLD, DISEASE_HEALTH_THRESHOLD, DISEASE_OUTBREAK_COOLDOWN,
    DISEASE_OUTBREAK_PROBABILITY, NEAR_EXTINCTION_COOLDOWN, NEAR_EXTINCTION_LIVING_THRESHOLD,
    NEAR_EXTINCTION_PROBABILITY, OVERPOPULATION_COOLDOWN, OVERPOPULATION_DENSITY_THRESHOLD,
    OVERPOPULATION_PROBABILITY, RESOURCE_SCARCITY_COOLDOWN, RESOURCE_SCARCITY_PROBABILITY,
    RESOURCE_SCARCITY_RATIO_THRESHOLD,
};
use crate::agent::DeathCause;
use crate::grid::World;
use crate::ids::AgentId;
use crate::population::Population;
use crate::report::EventResult;

use super::EventFn;

/// A triggered event whose condition currently holds, ready for the
/// scheduler's cooldown/cap/probability gate.
pub struct TriggeredCandidate {
    pub name: &'static str,
    pub probability: f64,
    pub cooldown: u32,
    pub max_occurrences: u32,
    pub execute: EventFn,
}

/// Evaluate every triggered event's condition against current state and
/// return those whose condition holds, in fixed priority order.
pub fn candidates(population: &Population, world: &World) -> Vec<TriggeredCandidate> {
    let mut out = Vec::new();

    if overpopulation_condition(population, world) {
        out.push(TriggeredCandidate {
            name: "Overpopulation",
            probability: OVERPOPULATION_PROBABILITY,
            cooldown: OVERPOPULATION_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: overpopulation,
        });
    }
    if near_extinction_condition(population) {
        out.push(TriggeredCandidate {
            name: "NearExtinction",
            probability: NEAR_EXTINCTION_PROBABILITY,
            cooldown: NEAR_EXTINCTION_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: near_extinction,
        });
    }
    if resource_scarcity_condition(world) {
        out.push(TriggeredCandidate {
            name: "ResourceScarcity",
            probability: RESOURCE_SCARCITY_PROBABILITY,
            cooldown: RESOURCE_SCARCITY_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: resource_scarcity,
        });
    }
    if disease_condition(population) {
        out.push(TriggeredCandidate {
            name: "DiseaseOutbreak",
            probability: DISEASE_OUTBREAK_PROBABILITY,
            cooldown: DISEASE_OUTBREAK_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: disease_outbreak,
        });
    }

    out
}

fn overpopulation_condition(population: &Population, world: &World) -> bool {
    let living = population.living_count();
    if living == 0 {
        return false;
    }
    let density = living as f32 / (world.width * world.height) as f32;
    density >= OVERPOPULATION_DENSITY_THRESHOLD
}

fn near_extinction_condition(population: &Population) -> bool {
    let living = population.living_count();
    living > 0 && living <= NEAR_EXTINCTION_LIVING_THRESHOLD
}

fn resource_scarcity_condition(world: &World) -> bool {
    let total = (world.width * world.height) as f32;
    if total == 0.0 {
        return false;
    }
    let with_resource = world.resource_count() as f32;
    (with_resource / total) < RESOURCE_SCARCITY_RATIO_THRESHOLD
}

fn disease_condition(population: &Population) -> bool {
    let living: Vec<_> = population.iter_living().collect();
    if living.len() < 3 {
        return false;
    }
    let unhealthy = living.iter().filter(|a| a.vitals.health < DISEASE_HEALTH_THRESHOLD).count();
    (unhealthy as f32 / living.len() as f32) >= DISEASE_AFFECTED_RATIO_THRESHOLD
}

/// Stress: up to a third of the living population (capped at 5) loses
/// Health and Energy from crowding.
fn overpopulation(rng: &mut dyn rand::RngCore, population: &mut Population, _world: &mut World) -> EventResult {
    let living_ids = population.living_ids();
    let affected_count = (living_ids.len() / 3).min(5);
    if affected_count == 0 {
        return EventResult {
            kind: "Overpopulation".into(),
            success: true,
            affected_agents: Vec::new(),
            casualties: Vec::new(),
            effects_applied: 0,
            resources_changed: 0,
            terrain_modified: 0,
            fault: None,
        };
    }

    let affected = sample_distinct(rng, &living_ids, affected_count);
    for &id in &affected {
        if let Some(animal) = population.get_mut(id) {
            animal.take_damage(rng.gen_range(5.0..=15.0));
            animal.spend_energy(rng.gen_range(10.0..=20.0));
        }
    }

    EventResult {
        kind: "Overpopulation".into(),
        success: true,
        affected_agents: affected.clone(),
        casualties: Vec::new(),
        effects_applied: affected.len(),
        resources_changed: 0,
        terrain_modified: 0,
        fault: None,
    }
}

/// Boost every survivor's Health and Energy, giving a crashed population
/// a fighting chance.
fn near_extinction(rng: &mut dyn rand::RngCore, population: &mut Population, _world: &mut World) -> EventResult {
    let mut affected = Vec::new();
    for animal in population.iter_mut().filter(|a| a.is_alive()) {
        animal.heal(rng.gen_range(10.0..=25.0));
        animal.gain_energy(rng.gen_range(15.0..=30.0));
        affected.push(animal.id);
    }

    EventResult {
        kind: "NearExtinction".into(),
        success: true,
        effects_applied: affected.len(),
        affected_agents: affected,
        casualties: Vec::new(),
        resources_changed: 0,
        terrain_modified: 0,
        fault: None,
    }
}

/// Every remaining resource loses 1-3 uses, accelerating an already
/// scarce world toward exhaustion.
fn resource_scarcity(rng: &mut dyn rand::RngCore, _population: &mut Population, world: &mut World) -> EventResult {
    let mut changed = 0usize;
    for tile in world.tiles_mut() {
        if let Some(resource) = tile.resource.as_mut() {
            if resource.uses_left > 0 {
                let reduction = rng.gen_range(1..=3);
                for _ in 0..reduction {
                    if resource.consume_one() {
                        break;
                    }
                }
                changed += 1;
            }
        }
    }
    for tile in world.tiles_mut() {
        if matches!(&tile.resource, Some(r) if r.uses_left == 0) {
            tile.resource = None;
        }
    }

    EventResult {
        kind: "ResourceScarcity".into(),
        success: true,
        affected_agents: Vec::new(),
        casualties: Vec::new(),
        effects_applied: 0,
        resources_changed: changed,
        terrain_modified: 0,
        fault: None,
    }
}

/// Infect 30-60% of the living population: Health/Energy drain, with
/// casualties recorded (not removed from the grid here — Status Phase
/// bookkeeping owns that; a disease casualty's tile is cleared
/// immediately since this runs after Status for the week).
fn disease_outbreak(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut World) -> EventResult {
    let living_ids = population.living_ids();
    if living_ids.len() < 2 {
        return EventResult {
            kind: "DiseaseOutbreak".into(),
            success: true,
            affected_agents: Vec::new(),
            casualties: Vec::new(),
            effects_applied: 0,
            resources_changed: 0,
            terrain_modified: 0,
            fault: None,
        };
    }

    let rate = rng.gen_range(0.3..=0.6);
    let affected_count = ((living_ids.len() as f64 * rate) as usize).clamp(1, living_ids.len());
    let affected = sample_distinct(rng, &living_ids, affected_count);

    let mut casualties = Vec::new();
    for &id in &affected {
        let Some(animal) = population.get_mut(id) else { continue };
        animal.take_damage(rng.gen_range(15.0..=35.0));
        animal.spend_energy(rng.gen_range(20.0..=40.0));
        if animal.vitals.health <= 0.0 {
            let (x, y) = (animal.x, animal.y);
            animal.kill(DeathCause::Health);
            let _ = world.set_occupant(x, y, None);
            casualties.push(id);
        }
    }

    EventResult {
        kind: "DiseaseOutbreak".into(),
        success: true,
        effects_applied: affected.len(),
        affected_agents: affected,
        casualties,
        resources_changed: 0,
        terrain_modified: 0,
        fault: None,
    }
}

/// Sample up to `count` distinct ids from `ids` without replacement.
fn sample_distinct(rng: &mut dyn rand::RngCore, ids: &[AgentId], count: usize) -> Vec<AgentId> {
    let mut pool = ids.to_vec();
    let mut chosen = Vec::with_capacity(count.min(pool.len()));
    for _ in 0..count.min(pool.len()) {
        let idx = rng.gen_range(0..pool.len());
        chosen.push(pool.swap_remove(idx));
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Category, Traits};
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn near_extinction_fires_below_threshold() {
        let mut population = Population::new();
        population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        assert!(near_extinction_condition(&population));
    }

    #[test]
    fn near_extinction_heals_all_survivors() {
        let mut population = Population::new();
        let id = population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        population.get_mut(id).unwrap().vitals.health = 10.0;
        let mut world = World::new(5, 5);
        let mut rng = Pcg64::seed_from_u64(1);
        let result = near_extinction(&mut rng, &mut population, &mut world);
        assert_eq!(result.effects_applied, 1);
        assert!(population.get(id).unwrap().vitals.health > 10.0);
    }

    #[test]
    fn resource_scarcity_condition_holds_on_empty_world() {
        let world = World::new(5, 5);
        assert!(resource_scarcity_condition(&world));
    }
}
