//! Random events: sampled independently each week from a fixed catalog,
//! with a mild population-size/week-number probability modifier. Effects
//! are grounded on the reference catalog (`event_engine/random_events.py`):
//! ResourceDiscovery, HealingSprings, AbundantHarvest, Migration,
//! WeatherChange, PestInfestation, TerritorialDispute.

use rand::Rng;

use crate::constants::{
    ABUNDANT_HARVEST_COOLDOWN, ABUNDANT_HARVEST_PROBABILITY, HEALING_SPRINGS_COOLDOWN,
    HEALING_SPRINGS_PROBABILITY, MIGRATION_COOLDOWN, MIGRATION_PROBABILITY,
    PEST_INFESTATION_COOLDOWN, PEST_INFESTATION_PROBABILITY, RESOURCE_DISCOVERY_COOLDOWN,
    RESOURCE_DISCOVERY_PROBABILITY, TERRITORIAL_DISPUTE_COOLDOWN, TERRITORIAL_DISPUTE_PROBABILITY,
    WEATHER_CHANGE_COOLDOWN, WEATHER_CHANGE_PROBABILITY,
};
use crate::grid::{Occupant, Resource, ResourceKind, Terrain};
use crate::ids::AgentId;
use crate::population::Population;
use crate::report::EventResult;

use super::EventFn;

/// A random event's static scheduling parameters plus its executor.
#[derive(Clone, Copy)]
pub struct RandomCandidate {
    pub name: &'static str,
    pub base_probability: f64,
    pub cooldown: u32,
    pub max_occurrences: u32,
    pub execute: EventFn,
}

impl RandomCandidate {
    /// Mild population-size and week-number multipliers, applied the way
    /// the reference event's optional modifiers compose: population over
    /// 10 nudges probability up 10%, week past 5 nudges it up a further 5%.
    pub fn modified_probability(&self, living_count: usize, week: u32) -> f64 {
        let mut prob = self.base_probability;
        if living_count > 10 {
            prob *= 1.1;
        }
        if week > 5 {
            prob *= 1.05;
        }
        prob.clamp(0.0, 1.0)
    }
}

pub fn catalog() -> Vec<RandomCandidate> {
    vec![
        RandomCandidate {
            name: "ResourceDiscovery",
            base_probability: RESOURCE_DISCOVERY_PROBABILITY,
            cooldown: RESOURCE_DISCOVERY_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: resource_discovery,
        },
        RandomCandidate {
            name: "HealingSprings",
            base_probability: HEALING_SPRINGS_PROBABILITY,
            cooldown: HEALING_SPRINGS_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: healing_springs,
        },
        RandomCandidate {
            name: "AbundantHarvest",
            base_probability: ABUNDANT_HARVEST_PROBABILITY,
            cooldown: ABUNDANT_HARVEST_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: abundant_harvest,
        },
        RandomCandidate {
            name: "Migration",
            base_probability: MIGRATION_PROBABILITY,
            cooldown: MIGRATION_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: migration,
        },
        RandomCandidate {
            name: "WeatherChange",
            base_probability: WEATHER_CHANGE_PROBABILITY,
            cooldown: WEATHER_CHANGE_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: weather_change,
        },
        RandomCandidate {
            name: "PestInfestation",
            base_probability: PEST_INFESTATION_PROBABILITY,
            cooldown: PEST_INFESTATION_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: pest_infestation,
        },
        RandomCandidate {
            name: "TerritorialDispute",
            base_probability: TERRITORIAL_DISPUTE_PROBABILITY,
            cooldown: TERRITORIAL_DISPUTE_COOLDOWN,
            max_occurrences: u32::MAX,
            execute: territorial_dispute,
        },
    ]
}

fn empty_result(kind: &str) -> EventResult {
    EventResult {
        kind: kind.to_string(),
        success: true,
        affected_agents: Vec::new(),
        casualties: Vec::new(),
        effects_applied: 0,
        resources_changed: 0,
        terrain_modified: 0,
        fault: None,
    }
}

fn sample_distinct(rng: &mut dyn rand::RngCore, ids: &[AgentId], count: usize) -> Vec<AgentId> {
    let mut pool = ids.to_vec();
    let mut chosen = Vec::with_capacity(count.min(pool.len()));
    for _ in 0..count.min(pool.len()) {
        let idx = rng.gen_range(0..pool.len());
        chosen.push(pool.swap_remove(idx));
    }
    chosen
}

/// Seed 2-5 new resources onto empty Plains/Forest tiles.
fn resource_discovery(rng: &mut dyn rand::RngCore, _population: &mut Population, world: &mut crate::grid::World) -> EventResult {
    let candidates: Vec<(i32, i32, Terrain)> = world
        .tiles()
        .iter()
        .filter(|t| matches!(t.terrain, Terrain::Plains | Terrain::Forest) && t.resource.is_none())
        .map(|t| (t.x, t.y, t.terrain))
        .collect();
    if candidates.is_empty() {
        return empty_result("ResourceDiscovery");
    }

    let count = rng.gen_range(2..=5).min(candidates.len());
    let mut pool = candidates;
    let mut changed = 0usize;
    for _ in 0..count {
        let idx = rng.gen_range(0..pool.len());
        let (x, y, terrain) = pool.swap_remove(idx);
        let kind = if terrain == Terrain::Forest && rng.gen_bool(0.5) {
            ResourceKind::Prey
        } else {
            ResourceKind::Plant
        };
        let uses = rng.gen_range(3..=8);
        world.tile_at_mut(x, y).unwrap().resource = Some(Resource::new(kind, uses as f32, uses));
        changed += 1;
    }

    EventResult {
        kind: "ResourceDiscovery".into(),
        resources_changed: changed,
        ..empty_result("ResourceDiscovery")
    }
}

/// Heal 30-70% of living agents.
fn healing_springs(rng: &mut dyn rand::RngCore, population: &mut Population, _world: &mut crate::grid::World) -> EventResult {
    let living_ids = population.living_ids();
    if living_ids.is_empty() {
        return empty_result("HealingSprings");
    }
    let rate = rng.gen_range(0.3..=0.7);
    let count = ((living_ids.len() as f64 * rate) as usize).clamp(1, living_ids.len());
    let affected = sample_distinct(rng, &living_ids, count);

    for &id in &affected {
        if let Some(animal) = population.get_mut(id) {
            animal.heal(rng.gen_range(15.0..=35.0));
            animal.gain_energy(rng.gen_range(10.0..=20.0));
        }
    }

    EventResult {
        kind: "HealingSprings".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        ..empty_result("HealingSprings")
    }
}

/// Every existing resource gains 2-5 uses.
fn abundant_harvest(rng: &mut dyn rand::RngCore, _population: &mut Population, world: &mut crate::grid::World) -> EventResult {
    let mut changed = 0usize;
    for tile in world.tiles_mut() {
        if let Some(resource) = tile.resource.as_mut() {
            if resource.uses_left > 0 {
                let bonus = rng.gen_range(2..=5);
                resource.uses_left += bonus;
                resource.quantity += bonus as f32;
                changed += 1;
            }
        }
    }

    EventResult {
        kind: "AbundantHarvest".into(),
        resources_changed: changed,
        ..empty_result("AbundantHarvest")
    }
}

/// Relocate 20-50% of agents to random valid (passable, empty) tiles.
fn migration(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut crate::grid::World) -> EventResult {
    let living_ids = population.living_ids();
    if living_ids.is_empty() {
        return empty_result("Migration");
    }
    let rate = rng.gen_range(0.2..=0.5);
    let count = ((living_ids.len() as f64 * rate) as usize).clamp(1, living_ids.len());
    let migrating = sample_distinct(rng, &living_ids, count);

    let mut valid: Vec<(i32, i32)> = world
        .tiles()
        .iter()
        .filter(|t| t.is_passable() && t.occupant.is_none())
        .map(|t| (t.x, t.y))
        .collect();

    let mut moved = Vec::new();
    for &id in &migrating {
        if valid.is_empty() {
            break;
        }
        let Some(animal) = population.get(id) else { continue };
        let (old_x, old_y) = (animal.x, animal.y);
        let category = animal.category;

        let idx = rng.gen_range(0..valid.len());
        let (new_x, new_y) = valid.swap_remove(idx);

        let _ = world.set_occupant(old_x, old_y, None);
        if world
            .set_occupant(new_x, new_y, Some(Occupant { id, category }))
            .is_ok()
        {
            let animal = population.get_mut(id).expect("checked above");
            animal.x = new_x;
            animal.y = new_y;
            moved.push(id);
        } else {
            let _ = world.set_occupant(old_x, old_y, Some(Occupant { id, category }));
        }
    }

    EventResult {
        kind: "Migration".into(),
        effects_applied: moved.len(),
        affected_agents: moved,
        ..empty_result("Migration")
    }
}

/// Shift every living agent's Energy by a weather-dependent band.
fn weather_change(rng: &mut dyn rand::RngCore, population: &mut Population, _world: &mut crate::grid::World) -> EventResult {
    let living_ids = population.living_ids();
    if living_ids.is_empty() {
        return empty_result("WeatherChange");
    }
    // -1: harsh, 1: mild, 2: perfect.
    const BANDS: [i32; 3] = [-1, 1, 2];
    let multiplier = BANDS[rng.gen_range(0..BANDS.len())];
    let mut affected = Vec::new();
    for &id in &living_ids {
        let Some(animal) = population.get_mut(id) else { continue };
        let magnitude = rng.gen_range(5.0..=15.0) * multiplier.unsigned_abs() as f32;
        if multiplier > 0 {
            animal.gain_energy(magnitude);
        } else {
            animal.spend_energy(magnitude);
        }
        affected.push(id);
    }

    EventResult {
        kind: "WeatherChange".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        ..empty_result("WeatherChange")
    }
}

/// 60% chance per Plant resource to lose 1-3 uses.
fn pest_infestation(rng: &mut dyn rand::RngCore, _population: &mut Population, world: &mut crate::grid::World) -> EventResult {
    let mut changed = 0usize;
    for tile in world.tiles_mut() {
        let Some(resource) = tile.resource.as_mut() else { continue };
        if resource.kind != ResourceKind::Plant || resource.uses_left == 0 {
            continue;
        }
        if rng.gen_bool(0.6) {
            let reduction = rng.gen_range(1..=3);
            for _ in 0..reduction {
                if resource.consume_one() {
                    break;
                }
            }
            changed += 1;
        }
    }
    for tile in world.tiles_mut() {
        if matches!(&tile.resource, Some(r) if r.uses_left == 0) {
            tile.resource = None;
        }
    }

    EventResult {
        kind: "PestInfestation".into(),
        resources_changed: changed,
        ..empty_result("PestInfestation")
    }
}

/// Stress 30-60% (at least 2) of living agents: mild Health/Energy loss.
fn territorial_dispute(rng: &mut dyn rand::RngCore, population: &mut Population, _world: &mut crate::grid::World) -> EventResult {
    let living_ids = population.living_ids();
    if living_ids.len() < 2 {
        return empty_result("TerritorialDispute");
    }
    let rate = rng.gen_range(0.3..=0.6);
    let count = ((living_ids.len() as f64 * rate) as usize).clamp(2, living_ids.len());
    let affected = sample_distinct(rng, &living_ids, count);

    for &id in &affected {
        if let Some(animal) = population.get_mut(id) {
            animal.take_damage(rng.gen_range(3.0..=8.0));
            animal.spend_energy(rng.gen_range(5.0..=12.0));
        }
    }

    EventResult {
        kind: "TerritorialDispute".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        ..empty_result("TerritorialDispute")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Category, Traits};
    use crate::grid::World;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn healing_springs_heals_at_least_one_agent() {
        let mut population = Population::new();
        let id = population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        population.get_mut(id).unwrap().vitals.health = 10.0;
        let mut world = World::new(5, 5);
        let mut rng = Pcg64::seed_from_u64(1);
        let result = healing_springs(&mut rng, &mut population, &mut world);
        assert!(result.effects_applied >= 1);
    }

    #[test]
    fn abundant_harvest_only_touches_existing_resources() {
        let mut population = Population::new();
        let mut world = World::new(3, 3);
        world.tile_at_mut(0, 0).unwrap().resource = Some(Resource::new(ResourceKind::Plant, 10.0, 1));
        let mut rng = Pcg64::seed_from_u64(1);
        let result = abundant_harvest(&mut rng, &mut population, &mut world);
        assert_eq!(result.resources_changed, 1);
    }

    #[test]
    fn catalog_has_seven_events() {
        assert_eq!(catalog().len(), 7);
    }
}
