//! Disasters: the most severe event class, area-of-effect (except Plague)
//! over a random epicenter, gated by the living-count/week-number
//! probability modifier. Canonical per-disaster damage/resource tables are
//! grounded on the reference catalog (`event_engine/disaster_events.py`)
//! for base probability, cooldown, max_occurrences and AoE radius, and on
//! the frozen canonical semantics for exact damage ranges.

use rand::Rng;

use crate::constants::{
    DISASTER_MODIFIER_HIGH_POPULATION, DISASTER_MODIFIER_HIGH_POPULATION_THRESHOLD,
    DISASTER_MODIFIER_LATE_WEEK, DISASTER_MODIFIER_LATE_WEEK_THRESHOLD,
    DISASTER_MODIFIER_LOW_POPULATION, DISASTER_MODIFIER_LOW_POPULATION_THRESHOLD,
    DISASTER_MODIFIER_MID_WEEK, DISASTER_MODIFIER_MID_WEEK_THRESHOLD, DROUGHT_FLOOR_DENSITY,
};
use crate::agent::DeathCause;
use crate::grid::{ResourceKind, World};
use crate::ids::AgentId;
use crate::population::Population;
use crate::report::EventResult;

use super::EventFn;

/// Damage multiplier the canonical disaster table applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Catastrophic,
}

impl Severity {
    fn multiplier(self) -> f32 {
        match self {
            Severity::Minor => 0.5,
            Severity::Moderate => 1.0,
            Severity::Major => 1.5,
            Severity::Catastrophic => 2.0,
        }
    }
}

pub struct DisasterCandidate {
    pub name: &'static str,
    pub base_probability: f64,
    pub cooldown: u32,
    pub max_occurrences: u32,
    pub execute: EventFn,
}

pub fn catalog() -> Vec<DisasterCandidate> {
    vec![
        DisasterCandidate { name: "Earthquake", base_probability: 0.05, cooldown: 10, max_occurrences: 3, execute: earthquake },
        DisasterCandidate { name: "Wildfire", base_probability: 0.08, cooldown: 8, max_occurrences: 2, execute: wildfire },
        DisasterCandidate { name: "Flood", base_probability: 0.06, cooldown: 6, max_occurrences: 4, execute: flood },
        DisasterCandidate { name: "Drought", base_probability: 0.04, cooldown: 12, max_occurrences: 2, execute: drought },
        DisasterCandidate { name: "ToxicSpill", base_probability: 0.03, cooldown: 15, max_occurrences: 1, execute: toxic_spill },
        DisasterCandidate { name: "Plague", base_probability: 0.02, cooldown: 20, max_occurrences: 1, execute: plague },
        DisasterCandidate { name: "PredatorInvasion", base_probability: 0.06, cooldown: 8, max_occurrences: 3, execute: predator_invasion },
    ]
}

/// Applies the living-count and week-number probability modifiers common
/// to every disaster (population <= 3 -> x0.3; > 15 -> x1.5; week > 10 ->
/// x1.2; week > 5 -> x1.1; baseline 1.0).
pub fn modified_probability(base: f64, living_count: usize, week: u32) -> f64 {
    let mut modifier = 1.0f32;
    if living_count <= DISASTER_MODIFIER_LOW_POPULATION_THRESHOLD {
        modifier = DISASTER_MODIFIER_LOW_POPULATION;
    } else if living_count > DISASTER_MODIFIER_HIGH_POPULATION_THRESHOLD {
        modifier = DISASTER_MODIFIER_HIGH_POPULATION;
    }
    if week > DISASTER_MODIFIER_LATE_WEEK_THRESHOLD {
        modifier *= DISASTER_MODIFIER_LATE_WEEK;
    } else if week > DISASTER_MODIFIER_MID_WEEK_THRESHOLD {
        modifier *= DISASTER_MODIFIER_MID_WEEK;
    }
    (base * modifier as f64).clamp(0.0, 1.0)
}

fn random_epicenter(rng: &mut dyn rand::RngCore, world: &World) -> (i32, i32) {
    (rng.gen_range(0..world.width), rng.gen_range(0..world.height))
}

/// Tiles within Euclidean distance `radius` of `epicenter`.
fn affected_tiles(world: &World, epicenter: (i32, i32), radius: f32) -> Vec<(i32, i32)> {
    let (ex, ey) = epicenter;
    (0..world.width)
        .flat_map(|x| (0..world.height).map(move |y| (x, y)))
        .filter(|&(x, y)| {
            let dx = (x - ex) as f32;
            let dy = (y - ey) as f32;
            (dx * dx + dy * dy).sqrt() <= radius
        })
        .collect()
}

fn occupants_in(world: &World, tiles: &[(i32, i32)]) -> Vec<AgentId> {
    tiles
        .iter()
        .filter_map(|&(x, y)| world.tile_at(x, y).ok().and_then(|t| t.occupant).map(|o| o.id))
        .collect()
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

fn earthquake(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut World) -> EventResult {
    let epicenter = random_epicenter(rng, world);
    let radius = 4.0f32;
    let sev = Severity::Major.multiplier();
    let tiles = affected_tiles(world, epicenter, radius);

    let mut casualties = Vec::new();
    let mut affected = Vec::new();
    for &id in &occupants_in(world, &tiles) {
        let Some(animal) = population.get_mut(id) else { continue };
        let d = dist(epicenter, (animal.x, animal.y));
        let dist_factor = (1.0 - d / radius).max(0.3);
        animal.take_damage(rng.gen_range(20.0..=40.0) * sev * dist_factor);
        animal.spend_energy(rng.gen_range(15.0..=25.0));
        affected.push(id);
        if animal.vitals.health <= 0.0 {
            let (x, y) = (animal.x, animal.y);
            animal.kill(DeathCause::Health);
            let _ = world.set_occupant(x, y, None);
            casualties.push(id);
        }
    }

    let mut resources_changed = 0;
    for &(x, y) in &tiles {
        if world.tile_at(x, y).unwrap().resource.is_none() || !rng.gen_bool(0.7) {
            continue;
        }
        let tile = world.tile_at_mut(x, y).unwrap();
        if rng.gen_bool(0.5) {
            tile.resource = None;
        } else {
            let reduction = rng.gen_range(2..=5);
            let resource = tile.resource.as_mut().unwrap();
            for _ in 0..reduction {
                if resource.consume_one() {
                    break;
                }
            }
            if resource.uses_left == 0 {
                tile.resource = None;
            }
        }
        resources_changed += 1;
    }

    EventResult {
        kind: "Earthquake".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        casualties,
        resources_changed,
        ..empty_result("Earthquake")
    }
}

fn dist(a: (i32, i32), b: (i32, i32)) -> f32 {
    let dx = (a.0 - b.0) as f32;
    let dy = (a.1 - b.1) as f32;
    (dx * dx + dy * dy).sqrt()
}

fn wildfire(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut World) -> EventResult {
    let epicenter = random_epicenter(rng, world);
    let radius = 5.0f32;
    let sev = Severity::Major.multiplier();
    let tiles = affected_tiles(world, epicenter, radius);

    let mut casualties = Vec::new();
    let mut affected = Vec::new();
    for &id in &occupants_in(world, &tiles) {
        let Some(animal) = population.get_mut(id) else { continue };
        animal.take_damage(rng.gen_range(25.0..=45.0) * sev);
        animal.spend_energy(rng.gen_range(20.0..=35.0));
        affected.push(id);
        if animal.vitals.health <= 0.0 {
            let (x, y) = (animal.x, animal.y);
            animal.kill(DeathCause::Health);
            let _ = world.set_occupant(x, y, None);
            casualties.push(id);
        }
    }

    let mut resources_changed = 0;
    for &(x, y) in &tiles {
        let tile = world.tile_at_mut(x, y).unwrap();
        let Some(resource) = tile.resource.as_mut() else { continue };
        if resource.kind == ResourceKind::Plant {
            tile.resource = None;
            resources_changed += 1;
        } else if rng.gen_bool(0.4) {
            let reduction = rng.gen_range(3..=6);
            for _ in 0..reduction {
                if resource.consume_one() {
                    break;
                }
            }
            if resource.uses_left == 0 {
                tile.resource = None;
            }
            resources_changed += 1;
        }
    }

    EventResult {
        kind: "Wildfire".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        casualties,
        resources_changed,
        ..empty_result("Wildfire")
    }
}

fn flood(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut World) -> EventResult {
    let epicenter = random_epicenter(rng, world);
    let radius = 3.0f32;
    let sev = Severity::Moderate.multiplier();
    let tiles = affected_tiles(world, epicenter, radius);

    let mut casualties = Vec::new();
    let mut affected = Vec::new();
    for &id in &occupants_in(world, &tiles) {
        let Some(animal) = population.get_mut(id) else { continue };
        animal.take_damage(rng.gen_range(15.0..=30.0) * sev);
        animal.spend_energy(rng.gen_range(25.0..=40.0));
        affected.push(id);
        if animal.vitals.health <= 0.0 {
            let (x, y) = (animal.x, animal.y);
            animal.kill(DeathCause::Health);
            let _ = world.set_occupant(x, y, None);
            casualties.push(id);
        }
    }

    let mut resources_changed = 0;
    for &(x, y) in &tiles {
        if !rng.gen_bool(0.6) {
            continue;
        }
        let tile = world.tile_at_mut(x, y).unwrap();
        let Some(resource) = tile.resource.as_mut() else { continue };
        let reduction = rng.gen_range(2..=4);
        for _ in 0..reduction {
            if resource.consume_one() {
                break;
            }
        }
        if resource.uses_left == 0 {
            tile.resource = None;
        }
        resources_changed += 1;
    }

    EventResult {
        kind: "Flood".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        casualties,
        resources_changed,
        ..empty_result("Flood")
    }
}

/// Drought has the widest AoE and never destroys resources outright; it
/// thins `uses_left` by a severity-scaled fraction, then tops back up to
/// the post-drought floor `max(ceil(0.15*W*H), floor(current*0.5))` by
/// restoring the least-depleted affected resources first.
fn drought(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut World) -> EventResult {
    let epicenter = random_epicenter(rng, world);
    let radius = 6.0f32;
    let sev = Severity::Major.multiplier();
    let tiles = affected_tiles(world, epicenter, radius);

    let mut affected = Vec::new();
    for &id in &occupants_in(world, &tiles) {
        let Some(animal) = population.get_mut(id) else { continue };
        animal.vitals.decay_thirst(rng.gen_range(10.0..=20.0) * sev);
        if animal.vitals.thirst < 30.0 {
            animal.take_damage(rng.gen_range(5.0..=15.0));
        }
        affected.push(id);
    }

    let total_cells = (world.width * world.height) as f64;
    let floor = ((DROUGHT_FLOOR_DENSITY * total_cells).ceil() as usize)
        .max((world.resource_count() as f64 * 0.5) as usize);

    let mut removed: Vec<(i32, i32)> = Vec::new();
    let mut resources_changed = 0;
    for &(x, y) in &tiles {
        let tile = world.tile_at_mut(x, y).unwrap();
        let Some(resource) = tile.resource.as_mut() else { continue };
        if !matches!(resource.kind, ResourceKind::Water | ResourceKind::Plant) {
            continue;
        }
        let fraction = if resource.kind == ResourceKind::Water { 0.70 } else { 0.50 } * sev as f64;
        let reduction = ((resource.uses_left as f64) * fraction).floor() as u32;
        let mut exhausted = false;
        for _ in 0..reduction {
            if resource.consume_one() {
                exhausted = true;
                break;
            }
        }
        if exhausted {
            tile.resource = None;
            removed.push((x, y));
        }
        resources_changed += 1;
    }

    while world.resource_count() < floor {
        let Some((x, y)) = removed.pop() else { break };
        world.tile_at_mut(x, y).unwrap().resource =
            Some(crate::grid::Resource::new(ResourceKind::Water, 0.0, 1));
    }

    EventResult {
        kind: "Drought".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        resources_changed,
        ..empty_result("Drought")
    }
}

fn toxic_spill(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut World) -> EventResult {
    let epicenter = random_epicenter(rng, world);
    let radius = 2.0f32;
    let sev = Severity::Catastrophic.multiplier();
    let tiles = affected_tiles(world, epicenter, radius);

    let mut casualties = Vec::new();
    let mut affected = Vec::new();
    for &id in &occupants_in(world, &tiles) {
        let Some(animal) = population.get_mut(id) else { continue };
        animal.take_damage(rng.gen_range(30.0..=50.0) * sev);
        animal.spend_energy(rng.gen_range(35.0..=50.0));
        affected.push(id);
        if animal.vitals.health <= 0.0 {
            let (x, y) = (animal.x, animal.y);
            animal.kill(DeathCause::Health);
            let _ = world.set_occupant(x, y, None);
            casualties.push(id);
        }
    }

    let mut resources_changed = 0;
    for &(x, y) in &tiles {
        let tile = world.tile_at_mut(x, y).unwrap();
        if tile.resource.take().is_some() {
            resources_changed += 1;
        }
    }

    EventResult {
        kind: "ToxicSpill".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        casualties,
        resources_changed,
        ..empty_result("ToxicSpill")
    }
}

/// Non-AoE: infects a severity-scaled share of the whole living population.
fn plague(rng: &mut dyn rand::RngCore, population: &mut Population, _world: &mut World) -> EventResult {
    let sev = Severity::Catastrophic.multiplier();
    let living_ids = population.living_ids();
    if living_ids.is_empty() {
        return empty_result("Plague");
    }
    let rate = (rng.gen_range(0.5..=0.8) * sev as f64).clamp(0.0, 1.0);
    let count = ((living_ids.len() as f64 * rate) as usize).clamp(1, living_ids.len());

    let mut pool = living_ids;
    let mut infected = Vec::with_capacity(count);
    for _ in 0..count {
        let idx = rng.gen_range(0..pool.len());
        infected.push(pool.swap_remove(idx));
    }

    let mut casualties = Vec::new();
    for &id in &infected {
        let Some(animal) = population.get_mut(id) else { continue };
        animal.take_damage(rng.gen_range(40.0..=70.0) * sev);
        animal.spend_energy(rng.gen_range(30.0..=50.0));
        if animal.vitals.health <= 0.0 {
            animal.kill(DeathCause::Health);
            casualties.push(id);
        }
    }

    EventResult {
        kind: "Plague".into(),
        effects_applied: infected.len(),
        affected_agents: infected,
        casualties,
        ..empty_result("Plague")
    }
}

fn predator_invasion(rng: &mut dyn rand::RngCore, population: &mut Population, world: &mut World) -> EventResult {
    let epicenter = random_epicenter(rng, world);
    let radius = 3.0f32;
    let sev = Severity::Moderate.multiplier();
    let tiles = affected_tiles(world, epicenter, radius);

    let mut casualties = Vec::new();
    let mut affected = Vec::new();
    for &id in &occupants_in(world, &tiles) {
        let Some(animal) = population.get_mut(id) else { continue };
        let mut attack_chance = 0.4 * sev;
        if animal.traits.strength > 70 {
            attack_chance *= 0.6;
        } else if animal.traits.strength < 40 {
            attack_chance *= 1.4;
        }
        if !rng.gen_bool(attack_chance.clamp(0.0, 1.0) as f64) {
            continue;
        }
        animal.take_damage(rng.gen_range(20.0..=40.0) * sev);
        animal.spend_energy(rng.gen_range(15.0..=30.0));
        affected.push(id);
        if animal.vitals.health <= 0.0 {
            let (x, y) = (animal.x, animal.y);
            animal.kill(DeathCause::Health);
            let _ = world.set_occupant(x, y, None);
            casualties.push(id);
        }
    }

    EventResult {
        kind: "PredatorInvasion".into(),
        effects_applied: affected.len(),
        affected_agents: affected,
        casualties,
        ..empty_result("PredatorInvasion")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_population_modifier_shrinks_probability() {
        let base = 0.1;
        let p = modified_probability(base, 2, 1);
        assert!(p < base);
    }

    #[test]
    fn high_population_and_late_week_compound() {
        let base = 0.1;
        let p = modified_probability(base, 20, 11);
        assert!((p - 0.1 * 1.5 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn catalog_has_seven_disasters() {
        assert_eq!(catalog().len(), 7);
    }
}
