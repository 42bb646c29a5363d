//! Status & Environmental Phase: passive Hunger/Thirst decay, active-effect
//! damage, energy regeneration, and death-condition evaluation — applied
//! uniformly to every living agent against the pre-phase snapshot.

use crate::agent::{Animal, DeathCause, EffectKind};
use crate::constants::{
    ENERGY_REGEN_HEALTH_THRESHOLD, ENERGY_REGEN_HIGH_HEALTH, ENERGY_REGEN_LOW_HEALTH,
    EXHAUSTION_WEEKS, HUNGER_DECAY, INJURED_DAMAGE, POISONED_DAMAGE, STARVATION_WEEKS,
    THIRST_DECAY,
};
use crate::grid::World;
use crate::population::Population;
use crate::report::Casualty;

/// Apply passive decay/damage/regen to every living agent and record deaths.
/// Dying agents have their tile occupancy cleared so the grid's occupancy
/// invariant holds at the phase boundary.
pub fn apply(population: &mut Population, world: &mut World, casualties: &mut Vec<Casualty>) {
    let dying: Vec<(crate::ids::AgentId, DeathCause, i32, i32)> = {
        let mut dying = Vec::new();
        for animal in population.iter_mut().filter(|a| a.is_alive()) {
            apply_to_one(animal);
            if let Some(cause) = evaluate_death(animal) {
                animal.kill(cause);
                dying.push((animal.id, cause, animal.x, animal.y));
            }
        }
        dying
    };

    for (id, cause, x, y) in dying {
        let _ = world.set_occupant(x, y, None);
        casualties.push(Casualty { agent_id: id, cause });
    }
}

fn apply_to_one(animal: &mut Animal) {
    animal.vitals.decay_hunger(HUNGER_DECAY);
    animal.vitals.decay_thirst(THIRST_DECAY);

    if animal.has_effect(EffectKind::Poisoned) {
        animal.take_damage(POISONED_DAMAGE);
    }
    if animal.has_effect(EffectKind::Injured) {
        animal.take_damage(INJURED_DAMAGE);
    }

    if animal.vitals.energy < animal.max_energy() {
        let regen = if animal.vitals.health > ENERGY_REGEN_HEALTH_THRESHOLD {
            ENERGY_REGEN_HIGH_HEALTH
        } else {
            ENERGY_REGEN_LOW_HEALTH
        };
        animal.gain_energy(regen);
    }

    animal.fitness.time_alive += 1;
}

/// Checks Health/starvation/exhaustion conditions, updating the agent's
/// consecutive-week counters. Counters reset the moment a condition lifts.
fn evaluate_death(animal: &mut Animal) -> Option<DeathCause> {
    if animal.vitals.health <= 0.0 {
        return Some(DeathCause::Health);
    }

    if animal.vitals.hunger == 0.0 && animal.vitals.thirst == 0.0 {
        animal.death_counters.starvation_weeks += 1;
    } else {
        animal.death_counters.starvation_weeks = 0;
    }
    if animal.death_counters.starvation_weeks >= STARVATION_WEEKS {
        let cause = if animal.vitals.thirst == 0.0 {
            DeathCause::Dehydration
        } else {
            DeathCause::Starvation
        };
        return Some(cause);
    }

    if animal.vitals.energy == 0.0 {
        animal.death_counters.exhaustion_weeks += 1;
    } else {
        animal.death_counters.exhaustion_weeks = 0;
    }
    if animal.death_counters.exhaustion_weeks >= EXHAUSTION_WEEKS {
        return Some(DeathCause::Exhaustion);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Category, Traits};
    use crate::grid::Occupant;
    use crate::ids::AgentId;

    fn sample(x: i32, y: i32) -> Animal {
        Animal::new(AgentId(0), Category::Herbivore, Traits::new(50, 50, 50, 50, 50), x, y, None)
    }

    #[test]
    fn hunger_and_thirst_decay_each_week() {
        let mut population = Population::new();
        population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 1, 1, None);
        let mut world = World::new(3, 3);
        let mut casualties = Vec::new();
        apply(&mut population, &mut world, &mut casualties);
        let animal = population.iter().next().unwrap();
        assert_eq!(animal.vitals.hunger, 100.0 - HUNGER_DECAY);
        assert_eq!(animal.fitness.time_alive, 1);
    }

    #[test]
    fn starvation_kills_after_three_consecutive_weeks() {
        let mut animal = sample(0, 0);
        animal.vitals.hunger = 0.0;
        animal.vitals.thirst = 0.0;
        for week in 0..3 {
            let cause = evaluate_death(&mut animal);
            if week < 2 {
                assert!(cause.is_none());
            } else {
                assert_eq!(cause, Some(DeathCause::Starvation));
            }
        }
    }

    #[test]
    fn death_clears_tile_occupancy() {
        let mut population = Population::new();
        let id = population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 1, 50), 1, 1, None);
        let mut world = World::new(3, 3);
        world
            .set_occupant(1, 1, Some(Occupant { id, category: Category::Herbivore }))
            .unwrap();
        population.get_mut(id).unwrap().vitals.health = 0.0;
        let mut casualties = Vec::new();
        apply(&mut population, &mut world, &mut casualties);
        assert_eq!(casualties.len(), 1);
        assert!(world.tile_at(1, 1).unwrap().occupant.is_none());
    }
}
