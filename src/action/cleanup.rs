//! Cleanup Phase: tick every active effect's remaining duration and
//! conditionally add new ones based on the post-execution vitals snapshot.

use crate::agent::{Animal, EffectKind};
use crate::constants::{
    EXHAUSTED_DURATION, EXHAUSTED_ENERGY_THRESHOLD, WELL_FED_DURATION, WELL_FED_HUNGER_THRESHOLD,
};
use crate::population::Population;

pub fn apply(population: &mut Population) {
    for animal in population.iter_mut().filter(|a| a.is_alive()) {
        apply_to_one(animal);
    }
}

fn apply_to_one(animal: &mut Animal) {
    animal.active_effects.retain_mut(|effect| !effect.tick());

    if animal.vitals.hunger >= WELL_FED_HUNGER_THRESHOLD && !animal.has_effect(EffectKind::WellFed) {
        animal.add_effect(EffectKind::WellFed, WELL_FED_DURATION);
    }
    if animal.vitals.energy <= EXHAUSTED_ENERGY_THRESHOLD && !animal.has_effect(EffectKind::Exhausted) {
        animal.add_effect(EffectKind::Exhausted, EXHAUSTED_DURATION);
    }
}
