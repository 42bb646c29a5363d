//! Real-valued vitals, clamped to `[0, cap]`.
//!
//! Generalizes the `Stat` wrapper pattern in `src/entities/stats.rs`:
//! current value plus bounds, with a `tick`/`change` interface. This
//! engine's Health/Energy caps are per-agent (derived from END), so `Vitals` takes
//! its caps explicitly rather than hard-coding them like that wrapper's
//! fixed-max `Stat::new_full`.

use serde::{Deserialize, Serialize};

use crate::constants::HUNGER_THIRST_CAP;

/// Health, Hunger, Thirst, Energy and optional Instinct.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub energy: f32,
    /// In `[0, 1]` when present.
    pub instinct: Option<f32>,
}

impl Vitals {
    /// A freshly spawned agent: full health, energy, hunger and thirst.
    /// Hunger/Thirst are satiation levels that start at the cap and decay
    /// each week, not deficits that start at zero.
    pub fn new_full(max_health: f32, max_energy: f32, instinct: Option<f32>) -> Self {
        Self {
            health: max_health,
            hunger: HUNGER_THIRST_CAP,
            thirst: HUNGER_THIRST_CAP,
            energy: max_energy,
            instinct: instinct.map(|v| v.clamp(0.0, 1.0)),
        }
    }

    pub fn take_damage(&mut self, amount: f32, max_health: f32) {
        self.health = (self.health - amount).clamp(0.0, max_health);
    }

    pub fn heal(&mut self, amount: f32, max_health: f32) {
        self.health = (self.health + amount).clamp(0.0, max_health);
    }

    pub fn gain_energy(&mut self, amount: f32, max_energy: f32) {
        self.energy = (self.energy + amount).clamp(0.0, max_energy);
    }

    pub fn spend_energy(&mut self, amount: f32, max_energy: f32) {
        self.energy = (self.energy - amount).clamp(0.0, max_energy);
    }

    pub fn gain_hunger(&mut self, amount: f32) {
        self.hunger = (self.hunger + amount).clamp(0.0, 100.0);
    }

    pub fn gain_thirst(&mut self, amount: f32) {
        self.thirst = (self.thirst + amount).clamp(0.0, 100.0);
    }

    pub fn decay_hunger(&mut self, amount: f32) {
        self.hunger = (self.hunger - amount).clamp(0.0, 100.0);
    }

    pub fn decay_thirst(&mut self, amount: f32) {
        self.thirst = (self.thirst - amount).clamp(0.0, 100.0);
    }

    pub fn has_enough_energy(&self, cost: f32) -> bool {
        self.energy >= cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_and_heal_clamp_to_cap() {
        let mut v = Vitals::new_full(100.0, 100.0, None);
        v.take_damage(1000.0, 100.0);
        assert_eq!(v.health, 0.0);
        v.heal(1000.0, 100.0);
        assert_eq!(v.health, 100.0);
    }

    #[test]
    fn hunger_thirst_clamp_to_hundred() {
        let mut v = Vitals::new_full(100.0, 100.0, None);
        v.gain_hunger(1000.0);
        assert_eq!(v.hunger, 100.0);
        v.decay_hunger(1000.0);
        assert_eq!(v.hunger, 0.0);
    }
}
