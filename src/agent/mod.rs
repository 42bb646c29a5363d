//! The agent state machine.

pub mod effect;
pub mod fitness;
pub mod traits;
pub mod vitals;

pub use effect::{ActiveEffect, EffectKind};
pub use fitness::FitnessAccumulators;
pub use traits::Traits;
pub use vitals::Vitals;

use serde::{Deserialize, Serialize};

use crate::grid::ResourceKind;
use crate::ids::AgentId;
use crate::network::DecisionNetwork;
use crate::sensing;

/// Determines edibility and vision radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Herbivore,
    Carnivore,
    Omnivore,
}

impl Category {
    /// How far the sensory encoder searches along each direction.
    pub fn vision_radius(self) -> i32 {
        match self {
            Category::Herbivore => 1,
            Category::Omnivore => 2,
            Category::Carnivore => 3,
        }
    }

    /// Whether this category gains Hunger from eating a resource of `kind`.
    pub fn can_eat(self, kind: ResourceKind) -> bool {
        match self {
            Category::Herbivore => matches!(kind, ResourceKind::Plant),
            Category::Carnivore => matches!(kind, ResourceKind::Prey | ResourceKind::Carcass),
            Category::Omnivore => matches!(
                kind,
                ResourceKind::Plant | ResourceKind::Prey | ResourceKind::Carcass
            ),
        }
    }
}

/// Tracks how many consecutive weeks a death-condition precursor has held,
/// so the condition can be checked against its required duration and reset
/// the moment it lifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathConditionCounters {
    pub starvation_weeks: u32,
    pub exhaustion_weeks: u32,
}

/// Why an agent died, recorded on the week's casualty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Health,
    Starvation,
    Dehydration,
    Exhaustion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: AgentId,
    pub category: Category,
    pub traits: Traits,
    pub vitals: Vitals,
    pub x: i32,
    pub y: i32,
    pub active_effects: Vec<ActiveEffect>,
    pub policy: Option<DecisionNetwork>,
    pub fitness: FitnessAccumulators,
    pub alive: bool,
    pub death_counters: DeathConditionCounters,
    pub cause_of_death: Option<DeathCause>,
}

impl Animal {
    pub fn new(
        id: AgentId,
        category: Category,
        traits: Traits,
        x: i32,
        y: i32,
        policy: Option<DecisionNetwork>,
    ) -> Self {
        let vitals = Vitals::new_full(traits.max_health(), traits.max_energy(), Some(0.5));
        Self {
            id,
            category,
            traits,
            vitals,
            x,
            y,
            active_effects: Vec::new(),
            policy,
            fitness: FitnessAccumulators::default(),
            alive: true,
            death_counters: DeathConditionCounters::default(),
            cause_of_death: None,
        }
    }

    pub fn max_health(&self) -> f32 {
        self.traits.max_health()
    }

    pub fn max_energy(&self) -> f32 {
        self.traits.max_energy()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Kill this agent and record the cause. Death is monotonic: once
    /// `alive` is false, calling this again is a no-op so the cause of the
    /// first death always sticks.
    pub fn kill(&mut self, cause: DeathCause) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.cause_of_death = Some(cause);
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.active_effects.iter().any(|e| e.kind == kind)
    }

    pub fn add_effect(&mut self, kind: EffectKind, duration: u32) {
        if !self.has_effect(kind) {
            self.active_effects.push(ActiveEffect::new(kind, duration));
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.vitals.take_damage(amount, self.max_health());
    }

    pub fn heal(&mut self, amount: f32) {
        self.vitals.heal(amount, self.max_health());
    }

    pub fn gain_energy(&mut self, amount: f32) {
        self.vitals.gain_energy(amount, self.max_energy());
    }

    pub fn spend_energy(&mut self, amount: f32) {
        self.vitals.spend_energy(amount, self.max_energy());
    }

    pub fn fitness_value(&self) -> f32 {
        self.fitness
            .fitness(self.vitals.hunger, self.vitals.thirst, self.vitals.energy)
    }

    /// Build the fixed-length sensory input vector for this agent's
    /// current position in `world`.
    pub fn sense(&self, world: &crate::grid::World) -> Vec<f32> {
        sensing::encode(self, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Animal {
        Animal::new(
            AgentId(0),
            Category::Herbivore,
            Traits::new(50, 50, 50, 50, 50),
            1,
            1,
            None,
        )
    }

    #[test]
    fn death_is_monotonic() {
        let mut a = sample();
        a.kill(DeathCause::Health);
        assert!(!a.is_alive());
        a.kill(DeathCause::Starvation);
        // cause of the *first* death sticks.
        assert_eq!(a.cause_of_death, Some(DeathCause::Health));
    }

    #[test]
    fn category_edibility_rules() {
        assert!(Category::Herbivore.can_eat(ResourceKind::Plant));
        assert!(!Category::Herbivore.can_eat(ResourceKind::Prey));
        assert!(!Category::Herbivore.can_eat(ResourceKind::Carcass));
        assert!(!Category::Carnivore.can_eat(ResourceKind::Plant));
        assert!(Category::Carnivore.can_eat(ResourceKind::Prey));
        assert!(Category::Omnivore.can_eat(ResourceKind::Plant));
        assert!(Category::Omnivore.can_eat(ResourceKind::Prey));
    }

    #[test]
    fn add_effect_does_not_duplicate() {
        let mut a = sample();
        a.add_effect(EffectKind::WellFed, 3);
        a.add_effect(EffectKind::WellFed, 3);
        assert_eq!(a.active_effects.len(), 1);
    }
}
