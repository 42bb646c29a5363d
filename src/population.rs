//! The population arena: owns every agent (living and dead-pool) keyed by
//! stable id. Generalizes the entity registry pattern
//! (`src/entities/registry.rs`, `src/entities/entity_tracker.rs`) which
//! keys Bevy entities by a tracked id map; here the arena *is* the
//! authoritative store since there is no ECS world to shadow.

use std::collections::BTreeMap;

use crate::agent::{Animal, Category, Traits};
use crate::ids::{AgentId, AgentIdAllocator};
use crate::network::DecisionNetwork;

#[derive(Debug, Clone, Default)]
pub struct Population {
    allocator: AgentIdAllocator,
    agents: BTreeMap<AgentId, Animal>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new agent and return its freshly minted id.
    pub fn spawn(
        &mut self,
        category: Category,
        traits: Traits,
        x: i32,
        y: i32,
        policy: Option<DecisionNetwork>,
    ) -> AgentId {
        let id = self.allocator.next_id();
        let animal = Animal::new(id, category, traits, x, y, policy);
        self.agents.insert(id, animal);
        id
    }

    pub fn get(&self, id: AgentId) -> Option<&Animal> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Animal> {
        self.agents.get_mut(&id)
    }

    pub fn category_of(&self, id: AgentId) -> Option<Category> {
        self.agents.get(&id).map(|a| a.category)
    }

    /// All ids, ascending — the resolver's fairness guarantee depends on
    /// this order being stable and independent of any hash iteration.
    pub fn living_ids(&self) -> Vec<AgentId> {
        self.agents
            .values()
            .filter(|a| a.is_alive())
            .map(|a| a.id)
            .collect()
    }

    pub fn living_count(&self) -> usize {
        self.agents.values().filter(|a| a.is_alive()).count()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animal> {
        self.agents.values()
    }

    pub fn iter_living(&self) -> impl Iterator<Item = &Animal> {
        self.agents.values().filter(|a| a.is_alive())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Animal> {
        self.agents.values_mut()
    }

    /// Drop everyone, keeping the id allocator running so a freshly
    /// rebuilt generation never reuses an id from a prior one.
    pub fn clear(&mut self) {
        self.agents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused_after_clear() {
        let mut pop = Population::new();
        let a = pop.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        pop.clear();
        let b = pop.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        assert_ne!(a, b);
    }

    #[test]
    fn living_ids_exclude_dead() {
        let mut pop = Population::new();
        let a = pop.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        let b = pop.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        pop.get_mut(a).unwrap().kill(crate::agent::DeathCause::Health);
        let living = pop.living_ids();
        assert_eq!(living, vec![b]);
    }
}
