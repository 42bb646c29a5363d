//! The event & disaster scheduler: three independently-scheduled classes
//! (Triggered, Random, Disaster) executed in that order at the end of
//! every week. Grounded on the reference event engine's cooldown/cap/
//! probability-modifier scheduling (`event_engine/event_scheduler.py`),
//! expressed as plain enums and functions per the re-architecture note on
//! avoiding virtual-call hierarchies, the same way `action::resolver`
//! replaces a producer/consumer event-bus plugin.

pub mod disaster;
pub mod random_event;
pub mod triggered;

use std::collections::HashMap;

use rand::{Rng, RngCore};

use crate::config::EventConfig;
use crate::grid::World;
use crate::population::Population;
use crate::prng::{Phase, SeedStreams};
use crate::report::EventResult;

/// Shape shared by every event's executor, across all three classes.
pub(crate) type EventFn = fn(&mut dyn RngCore, &mut Population, &mut World) -> EventResult;

/// Which of the three independently-capped classes an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    Triggered,
    Random,
    Disaster,
}

/// Per-event cooldown/occurrence bookkeeping, keyed by the event's stable
/// name (also [`EventResult::kind`]).
#[derive(Debug, Clone, Default)]
struct EventHistory {
    last_week: Option<u32>,
    occurrence_count: u32,
}

impl EventHistory {
    fn is_ready(&self, week: u32, cooldown: u32, max_occurrences: u32) -> bool {
        if self.occurrence_count >= max_occurrences {
            return false;
        }
        match self.last_week {
            Some(last) => week.saturating_sub(last) >= cooldown,
            None => true,
        }
    }

    fn record(&mut self, week: u32) {
        self.last_week = Some(week);
        self.occurrence_count += 1;
    }
}

/// Owns cooldown/occurrence history across weeks; the driver holds one
/// instance for the lifetime of a generation.
#[derive(Debug, Clone, Default)]
pub struct EventEngine {
    history: HashMap<&'static str, EventHistory>,
}

impl EventEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn ready(&self, name: &'static str, week: u32, cooldown: u32, max_occurrences: u32) -> bool {
        self.history
            .get(name)
            .map(|h| h.is_ready(week, cooldown, max_occurrences))
            .unwrap_or(true)
    }

    fn record(&mut self, name: &'static str, week: u32) {
        self.history.entry(name).or_default().record(week);
    }

    /// Run the Triggered, then Random, then Disaster classes for this
    /// week, respecting per-class caps, per-event cooldowns and the
    /// week-1/week<=3 disaster bans.
    pub fn run_week(
        &mut self,
        seeds: &SeedStreams,
        generation: u32,
        week: u32,
        population: &mut Population,
        world: &mut World,
        config: &EventConfig,
    ) -> Vec<EventResult> {
        let mut results = Vec::new();

        if config.triggered_enabled {
            let mut rng = seeds.stream(generation, week, Phase::EventTriggered);
            results.extend(self.run_triggered(&mut rng, week, population, world, config));
        }
        if config.random_enabled {
            let mut rng = seeds.stream(generation, week, Phase::EventRandom);
            results.extend(self.run_random(&mut rng, week, population, world, config));
        }
        if config.disaster_enabled && week > 1 {
            let mut rng = seeds.stream(generation, week, Phase::EventDisaster);
            results.extend(self.run_disaster(&mut rng, week, population, world, config));
        }

        results
    }

    fn run_triggered(
        &mut self,
        rng: &mut impl Rng,
        week: u32,
        population: &mut Population,
        world: &mut World,
        config: &EventConfig,
    ) -> Vec<EventResult> {
        let mut fired = Vec::new();
        for candidate in triggered::candidates(population, world) {
            if fired.len() as u32 >= config.triggered_cap {
                break;
            }
            if !self.ready(candidate.name, week, candidate.cooldown, candidate.max_occurrences) {
                continue;
            }
            if !rng.gen_bool(candidate.probability) {
                continue;
            }
            self.record(candidate.name, week);
            fired.push((candidate.execute)(rng, population, world));
        }
        fired
    }

    fn run_random(
        &mut self,
        rng: &mut impl Rng,
        week: u32,
        population: &mut Population,
        world: &mut World,
        config: &EventConfig,
    ) -> Vec<EventResult> {
        let mut order = random_event::catalog();
        // Shuffle so no single event always wins a tie for the weekly cap.
        for i in (1..order.len()).rev() {
            let j = rng.gen_range(0..=i);
            order.swap(i, j);
        }

        let living = population.living_count();
        let mut fired = Vec::new();
        for candidate in order {
            if fired.len() as u32 >= config.random_cap {
                break;
            }
            if !self.ready(candidate.name, week, candidate.cooldown, candidate.max_occurrences) {
                continue;
            }
            let probability = candidate.modified_probability(living, week);
            if !rng.gen_bool(probability) {
                continue;
            }
            self.record(candidate.name, week);
            fired.push((candidate.execute)(rng, population, world));
        }
        fired
    }

    fn run_disaster(
        &mut self,
        rng: &mut impl Rng,
        week: u32,
        population: &mut Population,
        world: &mut World,
        config: &EventConfig,
    ) -> Vec<EventResult> {
        let living = population.living_count();
        let max_this_week = if week <= 3 { 1 } else { config.disaster_cap };

        let mut fired = Vec::new();
        for candidate in disaster::catalog() {
            if fired.len() as u32 >= max_this_week {
                break;
            }
            if !self.ready(candidate.name, week, candidate.cooldown, candidate.max_occurrences) {
                continue;
            }
            let probability = disaster::modified_probability(candidate.base_probability, living, week);
            if !rng.gen_bool(probability) {
                continue;
            }
            self.record(candidate.name, week);
            fired.push((candidate.execute)(rng, population, world));
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Category, Traits};

    #[test]
    fn week_one_never_fires_a_disaster() {
        let mut engine = EventEngine::new();
        let mut population = Population::new();
        population.spawn(Category::Herbivore, Traits::new(50, 50, 50, 50, 50), 0, 0, None);
        let mut world = World::new(10, 10);
        let seeds = SeedStreams::new(1);
        let mut config = EventConfig::default();
        config.triggered_enabled = false;
        config.random_enabled = false;

        let results = engine.run_week(&seeds, 0, 1, &mut population, &mut world, &config);
        assert!(results.is_empty());
    }

    #[test]
    fn event_history_respects_cooldown() {
        let mut history = EventHistory::default();
        history.record(2);
        assert!(!history.is_ready(3, 5, 10));
        assert!(history.is_ready(7, 5, 10));
    }

    #[test]
    fn event_history_respects_max_occurrences() {
        let mut history = EventHistory::default();
        history.record(1);
        assert!(!history.is_ready(100, 0, 1));
    }
}
