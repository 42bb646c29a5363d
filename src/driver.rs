//! The simulation driver: owns the world, population and event history,
//! and exposes the control-verb state machine external callers step
//! through. Generalizes the `SimulationState`/`SimulationSpeed` pause/
//! resume pair (`src/simulation/tick.rs`) from a frame-driven Bevy
//! resource into a plain state machine an external caller steps
//! synchronously, one week at a time, with no hidden scheduling.

use std::collections::HashMap;

use rand::Rng;

use crate::agent::{Category, Traits};
use crate::config::EngineConfig;
use crate::error::{EvosimError, Result};
use crate::evolution;
use crate::grid::{generation, Occupant, Terrain, World};
use crate::population::Population;
use crate::prng::{Phase, SeedStreams};
use crate::report::{GenerationReport, WeekReport};

/// Lifecycle state. Transitions outside the ones `SimulationDriver`'s
/// methods perform fail with [`EvosimError::InvalidState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
    Paused,
    Evolving,
    Finished,
}

/// Owns everything a run needs and exposes `initialize`/`start`/`pause`/
/// `resume`/`stop`/`reset` plus the per-week `step`/`evolve` advance.
pub struct SimulationDriver {
    state: DriverState,
    config: EngineConfig,
    seeds: SeedStreams,
    world: World,
    population: Population,
    event_engine: crate::events::EventEngine,
    generation: u32,
    week: u32,
    history: Vec<GenerationReport>,
}

impl SimulationDriver {
    pub fn new(config: EngineConfig) -> Self {
        let seeds = SeedStreams::new(config.seed);
        let world = World::new(config.grid_width as i32, config.grid_height as i32);
        Self {
            state: DriverState::Stopped,
            seeds,
            world,
            population: Population::new(),
            event_engine: crate::events::EventEngine::new(),
            generation: 0,
            week: 0,
            history: Vec::new(),
            config,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn history(&self) -> &[GenerationReport] {
        &self.history
    }

    /// Build generation 0's terrain, resources and population. Valid only
    /// from `Stopped`, and idempotent only in the sense that calling it
    /// again replaces the prior world and population outright.
    pub fn initialize(&mut self) -> Result<()> {
        self.require_state(DriverState::Stopped, "initialize")?;

        let mut terrain_rng = self.seeds.stream(0, 0, Phase::WorldGeneration);
        let distribution = terrain_weights(&self.config);
        self.world = World::new(self.config.grid_width as i32, self.config.grid_height as i32);
        generation::generate_terrain(&mut self.world, &distribution, self.config.mountain_border, &mut terrain_rng);
        generation::place_resources(&mut self.world, self.config.food_density, self.config.water_density, &mut terrain_rng);

        self.population = Population::new();
        self.generation = 0;
        self.week = 0;
        self.history.clear();

        let categories = category_sequence(&self.config);
        let mut spawn_rng = self.seeds.stream(0, 0, Phase::Evolution);
        for category in categories {
            let traits = random_initial_traits(&mut spawn_rng);
            let policy = crate::network::DecisionNetwork::new_random(crate::constants::INPUT_LEN, 8, &mut spawn_rng);
            let id = self.population.spawn(category, traits, 0, 0, Some(policy));
            if let Some((x, y)) = pick_spawn_tile(&self.world, &mut spawn_rng) {
                self.population.get_mut(id).unwrap().x = x;
                self.population.get_mut(id).unwrap().y = y;
                let _ = self.world.set_occupant(x, y, Some(Occupant { id, category }));
            }
        }

        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.require_state(DriverState::Stopped, "start")?;
        self.state = DriverState::Running;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.require_state(DriverState::Running, "pause")?;
        self.state = DriverState::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.require_state(DriverState::Paused, "resume")?;
        self.state = DriverState::Running;
        Ok(())
    }

    /// Transition to `Stopped` from `Running` or `Paused`. Evolution runs
    /// synchronously within `evolve`, so there is no mid-evolution state
    /// for a stop request to preempt.
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            DriverState::Running | DriverState::Paused => {
                self.state = DriverState::Stopped;
                Ok(())
            }
            other => Err(EvosimError::invalid_state(format!("stop is invalid from {other:?}"))),
        }
    }

    /// Return to `Stopped` from `Finished`, clearing history. Does not
    /// rebuild the world; call `initialize` again to start a fresh run.
    pub fn reset(&mut self) -> Result<()> {
        self.require_state(DriverState::Finished, "reset")?;
        self.state = DriverState::Stopped;
        self.history.clear();
        self.generation = 0;
        self.week = 0;
        Ok(())
    }

    /// Resolve one week: the action resolver's four phases, then the
    /// event engine. Transitions to `Evolving` when the living set is
    /// empty or `steps_per_generation` weeks have elapsed.
    pub fn step(&mut self) -> Result<WeekReport> {
        self.require_state(DriverState::Running, "step")?;

        let mut report = crate::action::resolver::run_week(
            &self.seeds,
            self.generation,
            self.week,
            &mut self.population,
            &mut self.world,
        );
        report.events = self.event_engine.run_week(
            &self.seeds,
            self.generation,
            self.week,
            &mut self.population,
            &mut self.world,
            &self.config.events,
        );

        self.week += 1;

        if self.population.living_count() == 0 || self.week >= self.config.steps_per_generation {
            self.state = DriverState::Evolving;
        }

        Ok(report)
    }

    /// Run the evolution engine at a generation boundary: select, breed,
    /// rebuild the population, re-seed resources and place every new
    /// agent. Transitions to `Finished` at `max_generations` or permanent
    /// extinction, otherwise back to `Running`.
    pub fn evolve(&mut self) -> Result<GenerationReport> {
        self.require_state(DriverState::Evolving, "evolve")?;

        let report = evolution::evolve(&self.config, &mut self.population, &self.seeds, self.generation);
        self.history.push(report.clone());

        self.generation += 1;
        self.week = 0;
        self.respawn_world_and_agents();

        let extinct = self.population.is_empty();
        self.state = if self.generation >= self.config.max_generations || extinct {
            DriverState::Finished
        } else {
            DriverState::Running
        };

        Ok(report)
    }

    fn respawn_world_and_agents(&mut self) {
        for tile in self.world.tiles_mut() {
            tile.resource = None;
            tile.occupant = None;
        }
        let mut rng = self.seeds.stream(self.generation, 0, Phase::WorldGeneration);
        generation::place_resources(&mut self.world, self.config.food_density, self.config.water_density, &mut rng);

        let ids = self.population.living_ids();
        for id in ids {
            let category = self.population.category_of(id).expect("id just listed as living");
            let Some((x, y)) = pick_spawn_tile(&self.world, &mut rng) else { continue };
            if self.world.set_occupant(x, y, Some(Occupant { id, category })).is_ok() {
                if let Some(animal) = self.population.get_mut(id) {
                    animal.x = x;
                    animal.y = y;
                }
            }
        }
    }

    fn require_state(&self, expected: DriverState, verb: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EvosimError::invalid_state(format!("{verb} requires {expected:?}, was {:?}", self.state)))
        }
    }
}

fn terrain_weights(config: &EngineConfig) -> HashMap<Terrain, f32> {
    let d = config.terrain_distribution;
    HashMap::from([
        (Terrain::Plains, d.plains),
        (Terrain::Forest, d.forest),
        (Terrain::Jungle, d.jungle),
        (Terrain::Swamp, d.swamp),
        (Terrain::Water, d.water),
        (Terrain::Mountains, d.mountains),
    ])
}

/// Expand `category_ratio` into one `Category` per spawn slot, herbivores
/// first, sized to `population_size`.
fn category_sequence(config: &EngineConfig) -> Vec<Category> {
    let ratio = config.category_ratio;
    let total = (ratio.herbivore + ratio.carnivore + ratio.omnivore).max(1);
    let size = config.population_size;

    let herbivore_count = (size * ratio.herbivore / total) as usize;
    let carnivore_count = (size * ratio.carnivore / total) as usize;
    let mut out = Vec::with_capacity(size as usize);
    out.extend(std::iter::repeat(Category::Herbivore).take(herbivore_count));
    out.extend(std::iter::repeat(Category::Carnivore).take(carnivore_count));
    while out.len() < size as usize {
        out.push(Category::Omnivore);
    }
    out
}

/// Every stat uniform in `[30, 70]`: a moderate, unbiased starting spread
/// for generation 0 (later generations inherit traits from their parents).
fn random_initial_traits(rng: &mut impl Rng) -> Traits {
    Traits::new(
        rng.gen_range(30..=70),
        rng.gen_range(30..=70),
        rng.gen_range(30..=70),
        rng.gen_range(30..=70),
        rng.gen_range(30..=70),
    )
}

/// A random unoccupied, non-Mountain tile, preferring Plains.
fn pick_spawn_tile(world: &World, rng: &mut impl Rng) -> Option<(i32, i32)> {
    let plains: Vec<(i32, i32)> = world
        .tiles()
        .iter()
        .filter(|t| t.terrain == Terrain::Plains && t.occupant.is_none())
        .map(|t| (t.x, t.y))
        .collect();
    if !plains.is_empty() {
        return Some(plains[rng.gen_range(0..plains.len())]);
    }

    let any: Vec<(i32, i32)> = world
        .tiles()
        .iter()
        .filter(|t| t.is_passable() && t.occupant.is_none())
        .map(|t| (t.x, t.y))
        .collect();
    if any.is_empty() {
        None
    } else {
        Some(any[rng.gen_range(0..any.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EngineConfig {
        EngineConfig {
            grid_width: 10,
            grid_height: 10,
            population_size: 6,
            max_generations: 2,
            steps_per_generation: 3,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn initialize_then_start_populates_and_runs() {
        let mut driver = SimulationDriver::new(small_config());
        driver.initialize().unwrap();
        assert_eq!(driver.population().len(), 6);
        driver.start().unwrap();
        assert_eq!(driver.state(), DriverState::Running);
    }

    #[test]
    fn step_before_start_is_invalid_state() {
        let mut driver = SimulationDriver::new(small_config());
        driver.initialize().unwrap();
        assert!(driver.step().is_err());
    }

    #[test]
    fn generation_boundary_reached_after_configured_weeks() {
        let mut driver = SimulationDriver::new(small_config());
        driver.initialize().unwrap();
        driver.start().unwrap();
        for _ in 0..3 {
            driver.step().unwrap();
        }
        assert_eq!(driver.state(), DriverState::Evolving);
        let report = driver.evolve().unwrap();
        assert_eq!(report.generation, 0);
        assert_eq!(driver.generation(), 1);
        assert_eq!(driver.state(), DriverState::Running);
    }

    #[test]
    fn pause_resume_roundtrip() {
        let mut driver = SimulationDriver::new(small_config());
        driver.initialize().unwrap();
        driver.start().unwrap();
        driver.pause().unwrap();
        assert_eq!(driver.state(), DriverState::Paused);
        driver.resume().unwrap();
        assert_eq!(driver.state(), DriverState::Running);
    }

    #[test]
    fn finishes_at_max_generations() {
        let mut driver = SimulationDriver::new(small_config());
        driver.initialize().unwrap();
        driver.start().unwrap();
        for _ in 0..2 {
            for _ in 0..3 {
                driver.step().unwrap();
            }
            driver.evolve().unwrap();
        }
        assert_eq!(driver.state(), DriverState::Finished);
    }
}
