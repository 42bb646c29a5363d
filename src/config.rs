//! Typed, `serde`-serializable configuration record, generalizing the
//! `SpawnConfig`/`TilemapConfig` pattern (plain `Default`-implementing
//! structs consumed by a generator, loadable from a RON file with a
//! generated-default fallback rather than parsed from CLI flags).

use serde::{Deserialize, Serialize};

use crate::error::{EvosimError, Result};

/// Relative weight of each terrain kind during world generation. Weights
/// need not be pre-normalized; [`EngineConfig::validate`] checks they sum
/// to 1 within a small tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainDistribution {
    pub plains: f32,
    pub forest: f32,
    pub jungle: f32,
    pub swamp: f32,
    pub water: f32,
    pub mountains: f32,
}

impl Default for TerrainDistribution {
    fn default() -> Self {
        Self {
            plains: 0.40,
            forest: 0.20,
            jungle: 0.12,
            swamp: 0.08,
            water: 0.12,
            mountains: 0.08,
        }
    }
}

impl TerrainDistribution {
    fn sum(&self) -> f32 {
        self.plains + self.forest + self.jungle + self.swamp + self.water + self.mountains
    }
}

/// Ratio of newly spawned agents across the three categories. Values are
/// relative shares, not percentages; `3:1:1` is the documented default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRatio {
    pub herbivore: u32,
    pub carnivore: u32,
    pub omnivore: u32,
}

impl Default for CategoryRatio {
    fn default() -> Self {
        Self { herbivore: 3, carnivore: 1, omnivore: 1 }
    }
}

/// Selection strategy used to pick parents each evolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    Tournament,
    Roulette,
    Rank,
}

impl Default for SelectionMethod {
    fn default() -> Self {
        SelectionMethod::Tournament
    }
}

/// Per-class enable flags and firing parameters for the event engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub triggered_enabled: bool,
    pub random_enabled: bool,
    pub disaster_enabled: bool,
    /// Max triggered events per week.
    pub triggered_cap: u32,
    /// Max random events per week.
    pub random_cap: u32,
    /// Max disaster events per week.
    pub disaster_cap: u32,
    /// Weeks before the same event class may fire again.
    pub default_cooldown: u32,
    /// Lifetime occurrence cap shared by events that don't override it.
    pub default_max_occurrences: u32,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            triggered_enabled: true,
            random_enabled: true,
            disaster_enabled: true,
            triggered_cap: 3,
            random_cap: 2,
            disaster_cap: 1,
            default_cooldown: 3,
            default_max_occurrences: 20,
        }
    }
}

/// Aggregates every tunable named across the World, Population, Simulation,
/// Resources, Events, Evolution and Determinism configuration groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub mountain_border: bool,
    pub terrain_distribution: TerrainDistribution,

    pub population_size: u32,
    pub category_ratio: CategoryRatio,

    pub max_generations: u32,
    pub steps_per_generation: u32,

    pub food_density: f32,
    pub water_density: f32,

    pub events: EventConfig,

    pub mutation_rate: f32,
    pub mutation_strength: f32,
    pub crossover_rate: f32,
    pub selection_method: SelectionMethod,
    pub tournament_size: u32,
    pub elite_percentage: f32,

    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            mountain_border: true,
            terrain_distribution: TerrainDistribution::default(),

            population_size: 50,
            category_ratio: CategoryRatio::default(),

            max_generations: 10,
            steps_per_generation: 100,

            food_density: 0.15,
            water_density: 0.15,

            events: EventConfig::default(),

            mutation_rate: 0.1,
            mutation_strength: 0.1,
            crossover_rate: 0.8,
            selection_method: SelectionMethod::Tournament,
            tournament_size: 3,
            elite_percentage: 0.1,

            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Checks structural invariants that generation and evolution code
    /// assume hold; does not check `f32` values are finite, since `serde`
    /// already rejects NaN/Inf during RON parsing.
    pub fn validate(&self) -> Result<()> {
        let sum = self.terrain_distribution.sum();
        if (sum - 1.0).abs() > 0.001 {
            return Err(EvosimError::invalid_state(format!(
                "terrain_distribution weights sum to {sum}, expected 1.0 (+/- 0.001)"
            )));
        }
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(EvosimError::invalid_state("grid dimensions must be non-zero"));
        }
        if self.population_size == 0 {
            return Err(EvosimError::invalid_state("population_size must be non-zero"));
        }
        if self.tournament_size == 0 {
            return Err(EvosimError::invalid_state("tournament_size must be non-zero"));
        }
        Ok(())
    }

    /// Number of elites carried unchanged into the next generation.
    pub fn elite_count(&self) -> usize {
        ((self.population_size as f32 * self.elite_percentage) as usize).max(1)
    }

    /// Load configuration from a RON file.
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EvosimError::invalid_state(format!("reading {path}: {e}")))?;
        let config: EngineConfig = ron::from_str(&content)
            .map_err(|e| EvosimError::invalid_state(format!("parsing {path}: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, falling back to (and writing) the
    /// default if the file is missing or invalid.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => {
                tracing::info!(path, "loaded engine configuration");
                config
            }
            Err(err) => {
                tracing::warn!(path, %err, "falling back to default engine configuration");
                let default_config = Self::default();
                if let Err(err) = default_config.save_to_file(path) {
                    tracing::warn!(path, %err, "could not write default configuration");
                }
                default_config
            }
        }
    }

    /// Save configuration to a RON file, creating parent directories.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| EvosimError::invalid_state(format!("creating {parent:?}: {e}")))?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| EvosimError::invalid_state(format!("serializing config: {e}")))?;
        std::fs::write(path, content)
            .map_err(|e| EvosimError::invalid_state(format!("writing {path}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn unbalanced_terrain_distribution_is_rejected() {
        let mut config = EngineConfig::default();
        config.terrain_distribution.plains = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn elite_count_is_at_least_one() {
        let mut config = EngineConfig::default();
        config.population_size = 5;
        config.elite_percentage = 0.01;
        assert_eq!(config.elite_count(), 1);
    }

    #[test]
    fn zero_grid_dimension_is_rejected() {
        let mut config = EngineConfig::default();
        config.grid_width = 0;
        assert!(config.validate().is_err());
    }
}
