//! Engine-wide numeric constants shared across the engine.
//!
//! Collected in one place the way vegetation-growth constants are
//! constants in `src/vegetation/constants.rs`, rather than scattering magic
//! numbers through the phases that use them.

/// Upper bound for every trait stat (STR, AGI, INT, END, PER).
pub const TRAIT_MAX: u32 = 100;

pub const BASE_HEALTH: f32 = 100.0;
pub const HEALTH_PER_END: f32 = 1.0;
pub const BASE_ENERGY: f32 = 100.0;
pub const ENERGY_PER_END: f32 = 1.0;

/// Vitals other than Health/Energy share this fixed cap: Hunger and Thirst
/// both scale 0..100.
pub const HUNGER_THIRST_CAP: f32 = 100.0;

/// Number of discrete action kinds the decision network outputs over.
pub const ACTION_COUNT: usize = 8;

/// Fixed sensory vector length: 5 internal scalars + 9 directional samples
/// of 4 features each.
pub const INPUT_LEN: usize = 5 + 9 * 4;

/// Consecutive weeks of Hunger=0 AND Thirst=0 before starvation/dehydration
/// death.
pub const STARVATION_WEEKS: u32 = 3;

/// Consecutive weeks of Energy=0 before exhaustion death.
pub const EXHAUSTION_WEEKS: u32 = 5;

// Energy costs per action kind.
pub const MOVE_ENERGY_COST: f32 = 5.0;
pub const ATTACK_ENERGY_COST: f32 = 10.0;
pub const REST_ENERGY_COST: f32 = 0.0;
pub const EAT_DRINK_ENERGY_COST: f32 = 2.0;

// Rest effects.
pub const REST_ENERGY_GAIN: f32 = 20.0;
pub const REST_HEALTH_GAIN: f32 = 5.0;

// Status & environmental phase.
pub const HUNGER_DECAY: f32 = 3.0;
pub const THIRST_DECAY: f32 = 2.0;
pub const POISONED_DAMAGE: f32 = 5.0;
pub const INJURED_DAMAGE: f32 = 3.0;
pub const ENERGY_REGEN_HIGH_HEALTH: f32 = 2.0;
pub const ENERGY_REGEN_LOW_HEALTH: f32 = 1.0;
pub const ENERGY_REGEN_HEALTH_THRESHOLD: f32 = 50.0;

// Eat/Drink nutrition gains.
pub const PLANT_GAIN_HERBIVORE: f32 = 30.0;
pub const PLANT_GAIN_OTHER: f32 = 15.0;
pub const MEAT_GAIN_CARNIVORE: f32 = 40.0;
pub const MEAT_GAIN_OTHER: f32 = 20.0;
pub const DRINK_THIRST_GAIN: f32 = 50.0;
pub const DRINK_RESOURCE_CONSUME_PROB: f64 = 0.1;

// Attack.
pub const ATTACK_HIT_CHANCE_BASE: f32 = 0.6;
pub const ATTACK_HIT_CHANCE_MIN: f32 = 0.1;
pub const ATTACK_HIT_CHANCE_MAX: f32 = 0.9;
pub const ATTACK_DAMAGE_MIN: f32 = 15.0;
pub const ATTACK_DAMAGE_MAX: f32 = 25.0;
pub const ENCOUNTER_STR_MARGIN: u32 = 10;

// Cleanup phase effect thresholds.
pub const WELL_FED_HUNGER_THRESHOLD: f32 = 90.0;
pub const WELL_FED_DURATION: u32 = 3;
pub const EXHAUSTED_ENERGY_THRESHOLD: f32 = 20.0;
pub const EXHAUSTED_DURATION: u32 = 2;

// Rule-based decision fallback thresholds.
pub const FALLBACK_HEALTH_REST_THRESHOLD: f32 = 20.0;
pub const FALLBACK_HUNGER_EAT_THRESHOLD: f32 = 30.0;
pub const FALLBACK_THIRST_DRINK_THRESHOLD: f32 = 30.0;
pub const FALLBACK_ENERGY_REST_THRESHOLD: f32 = 40.0;

// Triggered-event conditions.
pub const OVERPOPULATION_DENSITY_THRESHOLD: f32 = 0.7;
pub const NEAR_EXTINCTION_LIVING_THRESHOLD: usize = 3;
pub const RESOURCE_SCARCITY_RATIO_THRESHOLD: f32 = 0.3;
pub const DISEASE_HEALTH_THRESHOLD: f32 = 50.0;
pub const DISEASE_AFFECTED_RATIO_THRESHOLD: f32 = 0.4;
/// Independent fire probability once a triggered event's condition holds.
pub const TRIGGERED_FIRE_PROBABILITY: f64 = 0.5;

// Random-event base weekly probabilities.
pub const RANDOM_EVENT_BASE_PROBABILITY: f64 = 0.08;

// Disaster probability modifiers by living count and week number.
pub const DISASTER_MODIFIER_LOW_POPULATION: f32 = 0.3;
pub const DISASTER_MODIFIER_LOW_POPULATION_THRESHOLD: usize = 3;
pub const DISASTER_MODIFIER_HIGH_POPULATION: f32 = 1.5;
pub const DISASTER_MODIFIER_HIGH_POPULATION_THRESHOLD: usize = 15;
pub const DISASTER_MODIFIER_LATE_WEEK: f32 = 1.2;
pub const DISASTER_MODIFIER_LATE_WEEK_THRESHOLD: u32 = 10;
pub const DISASTER_MODIFIER_MID_WEEK: f32 = 1.1;
pub const DISASTER_MODIFIER_MID_WEEK_THRESHOLD: u32 = 5;
pub const DISASTER_BASE_PROBABILITY: f64 = 0.1;

/// Post-drought resource floor: `max(ceil(0.15*W*H), floor(current*multiplier))`.
pub const DROUGHT_FLOOR_DENSITY: f64 = 0.15;

// Per-event weekly base probability and cooldown (in weeks).
pub const OVERPOPULATION_PROBABILITY: f64 = 0.8;
pub const OVERPOPULATION_COOLDOWN: u32 = 5;
pub const NEAR_EXTINCTION_PROBABILITY: f64 = 1.0;
pub const NEAR_EXTINCTION_COOLDOWN: u32 = 3;
pub const RESOURCE_SCARCITY_PROBABILITY: f64 = 0.9;
pub const RESOURCE_SCARCITY_COOLDOWN: u32 = 4;
pub const DISEASE_OUTBREAK_PROBABILITY: f64 = 0.7;
pub const DISEASE_OUTBREAK_COOLDOWN: u32 = 8;

pub const RESOURCE_DISCOVERY_PROBABILITY: f64 = 0.15;
pub const RESOURCE_DISCOVERY_COOLDOWN: u32 = 3;
pub const HEALING_SPRINGS_PROBABILITY: f64 = 0.08;
pub const HEALING_SPRINGS_COOLDOWN: u32 = 4;
pub const ABUNDANT_HARVEST_PROBABILITY: f64 = 0.12;
pub const ABUNDANT_HARVEST_COOLDOWN: u32 = 5;
pub const MIGRATION_PROBABILITY: f64 = 0.1;
pub const MIGRATION_COOLDOWN: u32 = 3;
pub const WEATHER_CHANGE_PROBABILITY: f64 = 0.2;
pub const WEATHER_CHANGE_COOLDOWN: u32 = 2;
pub const PEST_INFESTATION_PROBABILITY: f64 = 0.1;
pub const PEST_INFESTATION_COOLDOWN: u32 = 4;
pub const TERRITORIAL_DISPUTE_PROBABILITY: f64 = 0.08;
pub const TERRITORIAL_DISPUTE_COOLDOWN: u32 = 3;
