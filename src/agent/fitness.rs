//! Fitness accumulators and the fitness function the evolution engine
//! selects on.

use serde::{Deserialize, Serialize};

/// The multiplier on kills (`K`) in the fitness formula.
pub const KILL_WEIGHT: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessAccumulators {
    pub time_alive: u32,
    pub distance_traveled: u32,
    pub resource_units_consumed: f32,
    pub kills: u32,
}

impl FitnessAccumulators {
    /// `fitness = time_alive*10 + (Hunger+Thirst)/200 + Energy/100 +
    /// min(movement_count*0.1, 10) + 2*resource_units_consumed + K*kills`
    pub fn fitness(&self, hunger: f32, thirst: f32, energy: f32) -> f32 {
        self.time_alive as f32 * 10.0
            + (hunger + thirst) / 200.0
            + energy / 100.0
            + (self.distance_traveled as f32 * 0.1).min(10.0)
            + 2.0 * self.resource_units_consumed
            + KILL_WEIGHT * self.kills as f32
    }
}
