//! Integer trait stats and the derived caps they produce.

use serde::{Deserialize, Serialize};

use crate::constants::{BASE_ENERGY, BASE_HEALTH, ENERGY_PER_END, HEALTH_PER_END, TRAIT_MAX};

/// An agent's five integer trait stats, each clamped to `[1, TRAIT_MAX]`.
///
/// Named `strength`/`agility`/... rather than the short STR/AGI
/// abbreviations; field docs below note the abbreviation where it matters
/// for a formula (movement tie-breaks, attack odds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traits {
    /// STR
    pub strength: u32,
    /// AGI
    pub agility: u32,
    /// INT
    pub intellect: u32,
    /// END
    pub endurance: u32,
    /// PER
    pub perception: u32,
}

impl Traits {
    pub fn new(strength: u32, agility: u32, intellect: u32, endurance: u32, perception: u32) -> Self {
        Self {
            strength: clamp_trait(strength),
            agility: clamp_trait(agility),
            intellect: clamp_trait(intellect),
            endurance: clamp_trait(endurance),
            perception: clamp_trait(perception),
        }
    }

    pub fn max_health(&self) -> f32 {
        BASE_HEALTH + self.endurance as f32 * HEALTH_PER_END
    }

    pub fn max_energy(&self) -> f32 {
        BASE_ENERGY + self.endurance as f32 * ENERGY_PER_END
    }
}

fn clamp_trait(v: u32) -> u32 {
    v.clamp(1, TRAIT_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traits_clamp_to_bounds() {
        let t = Traits::new(0, 500, 50, 50, 50);
        assert_eq!(t.strength, 1);
        assert_eq!(t.agility, TRAIT_MAX);
    }

    #[test]
    fn derived_caps_scale_with_endurance() {
        let low = Traits::new(50, 50, 50, 1, 50);
        let high = Traits::new(50, 50, 50, 50, 50);
        assert!(high.max_health() > low.max_health());
        assert!(high.max_energy() > low.max_energy());
    }
}
