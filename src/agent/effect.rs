//! Active effects: a named, time-bounded modifier on an agent.
//!
//! Generalizes tagged-variant stat modifiers into a uniform
//! `(kind, remaining_duration)` payload rather than one variant per effect.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    WellFed,
    Exhausted,
    Poisoned,
    Injured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub remaining_duration: u32,
}

impl ActiveEffect {
    pub fn new(kind: EffectKind, remaining_duration: u32) -> Self {
        Self {
            kind,
            remaining_duration,
        }
    }

    /// Decrement duration by one week; returns `true` if the effect should
    /// now be removed.
    pub fn tick(&mut self) -> bool {
        self.remaining_duration = self.remaining_duration.saturating_sub(1);
        self.remaining_duration == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_expires_after_exact_duration() {
        let mut effect = ActiveEffect::new(EffectKind::Exhausted, 2);
        assert!(!effect.tick());
        assert!(effect.tick());
    }
}
