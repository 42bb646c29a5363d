//! Stable identifiers shared across the grid, agent population and action
//! resolver. Generalizes the newtype-wrapper pattern in the
//! `src/types/newtypes.rs` (e.g. `Distance`, `Biomass`): a thin wrapper over
//! a primitive that stops ids from being confused with raw indices or with
//! each other.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique identity of an agent, issued once by the population arena
/// and never reused, even after the agent dies and is recycled out of the
/// living set. Tiles reference agents by `AgentId`, never by index, so a
/// tile can't accidentally resolve to a different agent after a respawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u64);

impl AgentId {
    #[inline(always)]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Monotonic counter that mints fresh [`AgentId`]s, owned exclusively by
/// the population arena.
#[derive(Debug, Clone, Default)]
pub struct AgentIdAllocator {
    next: u64,
}

impl AgentIdAllocator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next += 1;
        id
    }
}
