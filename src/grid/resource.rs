//! The resource model: what can sit on a tile besides an occupant.

use serde::{Deserialize, Serialize};

/// Kind of harvestable resource a tile may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Plant,
    Prey,
    Carcass,
    Water,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Plant,
        ResourceKind::Prey,
        ResourceKind::Carcass,
        ResourceKind::Water,
    ];

    /// Index into the fixed kind ordering, used by the sensory encoder to
    /// normalize resource identity into `[0, 1]`.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }
}

/// A harvestable resource sitting on a tile.
///
/// `quantity` is carried for data-model fidelity with the reference design
/// but is not consulted by Eat/Drink — those use the per-kind nutrition
/// table in `action::execution` (see the frozen Open Question in
/// the resolved open question on nutrition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub kind: ResourceKind,
    pub quantity: f32,
    pub uses_left: u32,
}

impl Resource {
    pub fn new(kind: ResourceKind, quantity: f32, uses_left: u32) -> Self {
        Self {
            kind,
            quantity,
            uses_left,
        }
    }

    /// Consume one use, returning whether the resource is now exhausted.
    pub fn consume_one(&mut self) -> bool {
        self.uses_left = self.uses_left.saturating_sub(1);
        self.uses_left == 0
    }
}
