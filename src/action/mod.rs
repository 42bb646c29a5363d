//! The 4-phase per-week action resolution cycle: decision, status &
//! environmental, execution, cleanup, orchestrated by [`resolver::run_week`].
//!
//! Action kinds and their planned/resolved forms are tagged variants
//! dispatched via `match`, generalizing the component-tag + system-query
//! dispatch into plain enums, avoiding virtual-call hierarchies.

pub mod cleanup;
pub mod decision;
pub mod execution;
pub mod resolver;
pub mod status;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ATTACK_ENERGY_COST, EAT_DRINK_ENERGY_COST, MOVE_ENERGY_COST, REST_ENERGY_COST,
};
use crate::ids::AgentId;

/// One of the eight discrete actions the decision network selects among.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    MoveN,
    MoveE,
    MoveS,
    MoveW,
    Rest,
    Eat,
    Drink,
    Attack,
}

impl ActionKind {
    /// Decode an argmax index from the decision network's output layer.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => ActionKind::MoveN,
            1 => ActionKind::MoveE,
            2 => ActionKind::MoveS,
            3 => ActionKind::MoveW,
            4 => ActionKind::Rest,
            5 => ActionKind::Eat,
            6 => ActionKind::Drink,
            _ => ActionKind::Attack,
        }
    }

    pub fn energy_cost(self) -> f32 {
        match self {
            ActionKind::MoveN | ActionKind::MoveE | ActionKind::MoveS | ActionKind::MoveW => {
                MOVE_ENERGY_COST
            }
            ActionKind::Rest => REST_ENERGY_COST,
            ActionKind::Eat | ActionKind::Drink => EAT_DRINK_ENERGY_COST,
            ActionKind::Attack => ATTACK_ENERGY_COST,
        }
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            ActionKind::MoveN | ActionKind::MoveE | ActionKind::MoveS | ActionKind::MoveW
        )
    }

    /// Cardinal offset for movement actions; `None` for non-movement kinds.
    pub fn movement_offset(self) -> Option<(i32, i32)> {
        match self {
            ActionKind::MoveN => Some((0, -1)),
            ActionKind::MoveE => Some((1, 0)),
            ActionKind::MoveS => Some((0, 1)),
            ActionKind::MoveW => Some((-1, 0)),
            _ => None,
        }
    }
}

/// One agent's decision for the week, produced by the Decision Phase and
/// consumed unchanged by the Execution Phase — no world state changes
/// happen while this list is built.
#[derive(Debug, Clone, Copy)]
pub struct PlannedAction {
    pub agent_id: AgentId,
    pub kind: ActionKind,
    pub target: Option<(i32, i32)>,
    pub energy_cost: f32,
}
