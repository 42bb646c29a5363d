//! Structured observation types returned by the resolver, event engine and
//! evolution engine, generalizing the `WorldStatistics` /
//! `TerrainProperties` read-model structs (`src/tilemap/mod.rs`) which
//! report derived state back to callers instead of exposing internals.

use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::error::ActionFailure;
use crate::agent::DeathCause;
use crate::ids::AgentId;

/// Outcome of one planned action after the execution phase resolved it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub agent_id: AgentId,
    pub action: ActionKind,
    pub success: bool,
    pub failure: Option<ActionFailure>,
}

/// An agent that died during a week, and why.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Casualty {
    pub agent_id: AgentId,
    pub cause: DeathCause,
}

/// Net effect of one event's execution, returned instead of raising.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResult {
    pub kind: String,
    pub success: bool,
    pub affected_agents: Vec<AgentId>,
    pub casualties: Vec<AgentId>,
    pub effects_applied: usize,
    pub resources_changed: usize,
    pub terrain_modified: usize,
    pub fault: Option<String>,
}

impl EventResult {
    pub fn failed(kind: impl Into<String>, fault: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            success: false,
            affected_agents: Vec::new(),
            casualties: Vec::new(),
            effects_applied: 0,
            resources_changed: 0,
            terrain_modified: 0,
            fault: Some(fault.into()),
        }
    }
}

/// A single week's full accounting, enough to reconstruct observable state
/// transitions without replaying the week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekReport {
    pub week: u32,
    pub actions_planned: usize,
    pub actions_executed: usize,
    pub actions_failed: usize,
    pub movement_conflicts: usize,
    pub resource_conflicts: usize,
    pub casualties: Vec<Casualty>,
    pub events: Vec<EventResult>,
    pub outcomes: Vec<ActionOutcome>,
}

impl WeekReport {
    pub fn new(week: u32) -> Self {
        Self {
            week,
            actions_planned: 0,
            actions_executed: 0,
            actions_failed: 0,
            movement_conflicts: 0,
            resource_conflicts: 0,
            casualties: Vec::new(),
            events: Vec::new(),
            outcomes: Vec::new(),
        }
    }
}

/// Aggregate statistics at a generation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub alive_count: usize,
    pub dead_count: usize,
    pub survival_rate: f32,
    pub fitness_avg: f32,
    pub fitness_best: f32,
    pub fitness_worst: f32,
    pub fitness_std: f32,
    pub elite_count: usize,
    pub offspring_built: usize,
}
