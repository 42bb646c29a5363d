//! Error types for the evolutionary simulation engine.
//!
//! Mirrors the error-kind catalog from the design's error handling policy:
//! action-level failures are recorded on the action/event result, never
//! raised as an `Err`; only invalid control-verb transitions, out-of-bounds
//! lookups, event faults and internal invariant violations surface here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Core error type for the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EvosimError {
    /// A control verb was called from an incompatible lifecycle state.
    InvalidState(String),
    /// A grid lookup fell outside `[0, W) x [0, H)`.
    OutOfBounds { x: i32, y: i32 },
    /// An internal invariant was violated. Never expected in correct code;
    /// treated as fatal during development.
    InvariantViolated(String),
    /// An individual event's execution raised during scheduling.
    EventFault(String),
}

impl fmt::Display for EvosimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvosimError::InvalidState(msg) => write!(f, "invalid state transition: {msg}"),
            EvosimError::OutOfBounds { x, y } => {
                write!(f, "coordinates ({x}, {y}) out of bounds")
            }
            EvosimError::InvariantViolated(msg) => write!(f, "invariant violated: {msg}"),
            EvosimError::EventFault(msg) => write!(f, "event fault: {msg}"),
        }
    }
}

impl std::error::Error for EvosimError {}

/// Convenient result alias for fallible engine operations.
pub type Result<T> = std::result::Result<T, EvosimError>;

impl EvosimError {
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn out_of_bounds(x: i32, y: i32) -> Self {
        Self::OutOfBounds { x, y }
    }

    pub fn invariant<S: Into<String>>(msg: S) -> Self {
        Self::InvariantViolated(msg.into())
    }

    pub fn event_fault<S: Into<String>>(msg: S) -> Self {
        Self::EventFault(msg.into())
    }
}

/// Reasons an individual planned action can fail to execute.
///
/// These are never returned as `Err`; they are recorded on the
/// [`crate::report::ActionOutcome`] so higher layers can analyze them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionFailure {
    /// The agent lacked the energy the action required.
    InsufficientResource,
    /// Movement lost the tie-break to another agent.
    ConflictLost,
    /// Target tile terrain forbids the action (e.g. Mountains).
    Mountain,
    /// Target tile or resource did not meet the action's precondition.
    Encounter,
    /// No valid target existed for the action (no adjacent resource, no occupant).
    NoTarget,
    /// Target agent was already dead when the action resolved.
    TargetGone,
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionFailure::InsufficientResource => "InsufficientResource",
            ActionFailure::ConflictLost => "ConflictLost",
            ActionFailure::Mountain => "Mountain",
            ActionFailure::Encounter => "Encounter",
            ActionFailure::NoTarget => "NoTarget",
            ActionFailure::TargetGone => "TargetGone",
        };
        write!(f, "{s}")
    }
}
