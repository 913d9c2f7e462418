//! Error kinds raised by the engine.
use thiserror::Error;

use crate::night::ActionKind;
use crate::state::PlayerId;

/// Hard consistency failures detected while validating a resolved night.
///
/// Both variants abort the resolution attempt; the game state is left as it
/// was before the night began.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("illegal move: {actor} ({kind:?}) targeted fellow mafia member {target}")]
    IllegalMove {
        kind: ActionKind,
        actor: String,
        target: String,
    },
    #[error("roster consistency violated: {kind:?} action references unknown player #{id}")]
    RosterConsistency { kind: ActionKind, id: PlayerId },
}

/// Errors raised when a rules configuration violates its invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: u32,
        value: u32,
    },
    #[error("default player list contains duplicate name {0:?}")]
    DuplicateDefaultPlayer(String),
}
