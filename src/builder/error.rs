//! Errors raised while building a machine from its configuration.

use thiserror::Error;

/// Configuration errors. All of them are raised before a machine exists.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("State configuration not specified. Call .config(..) before .build()")]
    MissingConfig,

    #[error("Target '{target}' of event '{event}' on state '{state}' not found")]
    TargetNotFound {
        state: String,
        event: String,
        target: String,
    },

    #[error("Action '{action}' on state '{state}' not found in setup actions")]
    ActionNotFound { state: String, action: String },

    #[error("Guard '{guard}' of event '{event}' on state '{state}' not found in setup guards")]
    GuardNotFound {
        state: String,
        event: String,
        guard: String,
    },

    #[error("Initial state '{initial}' is not a child of '{state}'")]
    InitialNotFound { state: String, initial: String },

    #[error("Event '{event}' on state '{state}' has no transitions")]
    EmptyEvent { state: String, event: String },

    #[error("State id '{id}' is already registered")]
    DuplicateId { id: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{} configuration errors, first: {}", .0.len(), .0[0])]
    Multiple(Vec<BuildError>),
}
