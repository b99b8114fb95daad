//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from providers, battle setup and the combat state machine
//! so clients can bubble them up with consistent context.
use std::fmt;
use std::path::PathBuf;

use clash_core::{CombatantId, ConfigurationError, SignalError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{kind} provider not set")]
    ProviderNotSet { kind: ProviderKind },

    #[error("{kind} provider failed: {reason}")]
    ProviderFailed { kind: ProviderKind, reason: String },

    #[error("runtime requires a roster before building")]
    MissingRoster,

    #[error("failed to load roster from {}: {reason}", path.display())]
    Content { path: PathBuf, reason: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("combat signal rejected")]
    Signal(#[from] SignalError),

    #[error("selection for {actor} rejected after {attempts} attempt(s)")]
    SelectionRejected {
        actor: CombatantId,
        attempts: u32,
        #[source]
        source: SignalError,
    },
}

impl RuntimeError {
    pub fn provider(kind: ProviderKind, reason: impl fmt::Display) -> Self {
        Self::ProviderFailed {
            kind,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    Selection,
    Presentation,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::Selection => "selection",
            ProviderKind::Presentation => "presentation",
        };
        write!(f, "{}", label)
    }
}
