//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! the orchestrator itself can stay focused on driving the battle.

pub mod errors;
pub mod providers;

pub use errors::{ProviderKind, Result, RuntimeError};
pub use providers::{
    DelayedPresentation, FirstAvailableProvider, InstantPresentation, PolicySelectionProvider,
    PresentationProvider, ScriptedSelectionProvider, SelectionProvider,
};
