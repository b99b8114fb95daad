//! Async runtime for clash battles.
//!
//! This crate drives a [`clash_core::CombatStateMachine`] to completion,
//! sourcing player choices and turn playback from pluggable async providers
//! and publishing everything the engine reports on a topic-based event bus.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the provider traits and error types
//! - [`events`] provides the event bus and the engine-to-bus bridge
pub mod api;
pub mod events;
pub mod runtime;

pub use api::{
    DelayedPresentation, FirstAvailableProvider, InstantPresentation, PolicySelectionProvider,
    PresentationProvider, ProviderKind, Result, RuntimeError, ScriptedSelectionProvider,
    SelectionProvider,
};
pub use events::{BattleEvent, Event, EventBus, EventObserver, Topic, TurnEvent};
pub use runtime::{BattleReport, Runtime, RuntimeBuilder, RuntimeConfig};
