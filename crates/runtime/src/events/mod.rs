//! Topic-based event bus for battle events.
//!
//! Events are published to a topic and consumers subscribe only to the
//! topics they need. [`EventObserver`] bridges the engine's observer hooks
//! onto the bus.

mod bus;
mod observer;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use observer::EventObserver;
pub use types::{BattleEvent, TurnEvent};
