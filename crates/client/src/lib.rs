//! Terminal client for clash battles.
//!
//! The `clash` binary is the composition root: it reads [`ClientConfig`],
//! installs logging, loads content through `clash-content`, and runs the
//! battle on the async runtime with the console providers from [`console`].

pub mod config;
pub mod console;
pub mod logging;

pub use config::ClientConfig;
pub use console::{ConsolePresentation, ConsoleSelection};
