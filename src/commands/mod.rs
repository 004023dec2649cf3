//! # Command System
//!
//! `!feature` chat commands addressed to the bot in the notice room.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with `mute` and `status`

pub mod context;
pub mod handler;
pub mod handlers;
pub mod interpreter;
pub mod parser;
pub mod registry;

// Re-export handler infrastructure
pub use context::CommandContext;
pub use handler::{Invocation, SubcommandHandler};
pub use interpreter::CommandInterpreter;
pub use parser::{command_args, normalize_command, COMMAND_PREFIX};
pub use registry::CommandRegistry;
