//! Per-sub-command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

pub mod mute;
pub mod status;

use std::sync::Arc;

use super::handler::SubcommandHandler;

pub const HELP_TEXT: &str = "Help:\n\
    !feature mute <feature name> [days] - Stop complaining about a feature for this amount of time\n\
    !feature status - Print current feature statuses\n";

/// Create all registered sub-command handlers
pub fn create_all_handlers() -> Vec<Arc<dyn SubcommandHandler>> {
    vec![Arc::new(mute::MuteHandler), Arc::new(status::StatusHandler)]
}
