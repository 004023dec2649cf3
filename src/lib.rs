// Core layer - configuration and shared helpers
pub mod core;

// Collaborators - chat service and source hosting
pub mod github;
pub mod matrix;

// Features layer - feature-flag reconciliation and ping scheduling
pub mod features;

// Application layer
pub mod commands;
pub mod dispatcher;
pub mod identity;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::core::Config;

pub use features::{FeatureRecord, FeatureTracker, PingNotifier, PingScheduler};

pub use commands::CommandInterpreter;
pub use dispatcher::{Dispatcher, Job};
pub use identity::BotIdentity;
