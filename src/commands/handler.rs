//! Sub-command handler trait
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::context::CommandContext;

/// A parsed `!feature ...` command from an authorized sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub room_id: String,
    pub sender: String,
    /// Tokens after `!feature`; `args[0]` is the sub-command
    pub args: Vec<String>,
    pub now: DateTime<Utc>,
}

impl Invocation {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Trait for `!feature` sub-command handlers
///
/// Handlers are registered with a CommandRegistry and dispatched on the first
/// argument after the command prefix.
#[async_trait]
pub trait SubcommandHandler: Send + Sync {
    /// Sub-command name(s) this handler processes
    fn command_names(&self) -> &'static [&'static str];

    async fn handle(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test that the trait is object-safe (can be used with dyn)
    fn _assert_object_safe(_: &dyn SubcommandHandler) {}

    #[test]
    fn test_arg_lookup() {
        let invocation = Invocation {
            room_id: "!r:x".to_string(),
            sender: "@a:x".to_string(),
            args: vec!["mute".to_string(), "feature_x".to_string()],
            now: Utc::now(),
        };
        assert_eq!(invocation.arg(0), Some("mute"));
        assert_eq!(invocation.arg(1), Some("feature_x"));
        assert_eq!(invocation.arg(2), None);
    }
}
