//! Sub-command handler registry
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::collections::HashMap;
use std::sync::Arc;

use super::handler::SubcommandHandler;

/// Registry mapping sub-command names to handlers
///
/// Multiple names can map to the same handler if they share logic.
#[derive(Clone)]
pub struct CommandRegistry {
    handlers: HashMap<&'static str, Arc<dyn SubcommandHandler>>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for its declared command names
    pub fn register(&mut self, handler: Arc<dyn SubcommandHandler>) {
        for name in handler.command_names() {
            self.handlers.insert(name, Arc::clone(&handler));
        }
    }

    /// Get handler for a sub-command name
    pub fn get(&self, name: &str) -> Option<Arc<dyn SubcommandHandler>> {
        self.handlers.get(name).cloned()
    }

    #[cfg(test)]
    fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered command names (not unique handlers)
    #[cfg(test)]
    fn len(&self) -> usize {
        self.handlers.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::context::CommandContext;
    use crate::commands::handler::Invocation;
    use anyhow::Result;
    use async_trait::async_trait;

    // Mock handler for testing
    struct MockHandler {
        names: &'static [&'static str],
    }

    #[async_trait]
    impl SubcommandHandler for MockHandler {
        fn command_names(&self) -> &'static [&'static str] {
            self.names
        }

        async fn handle(&self, _ctx: &CommandContext, _invocation: &Invocation) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_register_multiple_names() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler {
            names: &["mute", "snooze"],
        }));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("mute"));
        assert!(registry.contains("snooze"));
        assert!(!registry.contains("status"));
    }

    #[test]
    fn test_registry_get_returns_handler() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(MockHandler { names: &["status"] }));

        assert!(registry.get("status").is_some());
        assert!(registry.get("missing").is_none());
    }
}
