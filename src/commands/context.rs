//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use std::sync::Arc;

use crate::features::flags::FeatureTracker;
use crate::identity::BotIdentity;
use crate::matrix::ChatClient;

/// Services every sub-command handler needs
#[derive(Clone)]
pub struct CommandContext {
    pub chat: Arc<dyn ChatClient>,
    pub tracker: FeatureTracker,
    pub identity: Arc<BotIdentity>,
}

impl CommandContext {
    pub fn new(chat: Arc<dyn ChatClient>, tracker: FeatureTracker, identity: Arc<BotIdentity>) -> Self {
        Self {
            chat,
            tracker,
            identity,
        }
    }

    /// Reply with an `m.notice` in `room_id`
    pub async fn notice(&self, room_id: &str, text: &str) -> Result<()> {
        self.chat.send_notice(room_id, text).await?;
        Ok(())
    }
}
