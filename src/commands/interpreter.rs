//! Inbound message handling: filter, authorize, dispatch
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::Invocation;
use super::handlers::{create_all_handlers, HELP_TEXT};
use super::parser::{command_args, normalize_command};
use super::registry::CommandRegistry;
use crate::matrix::RoomMessage;

pub struct CommandInterpreter {
    ctx: CommandContext,
    registry: CommandRegistry,
}

impl CommandInterpreter {
    pub fn new(ctx: CommandContext) -> Self {
        let mut registry = CommandRegistry::new();
        for handler in create_all_handlers() {
            registry.register(handler);
        }
        Self { ctx, registry }
    }

    /// Process one room message. Messages not meant for the bot are ignored quietly.
    pub async fn handle_message(&self, message: &RoomMessage, now: DateTime<Utc>) -> Result<()> {
        let identity = Arc::clone(&self.ctx.identity);

        if message.room_id != identity.notice_room_id || message.sender == identity.user_id {
            return Ok(());
        }
        let Some(body) = message.text_body() else {
            return Ok(());
        };
        let Some(canonical) = normalize_command(body, &identity) else {
            return Ok(());
        };

        if let Err(e) = self
            .ctx
            .chat
            .send_read_receipt(&message.room_id, &message.event_id)
            .await
        {
            warn!("Failed to send read receipt for {}: {e}", message.event_id);
        }

        if !identity.is_authorized(&message.sender) {
            info!("Rejected command from unauthorized sender {}", message.sender);
            return self
                .ctx
                .notice(
                    &message.room_id,
                    &format!(
                        "Sorry {}, you don't have permission to run this command",
                        message.sender
                    ),
                )
                .await;
        }

        let invocation = Invocation {
            room_id: message.room_id.clone(),
            sender: message.sender.clone(),
            args: command_args(&canonical),
            now,
        };
        info!("{} ran `{canonical}`", invocation.sender);

        let handler = invocation.arg(0).and_then(|name| self.registry.get(name));
        match handler {
            Some(handler) => handler.handle(&self.ctx, &invocation).await,
            None => {
                debug!("No sub-command matched, sending help");
                self.ctx.notice(&invocation.room_id, HELP_TEXT).await
            }
        }
    }
}
