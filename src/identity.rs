//! Bot identity resolved once at startup
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::{Context, Result};
use log::{info, warn};

use crate::matrix::ChatClient;

/// Who the bot is and where it listens. Built once, then shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub notice_room_id: String,
    pub user_id: String,
    pub localpart: String,
    pub display_name: Option<String>,
    pub authorized_users: Vec<String>,
}

impl BotIdentity {
    /// Resolve the notice room (joining it if needed) and look up the bot's own user
    pub async fn initialize(
        chat: &dyn ChatClient,
        notice_room: &str,
        authorized_users: Vec<String>,
    ) -> Result<Self> {
        let mut notice_room_id = chat
            .resolve_room(notice_room)
            .await
            .with_context(|| format!("Failed to resolve notice room {notice_room}"))?;

        let joined = chat.joined_rooms().await.context("Failed to list joined rooms")?;
        if !joined.contains(&notice_room_id) {
            notice_room_id = chat
                .join_room(notice_room)
                .await
                .with_context(|| format!("Failed to join notice room {notice_room}"))?;
            info!("Joined notice room {notice_room_id}");
        }

        let user_id = chat.user_id().await.context("Failed to look up bot user id")?;
        let localpart = localpart_of(&user_id).to_string();

        let display_name = match chat.user_profile(&user_id).await {
            Ok(profile) => profile.displayname.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                warn!("Could not load profile for {user_id}: {e}");
                None
            }
        };

        info!(
            "Running as {user_id} ({}) in {notice_room_id}, {} authorized users",
            display_name.as_deref().unwrap_or("no display name"),
            authorized_users.len()
        );

        Ok(Self {
            notice_room_id,
            user_id,
            localpart,
            display_name,
            authorized_users,
        })
    }

    pub fn is_authorized(&self, sender: &str) -> bool {
        self.authorized_users.iter().any(|u| u == sender)
    }
}

/// `@name:server` -> `name`
pub fn localpart_of(user_id: &str) -> &str {
    let without_sigil = user_id.strip_prefix('@').unwrap_or(user_id);
    without_sigil.split(':').next().unwrap_or(without_sigil)
}
