//! `!feature mute <feature> [days]`
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;

use super::HELP_TEXT;
use crate::commands::context::CommandContext;
use crate::commands::handler::{Invocation, SubcommandHandler};
use crate::core::from_now;
use crate::features::pings::MUTE_DAYS;

pub struct MuteHandler;

#[async_trait]
impl SubcommandHandler for MuteHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["mute"]
    }

    async fn handle(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let Some(feature) = invocation.arg(1) else {
            return ctx.notice(&invocation.room_id, HELP_TEXT).await;
        };
        let days = parse_mute_days(invocation.arg(2));

        // The override is written even if the feature has since disappeared
        ctx.tracker
            .scheduler()
            .set_next_ping(feature, days, invocation.now)
            .await?;
        info!("{} muted {feature} for {days} days", invocation.sender);

        let features = ctx.tracker.feature_states().await?;
        let reply = match features.iter().find(|f| f.name == feature) {
            Some(state) => format!(
                "{} will cause a notification {}",
                state.name,
                from_now(state.next_ping, invocation.now)
            ),
            None => "Feature not found".to_string(),
        };
        ctx.notice(&invocation.room_id, &reply).await
    }
}

/// Positive whole day count, else the default mute length
fn parse_mute_days(raw: Option<&str>) -> i64 {
    raw.and_then(|d| d.parse::<i64>().ok())
        .filter(|d| *d > 0)
        .unwrap_or(MUTE_DAYS)
}
