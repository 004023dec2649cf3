//! `!feature status`
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::commands::context::CommandContext;
use crate::commands::handler::{Invocation, SubcommandHandler};
use crate::core::from_now;
use crate::features::flags::FeatureRecord;

pub const NO_FEATURES: &str = "No features";

pub struct StatusHandler;

#[async_trait]
impl SubcommandHandler for StatusHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["status"]
    }

    async fn handle(&self, ctx: &CommandContext, invocation: &Invocation) -> Result<()> {
        let features = ctx.tracker.feature_states().await?;

        for feature in &features {
            ctx.notice(&invocation.room_id, &status_line(feature, invocation.now))
                .await?;
        }

        if features.is_empty() {
            ctx.notice(&invocation.room_id, NO_FEATURES).await?;
        }
        Ok(())
    }
}

pub fn status_line(feature: &FeatureRecord, now: DateTime<Utc>) -> String {
    format!(
        "{} was last touched by {} {} (next ping {})",
        feature.name,
        feature.author,
        from_now(feature.last_modified, now),
        from_now(feature.next_ping, now)
    )
}
