//! One tick: ping the notice room about every feature that is due
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{error, info};
use std::sync::Arc;

use super::scheduler::DEFAULT_NOTIFICATION_DAYS;
use crate::core::from_now;
use crate::features::flags::{FeatureRecord, FeatureTracker};
use crate::matrix::ChatClient;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub features: usize,
    pub sent: usize,
    pub failed: usize,
}

pub fn ping_message(feature: &FeatureRecord, now: DateTime<Utc>) -> String {
    format!(
        "Hey team, {name} was last modified {ago} by {author} - what's the plan? No response necessary. \
         The next ping will be in {DEFAULT_NOTIFICATION_DAYS} days or you can mute for longer with the \
         `!feature mute {name} 30` command.",
        name = feature.name,
        ago = from_now(feature.last_modified, now),
        author = feature.author,
    )
}

#[derive(Clone)]
pub struct PingNotifier {
    chat: Arc<dyn ChatClient>,
    tracker: FeatureTracker,
    room_id: String,
}

impl PingNotifier {
    pub fn new(chat: Arc<dyn ChatClient>, tracker: FeatureTracker, room_id: String) -> Self {
        Self {
            chat,
            tracker,
            room_id,
        }
    }

    /// Reconcile and notify. A fetch failure aborts the tick; a failed send only
    /// skips that feature, leaving its schedule untouched for the next tick.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Result<TickSummary> {
        let features = self.tracker.feature_states().await?;
        let mut summary = TickSummary {
            features: features.len(),
            ..TickSummary::default()
        };

        for feature in features.iter().filter(|f| f.is_due(now)) {
            match self.notify(feature, now).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    error!("Failed to ping about {}: {e:#}", feature.name);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Tick complete: {} features, {} pinged, {} failed",
            summary.features, summary.sent, summary.failed
        );
        Ok(summary)
    }

    async fn notify(&self, feature: &FeatureRecord, now: DateTime<Utc>) -> Result<()> {
        self.chat
            .send_text(&self.room_id, &ping_message(feature, now))
            .await?;
        self.tracker
            .scheduler()
            .set_next_ping(&feature.name, DEFAULT_NOTIFICATION_DAYS, now)
            .await?;
        Ok(())
    }
}
