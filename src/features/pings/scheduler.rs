//! Per-feature next-ping dates backed by Matrix account data
//!
//! - **Version**: 1.1.1
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.1: Reject day counts that overflow the calendar instead of panicking
//! - 1.1.0: Distinguish a missing override from an unreadable one
//! - 1.0.0: Initial release

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::matrix::ChatClient;

/// Days between pings when nobody has muted a feature
pub const DEFAULT_NOTIFICATION_DAYS: i64 = 28;
/// Snooze length for `!feature mute` without a day count (24 weeks)
pub const MUTE_DAYS: i64 = 168;
/// Account-data event type prefix; the feature name is appended
pub const PING_KEY_PREFIX: &str = "im.vector.ping.";

/// Stored account-data content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingOverride {
    pub date: String,
}

/// Result of reading a feature's override
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideLookup {
    Found(DateTime<Utc>),
    Absent,
    /// Lookup failed or the stored value could not be parsed
    Unreadable(String),
}

pub fn ping_key(feature: &str) -> String {
    format!("{PING_KEY_PREFIX}{feature}")
}

#[derive(Clone)]
pub struct PingScheduler {
    chat: Arc<dyn ChatClient>,
}

impl PingScheduler {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }

    pub async fn lookup_override(&self, feature: &str) -> OverrideLookup {
        let value = match self.chat.get_account_data(&ping_key(feature)).await {
            Ok(Some(value)) => value,
            Ok(None) => return OverrideLookup::Absent,
            Err(e) => return OverrideLookup::Unreadable(e.to_string()),
        };

        let stored: PingOverride = match serde_json::from_value(value) {
            Ok(stored) => stored,
            Err(e) => return OverrideLookup::Unreadable(format!("malformed override: {e}")),
        };

        match DateTime::parse_from_rfc3339(&stored.date) {
            Ok(date) => OverrideLookup::Found(date.with_timezone(&Utc)),
            Err(e) => OverrideLookup::Unreadable(format!("bad date {:?}: {e}", stored.date)),
        }
    }

    /// Override date when one is stored, else `last_modified` plus the default interval
    pub async fn resolve_next_ping(&self, feature: &str, last_modified: DateTime<Utc>) -> DateTime<Utc> {
        match self.lookup_override(feature).await {
            OverrideLookup::Found(date) => date,
            OverrideLookup::Absent => {
                debug!("No ping override for {feature}");
                default_next_ping(last_modified)
            }
            OverrideLookup::Unreadable(reason) => {
                warn!("Ignoring ping override for {feature}: {reason}");
                default_next_ping(last_modified)
            }
        }
    }

    /// Persist `now + days` as the feature's next ping and return it.
    ///
    /// Fails without writing when `now + days` falls outside the representable range.
    pub async fn set_next_ping(&self, feature: &str, days: i64, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let next = Duration::try_days(days)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| anyhow!("{days} days from now is out of range for {feature}"))?;
        let stored = PingOverride {
            date: next.to_rfc3339_opts(SecondsFormat::Secs, false),
        };

        self.chat
            .set_account_data(&ping_key(feature), &serde_json::to_value(&stored)?)
            .await
            .with_context(|| format!("Failed to store next ping for {feature}"))?;

        info!("Next ping for {feature} set to {} ({days} days)", stored.date);
        Ok(next)
    }
}

pub fn default_next_ping(last_modified: DateTime<Utc>) -> DateTime<Utc> {
    last_modified + Duration::days(DEFAULT_NOTIFICATION_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, FakeChat};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn scheduler() -> (Arc<FakeChat>, PingScheduler) {
        let chat = Arc::new(FakeChat::new());
        (chat.clone(), PingScheduler::new(chat))
    }

    #[tokio::test]
    async fn test_default_is_last_modified_plus_28_days() {
        let (_, scheduler) = scheduler();
        let next = scheduler
            .resolve_next_ping("feature_x", date("2024-01-01T00:00:00Z"))
            .await;
        assert_eq!(next, date("2024-01-29T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_override_wins_over_default() {
        let (chat, scheduler) = scheduler();
        chat.put_override("feature_x", "2024-02-01T00:00:00+00:00");

        let next = scheduler
            .resolve_next_ping("feature_x", date("2024-01-01T00:00:00Z"))
            .await;
        assert_eq!(next, date("2024-02-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_override_earlier_than_default_is_still_used() {
        let (chat, scheduler) = scheduler();
        chat.put_override("feature_x", "2023-06-01T00:00:00Z");

        let next = scheduler
            .resolve_next_ping("feature_x", date("2024-01-01T00:00:00Z"))
            .await;
        assert_eq!(next, date("2023-06-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_lookup_distinguishes_absent_from_unreadable() {
        let (chat, scheduler) = scheduler();
        assert_eq!(scheduler.lookup_override("feature_x").await, OverrideLookup::Absent);

        chat.account_data
            .lock()
            .unwrap()
            .insert(ping_key("feature_x"), json!({ "date": "next tuesday" }));
        assert!(matches!(
            scheduler.lookup_override("feature_x").await,
            OverrideLookup::Unreadable(_)
        ));

        chat.fail_lookups.store(true, Ordering::SeqCst);
        assert!(matches!(
            scheduler.lookup_override("feature_y").await,
            OverrideLookup::Unreadable(_)
        ));
    }

    #[tokio::test]
    async fn test_unreadable_override_falls_back_to_default() {
        let (chat, scheduler) = scheduler();
        chat.fail_lookups.store(true, Ordering::SeqCst);

        let next = scheduler
            .resolve_next_ping("feature_x", date("2024-01-01T00:00:00Z"))
            .await;
        assert_eq!(next, date("2024-01-29T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_set_next_ping_stores_iso_date() {
        let (chat, scheduler) = scheduler();
        let now = date("2024-05-10T08:15:30Z");

        let next = scheduler.set_next_ping("feature_x", 30, now).await.unwrap();
        assert_eq!(next, date("2024-06-09T08:15:30Z"));

        let stored = chat.account_data.lock().unwrap()["im.vector.ping.feature_x"].clone();
        assert_eq!(stored, json!({ "date": "2024-06-09T08:15:30+00:00" }));

        // And it reads back as the override
        let resolved = scheduler
            .resolve_next_ping("feature_x", date("2020-01-01T00:00:00Z"))
            .await;
        assert_eq!(resolved, next);
    }

    #[tokio::test]
    async fn test_set_next_ping_rejects_out_of_range_days() {
        let (chat, scheduler) = scheduler();
        let now = date("2024-05-10T08:15:30Z");

        for days in [100_000_000, i64::MAX] {
            let result = scheduler.set_next_ping("feature_x", days, now).await;
            assert!(result.is_err(), "days: {days}");
        }
        assert_eq!(chat.writes(), 0);
    }
}
