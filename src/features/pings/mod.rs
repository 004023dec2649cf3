//! # Feature Pings
//!
//! Scheduled nagging about stale feature flags. Next-ping dates live in Matrix
//! account data (`im.vector.ping.<feature>`) and are reset after every ping or mute.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod notifier;
pub mod scheduler;

pub use notifier::{ping_message, PingNotifier, TickSummary};
pub use scheduler::{
    default_next_ping, ping_key, OverrideLookup, PingOverride, PingScheduler,
    DEFAULT_NOTIFICATION_DAYS, MUTE_DAYS,
};
