//! # Features
//!
//! - **flags**: feature-flag records reconciled from the tracked settings file
//! - **pings**: next-ping scheduling and the periodic notification pass

pub mod flags;
pub mod pings;

pub use flags::{FeatureRecord, FeatureTracker};
pub use pings::{PingNotifier, PingScheduler};
