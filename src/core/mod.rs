//! # Core Module
//!
//! Configuration and shared formatting helpers for the feature ping bot.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config and humanize modules

pub mod config;
pub mod humanize;

// Re-export commonly used items
pub use config::{Config, RepoTarget};
pub use humanize::from_now;
