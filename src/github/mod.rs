//! # GitHub Source Fetcher
//!
//! Two read-only GraphQL queries against the tracked repository: the settings file's
//! text and its line-range blame. Failures propagate to the caller; nothing here retries.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod client;
pub mod error;
pub mod types;

pub use client::{GithubClient, SourceHost};
pub use error::GithubError;
pub use types::{BlameCommit, BlameRange, GitActor, GitUser};
