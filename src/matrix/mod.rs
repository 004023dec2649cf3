//! # Matrix Client
//!
//! Thin client for the Matrix client-server API: room lookup and joins, text and
//! notice messages, read receipts, global account data and `/sync` event delivery.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod client;
pub mod error;
pub mod events;
pub mod storage;

pub use client::{ChatClient, EventSource, MatrixClient, UserProfile};
pub use error::MatrixError;
pub use events::{RoomMessage, SyncBatch};
pub use storage::BotStorage;
