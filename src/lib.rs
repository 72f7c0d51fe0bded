//! # Message Relay
//!
//! A minimal in-memory pub/sub relay. Producers push numeric-metric
//! events keyed by `account:id:date`; consumers long-poll a
//! per-account channel and receive the next available event. Events
//! sharing a key are merged by summing their metrics rather than
//! queued separately.
//!
//! ## Core Concepts
//!
//! - **Messages**: validated metric events, at most one live record
//!   per composite key
//! - **Channels**: the account segment of a key; the delivery topic
//! - **Waiters**: subscribers parked until a matching message arrives
//! - **Resume pass**: after every successful push, all pending
//!   waiters are matched against stored messages in registration
//!   order
//!
//! ## Example
//!
//! ```ignore
//! use message_relay::Relay;
//! use serde_json::json;
//!
//! let relay = Relay::new();
//!
//! // A consumer with no message yet parks as a waiter.
//! let handle = relay.subscribe("acct1");
//!
//! // This push resolves it synchronously.
//! relay.push_json(json!({
//!     "account": "acct1",
//!     "id": "42",
//!     "date": "2016-05-01",
//!     "costs": 1.5,
//!     "shows": 10,
//!     "clicks": 2,
//! }))?;
//!
//! let message = handle.recv()?;
//! ```

pub mod error;
pub mod relay;
pub mod store;
pub mod types;
pub mod waiters;

// Re-exports
pub use error::{RelayError, Result, WaitError};
pub use relay::{Relay, RelayConfig, RelayStats};
pub use store::{MergeOutcome, MessageStore};
pub use types::{is_valid_channel, Message, MessageKey, Metrics};
pub use waiters::{DeliveryHandle, PendingWaiter, WaiterId, WaiterRegistry};
