//! Pending-subscriber registry and delivery handles.
//!
//! A subscriber with no message available becomes a [`PendingWaiter`]
//! held by the [`WaiterRegistry`] in registration order. The matching
//! [`DeliveryHandle`] is the subscriber side: a one-shot channel that
//! the resume pass completes at most once.
//!
//! # Example
//!
//! ```ignore
//! let relay = Relay::new();
//! let handle = relay.subscribe("acct1");
//!
//! // Blocks until a push for "acct1" resolves the waiter.
//! let message = handle.recv()?;
//! ```

mod registry;
mod types;

pub use registry::WaiterRegistry;
pub use types::{DeliveryHandle, PendingWaiter, WaiterId};
