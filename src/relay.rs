//! The relay coordinator: push, subscribe, and the resume pass.

use crate::error::Result;
use crate::store::MessageStore;
use crate::types::Message;
use crate::waiters::{DeliveryHandle, WaiterRegistry};
use crossbeam_channel::bounded;
use parking_lot::Mutex;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Relay configuration.
#[derive(Clone, Debug, Default)]
pub struct RelayConfig {
    /// Delivery window applied by
    /// [`DeliveryHandle::wait`](crate::waiters::DeliveryHandle::wait).
    /// `None` (the default) leaves waits unbounded.
    pub delivery_timeout: Option<Duration>,
}

/// Point-in-time counters over the relay's live state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub stored_messages: usize,
    pub pending_waiters: usize,
}

/// Store and registry mutated together under one lock, so a push
/// (including its resume pass) or a subscribe runs to completion
/// without interleaving with another call.
struct RelayInner {
    store: MessageStore,
    waiters: WaiterRegistry,
}

/// The relay: merge-on-key aggregation with long-poll delivery.
///
/// One instance is owned by the process entry point and shared by
/// reference into request handlers.
pub struct Relay {
    config: RelayConfig,
    inner: Mutex<RelayInner>,
}

impl Relay {
    pub fn new() -> Self {
        Self::with_config(RelayConfig::default())
    }

    pub fn with_config(config: RelayConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(RelayInner {
                store: MessageStore::new(),
                waiters: WaiterRegistry::new(),
            }),
        }
    }

    /// Validate and push a loose JSON payload.
    ///
    /// On validation failure the relay is left untouched and no
    /// resume pass runs.
    pub fn push_json(&self, payload: Value) -> Result<()> {
        let message = Message::from_value(payload)?;
        self.push(message)
    }

    /// Push a validated message: store it, then synchronously run the
    /// resume pass before returning.
    pub fn push(&self, message: Message) -> Result<()> {
        let key = message.key();
        let mut inner = self.inner.lock();
        let outcome = inner.store.insert(message);
        debug!(key = %key, ?outcome, "message stored");
        Self::resume_waiters(&mut inner);
        Ok(())
    }

    /// Pop the earliest stored message for `channel`, or register a
    /// waiter.
    ///
    /// The returned handle is already completed when a message was
    /// available; otherwise it resolves when a later push's resume
    /// pass matches this channel, or never.
    pub fn subscribe(&self, channel: &str) -> DeliveryHandle {
        let (sender, receiver) = bounded(1);
        let mut inner = self.inner.lock();
        match inner.store.pop_for_channel(channel) {
            Some(message) => {
                // Both ends are held here and the slot is empty, so
                // the one-shot send cannot fail.
                let _ = sender.send(message);
                debug!(channel = %channel, "immediate delivery");
            }
            None => {
                let id = inner.waiters.append(channel.to_string(), sender);
                debug!(channel = %channel, id = %id, "waiter registered");
            }
        }
        DeliveryHandle::new(receiver, self.config.delivery_timeout)
    }

    pub fn stats(&self) -> RelayStats {
        let inner = self.inner.lock();
        RelayStats {
            stored_messages: inner.store.len(),
            pending_waiters: inner.waiters.len(),
        }
    }

    /// Scan all pending waiters in registration order, completing
    /// each whose channel has a stored message.
    ///
    /// Runs after every successful push and deliberately scans every
    /// waiter, not just the pushed channel. A message is popped
    /// before each delivery attempt, so one stored message resolves
    /// at most one waiter and the earliest registration for a channel
    /// wins. A waiter whose receiver is gone is pruned and its
    /// message restored to the exact slot it was popped from.
    fn resume_waiters(inner: &mut RelayInner) {
        let mut resolved = Vec::new();

        for waiter in inner.waiters.snapshot() {
            let (slot, message) = match inner.store.pop_indexed(&waiter.channel) {
                Some(hit) => hit,
                None => continue,
            };

            match waiter.sender.try_send(message) {
                Ok(()) => {
                    debug!(channel = %waiter.channel, id = %waiter.id, "waiter resumed");
                    resolved.push(waiter.id);
                }
                Err(failed) => {
                    inner.store.restore_at(slot, failed.into_inner());
                    debug!(channel = %waiter.channel, id = %waiter.id, "stale waiter pruned");
                    resolved.push(waiter.id);
                }
            }
        }

        inner.waiters.remove_all(&resolved);
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}
