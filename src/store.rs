//! Merge-on-insert message storage.

use crate::types::{Message, MessageKey};
use std::collections::HashMap;

/// How an insert landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First message for its key.
    Inserted,
    /// Metrics were summed onto an existing record.
    Merged,
}

/// Key-addressed storage preserving arrival order.
///
/// At most one live message exists per composite key. Merging onto an
/// existing key never moves it in iteration order; only a pop removes
/// an entry. The channel-scoped pop selects the earliest-inserted
/// entry for the channel via an ordered linear scan.
pub struct MessageStore {
    /// Live messages by key.
    entries: HashMap<MessageKey, Message>,

    /// Keys in arrival order. Merges leave this untouched.
    order: Vec<MessageKey>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Insert a validated message, summing metrics onto an existing
    /// record with the same key.
    ///
    /// On a merge the existing record keeps its position in arrival
    /// order and its non-metric fields; only costs/shows/clicks
    /// change.
    pub fn insert(&mut self, message: Message) -> MergeOutcome {
        let key = message.key();
        if let Some(existing) = self.entries.get_mut(&key) {
            existing.metrics.merge(message.metrics);
            MergeOutcome::Merged
        } else {
            self.order.push(key.clone());
            self.entries.insert(key, message);
            MergeOutcome::Inserted
        }
    }

    /// Remove and return the earliest-inserted message for `channel`.
    ///
    /// `None` means no message is stored for the channel; that is a
    /// normal outcome, not an error.
    pub fn pop_for_channel(&mut self, channel: &str) -> Option<Message> {
        self.pop_indexed(channel).map(|(_, message)| message)
    }

    /// Like [`pop_for_channel`](Self::pop_for_channel), also yielding
    /// the slot the key occupied so [`restore_at`](Self::restore_at)
    /// can undo the pop.
    pub(crate) fn pop_indexed(&mut self, channel: &str) -> Option<(usize, Message)> {
        let slot = self
            .order
            .iter()
            .position(|key| key.channel() == channel)?;
        let key = self.order.remove(slot);
        let message = self.entries.remove(&key)?;
        Some((slot, message))
    }

    /// Put a popped message back at the slot it came from.
    ///
    /// Callers must restore before the next store mutation so the
    /// slot still refers to the same position in arrival order.
    pub(crate) fn restore_at(&mut self, slot: usize, message: Message) {
        let key = message.key();
        self.order.insert(slot, key.clone());
        self.entries.insert(key, message);
    }

    /// Look up a stored message without removing it.
    pub fn get(&self, key: &MessageKey) -> Option<&Message> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}
