//! Ordered registry of pending subscribers.

use super::types::{PendingWaiter, WaiterId};
use crate::types::Message;
use crossbeam_channel::Sender;

/// Insertion-ordered collection of pending waiters.
///
/// Appends go to the end, batch removal never reorders survivors, and
/// resume passes iterate over a [`snapshot`](Self::snapshot) so the
/// live sequence is free of mutation hazards mid-scan.
pub struct WaiterRegistry {
    waiters: Vec<PendingWaiter>,
    next_id: u64,
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self {
            waiters: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a waiter at the end of the queue.
    ///
    /// No de-duplication: one subscribe call yields exactly one
    /// waiter.
    pub fn append(&mut self, channel: String, sender: Sender<Message>) -> WaiterId {
        let id = WaiterId(self.next_id);
        self.next_id += 1;
        self.waiters.push(PendingWaiter {
            id,
            channel,
            sender,
        });
        id
    }

    /// Clone of the current sequence in registration order.
    pub fn snapshot(&self) -> Vec<PendingWaiter> {
        self.waiters.clone()
    }

    /// Remove every waiter whose id is in `resolved`, preserving the
    /// relative order of the rest.
    pub fn remove_all(&mut self, resolved: &[WaiterId]) {
        if resolved.is_empty() {
            return;
        }
        self.waiters.retain(|waiter| !resolved.contains(&waiter.id));
    }

    pub fn len(&self) -> usize {
        self.waiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiters.is_empty()
    }
}

impl Default for WaiterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    fn register(registry: &mut WaiterRegistry, channel: &str) -> WaiterId {
        let (sender, _receiver) = bounded(1);
        registry.append(channel.to_string(), sender)
    }

    #[test]
    fn test_append_preserves_registration_order() {
        let mut registry = WaiterRegistry::new();
        let first = register(&mut registry, "a");
        let second = register(&mut registry, "b");

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, first);
        assert_eq!(snapshot[1].id, second);
    }

    #[test]
    fn test_no_deduplication_per_channel() {
        let mut registry = WaiterRegistry::new();
        register(&mut registry, "a");
        register(&mut registry, "a");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_all_keeps_survivor_order() {
        let mut registry = WaiterRegistry::new();
        let first = register(&mut registry, "a");
        let second = register(&mut registry, "b");
        let third = register(&mut registry, "c");

        registry.remove_all(&[second]);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, first);
        assert_eq!(snapshot[1].id, third);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut registry = WaiterRegistry::new();
        register(&mut registry, "a");

        let snapshot = registry.snapshot();
        register(&mut registry, "b");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
