//! Waiter and delivery-handle types.

use crate::error::WaitError;
use crate::types::Message;
use crossbeam_channel::{Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError};
use std::fmt;
use std::time::Duration;

/// Unique identifier for a pending waiter.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaiterId(pub u64);

impl fmt::Debug for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WaiterId({})", self.0)
    }
}

impl fmt::Display for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered subscriber connection with no message yet available.
///
/// Cloning is cheap: the sender is shared with the registry entry, so
/// a resume pass can iterate a snapshot while the registry itself
/// stays untouched until the batch removal at the end of the pass.
#[derive(Clone)]
pub struct PendingWaiter {
    pub id: WaiterId,
    pub channel: String,
    pub(crate) sender: Sender<Message>,
}

impl fmt::Debug for PendingWaiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingWaiter")
            .field("id", &self.id)
            .field("channel", &self.channel)
            .finish()
    }
}

/// Subscriber side of a delivery: completed at most once.
///
/// Dropping the handle cancels the wait; the relay prunes the stale
/// waiter on its next resume pass and keeps the message.
pub struct DeliveryHandle {
    receiver: Receiver<Message>,
    timeout: Option<Duration>,
}

impl DeliveryHandle {
    pub(crate) fn new(receiver: Receiver<Message>, timeout: Option<Duration>) -> Self {
        Self { receiver, timeout }
    }

    /// Receive the delivery (blocking, unbounded).
    pub fn recv(&self) -> Result<Message, RecvError> {
        self.receiver.recv()
    }

    /// Non-blocking probe.
    pub fn try_recv(&self) -> Result<Message, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with an explicit timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Message, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Block until delivery, honoring the relay's configured window.
    ///
    /// With no configured timeout this waits indefinitely, like the
    /// long poll it backs.
    pub fn wait(&self) -> Result<Message, WaitError> {
        match self.timeout {
            None => self.recv().map_err(|_| WaitError::Closed),
            Some(window) => self.recv_timeout(window).map_err(|err| match err {
                RecvTimeoutError::Timeout => WaitError::Timeout,
                RecvTimeoutError::Disconnected => WaitError::Closed,
            }),
        }
    }
}
