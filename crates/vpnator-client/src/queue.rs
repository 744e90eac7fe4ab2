//! Outbound queue for payloads submitted before the connection is open.

use std::collections::VecDeque;

use vpnator_core::Payload;

/// Owned FIFO of payloads waiting for an open connection.
///
/// Payloads are moved in by [`push`](Self::push) and moved out exactly once by
/// [`drain`](Self::drain); the queue never hands out shared references to its
/// contents.
#[derive(Debug, Default)]
pub struct OutboundQueue {
    pending: VecDeque<Payload>,
}

impl OutboundQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload at the back.
    pub fn push(&mut self, payload: Payload) {
        self.pending.push_back(payload);
    }

    /// Take every queued payload in submission order, leaving the queue empty.
    pub fn drain(&mut self) -> impl Iterator<Item = Payload> + '_ {
        self.pending.drain(..)
    }

    /// Drop every queued payload, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
