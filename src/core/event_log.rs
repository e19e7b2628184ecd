//! Append-only event log
//!
//! This module provides the EventLog component that keeps the audit record
//! of every committed call. Events are appended in commit order and never
//! modified or removed; sequence numbers are therefore non-decreasing along
//! the log, which lets range queries start with a binary search.

use crate::types::{EventKind, LedgerEvent, Seq, TransferRecord};

/// Append-only log of ledger events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        EventLog { events: Vec::new() }
    }

    /// Append an event
    ///
    /// Callers append in commit order; the event's sequence number must not
    /// be lower than the last one appended.
    pub fn append(&mut self, event: LedgerEvent) {
        debug_assert!(self
            .events
            .last()
            .map_or(true, |last| last.seq() <= event.seq()));
        self.events.push(event);
    }

    /// Number of events in the log
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events, in commit order
    pub fn all(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Events appended since position `start` (used to build receipts)
    pub(crate) fn since(&self, start: usize) -> &[LedgerEvent] {
        &self.events[start.min(self.events.len())..]
    }

    /// Events of `kind` with `from_seq <= seq <= to_seq`
    ///
    /// The returned iterator is lazy, finite and can be cloned to restart
    /// the query. An empty or inverted range yields nothing.
    pub fn query(&self, kind: EventKind, from_seq: Seq, to_seq: Seq) -> Events<'_> {
        let start = self.events.partition_point(|event| event.seq() < from_seq);
        let end = self.events.partition_point(|event| event.seq() <= to_seq);
        let window = if start <= end {
            &self.events[start..end]
        } else {
            &[]
        };

        Events {
            inner: window.iter(),
            kind,
        }
    }

    /// Transfer records with `from_seq <= seq <= to_seq`
    pub fn transfers(
        &self,
        from_seq: Seq,
        to_seq: Seq,
    ) -> impl Iterator<Item = &TransferRecord> + Clone + '_ {
        self.query(EventKind::Transfer, from_seq, to_seq)
            .filter_map(LedgerEvent::as_transfer)
    }
}

/// Lazy iterator over a range of the event log, filtered by kind
#[derive(Debug, Clone)]
pub struct Events<'a> {
    inner: std::slice::Iter<'a, LedgerEvent>,
    kind: EventKind,
}

impl<'a> Iterator for Events<'a> {
    type Item = &'a LedgerEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.kind;
        self.inner.by_ref().find(|event| event.kind() == kind)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}
