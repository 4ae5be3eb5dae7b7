//! Priority queue for events published during a tick.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::entity::Entity;
use crate::event::{Event, Priority};

/// A published event waiting to be dispatched.
#[derive(Debug)]
pub struct QueuedEvent {
    /// Member that published the event, if any.
    pub source: Option<Entity>,
    pub event: Event,
    priority: Priority,
    sequence: u64,
}

impl QueuedEvent {
    /// Get the priority the event was queued with.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Push stamp; later pushes have larger values.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for QueuedEvent {}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedEvent {
    // BinaryHeap pops the greatest entry: smallest priority, then newest push.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Events ordered by priority ascending, ties broken most-recently-pushed
/// first.
#[derive(Debug, Default)]
pub struct DispatchQueue {
    heap: BinaryHeap<QueuedEvent>,
    next_sequence: u64,
}

impl DispatchQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event, stamping it with the next sequence number.
    pub fn push(&mut self, source: Option<Entity>, event: Event) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(QueuedEvent {
            source,
            priority: event.priority(),
            event,
            sequence,
        });
    }

    /// Take the next event to dispatch.
    pub fn pop(&mut self) -> Option<QueuedEvent> {
        self.heap.pop()
    }

    /// Priority of the entry `pop` would return.
    #[must_use]
    pub fn peek_priority(&self) -> Option<Priority> {
        self.heap.peek().map(QueuedEvent::priority)
    }

    /// Get the number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending event. Sequence numbering keeps counting up.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
