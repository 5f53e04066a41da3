//! # amf-eventchan: retained-event worklist (spec.md §4.6)
//!
//! Per-channel worklist indexed by a monotonic `chan_id`: a tree of open
//! handles keyed by `chan_open_id`, three per-priority FIFO lists of
//! retained events, and per-event retention timers. Retention-timer
//! expiry removes the event; channel-unlink marks the channel (preserving
//! its use-count) and only deletes it on last close.

use std::collections::VecDeque;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChanId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChanOpenId(pub u64);

/// Retained-event priority (spec.md §4.6 "HIGHEST..LOWEST").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventPriority {
    Lowest,
    Medium,
    Highest,
}

const PRIORITIES: [EventPriority; 3] =
    [EventPriority::Highest, EventPriority::Medium, EventPriority::Lowest];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetainedEvent {
    pub event_id: u64,
    pub priority: EventPriority,
    pub payload: Vec<u8>,
    pub retention: Duration,
    pub age: Duration,
}

impl RetainedEvent {
    pub fn is_expired(&self) -> bool {
        self.age >= self.retention
    }
}

/// One event channel. Open-handle bookkeeping and the three retained
/// queues the publisher count/subscriber count on open/close and never
/// elsewhere (spec.md §4.6 invariant).
#[derive(Debug)]
pub struct Channel {
    pub id: ChanId,
    open_handles: IndexMap<ChanOpenId, ()>,
    retained: [VecDeque<RetainedEvent>; 3],
    pub publisher_count: u32,
    pub subscriber_count: u32,
    pub unlinked: bool,
}

impl Channel {
    pub fn new(id: ChanId) -> Self {
        Self {
            id,
            open_handles: IndexMap::new(),
            retained: Default::default(),
            publisher_count: 0,
            subscriber_count: 0,
            unlinked: false,
        }
    }

    fn priority_slot(priority: EventPriority) -> usize {
        PRIORITIES.iter().position(|p| *p == priority).expect("exhaustive priority list")
    }

    pub fn open(&mut self, open_id: ChanOpenId, is_subscriber: bool) {
        self.open_handles.insert(open_id, ());
        if is_subscriber {
            self.subscriber_count += 1;
        } else {
            self.publisher_count += 1;
        }
    }

    /// Closes a handle. Returns `true` if the channel should now be
    /// deleted (unlinked and this was the last open handle).
    pub fn close(&mut self, open_id: ChanOpenId, is_subscriber: bool) -> bool {
        if self.open_handles.shift_remove(&open_id).is_some() {
            if is_subscriber {
                self.subscriber_count = self.subscriber_count.saturating_sub(1);
            } else {
                self.publisher_count = self.publisher_count.saturating_sub(1);
            }
        }
        self.unlinked && self.open_handles.is_empty()
    }

    pub fn use_count(&self) -> usize {
        self.open_handles.len()
    }

    /// Marks the channel unlinked without touching open handles (spec.md
    /// §4.6: "preserves use-count, and deletes on last close").
    pub fn unlink(&mut self) -> bool {
        self.unlinked = true;
        self.open_handles.is_empty()
    }

    /// Retains `event` at the tail of its priority's queue: O(1).
    pub fn retain(&mut self, event: RetainedEvent) {
        self.retained[Self::priority_slot(event.priority)].push_back(event);
    }

    /// Advances every retained event's age by `elapsed` and drops any
    /// that expired.
    pub fn tick(&mut self, elapsed: Duration) {
        for queue in &mut self.retained {
            for event in queue.iter_mut() {
                event.age += elapsed;
            }
            queue.retain(|e| !e.is_expired());
        }
    }

    /// Drains retained events HIGHEST..LOWEST, FIFO within a priority.
    pub fn drain_retained(&mut self) -> Vec<RetainedEvent> {
        let mut out = Vec::new();
        for queue in &mut self.retained {
            out.extend(queue.drain(..));
        }
        out
    }
}
