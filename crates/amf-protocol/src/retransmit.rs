//! Unacked-message tracking and resend (spec.md §6 "Ack, resend").
//!
//! The event loop owns real time; this module only tracks which sent
//! messages are still unacked and, given "now", which are due a resend.
//! It never sleeps or reads a clock itself.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::message::Message;
use crate::msg_id::MsgId;

/// One outstanding (unacked) sent message.
#[derive(Debug, Clone)]
struct Pending {
    message: Message,
    sent_at: Instant,
    attempts: u32,
}

/// Tracks unacked outgoing messages to one peer, in `msg_id` order.
#[derive(Debug, Default)]
pub struct Retransmitter {
    pending: BTreeMap<MsgId, Pending>,
}

impl Retransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sent(&mut self, message: Message, now: Instant) {
        let msg_id = message.msg_id;
        self.pending.insert(
            msg_id,
            Pending {
                message,
                sent_at: now,
                attempts: 0,
            },
        );
    }

    /// The peer acked up through `acked_msg_id`: drop everything at or
    /// below it.
    pub fn ack(&mut self, acked_msg_id: MsgId) {
        self.pending.retain(|id, _| *id > acked_msg_id);
    }

    /// Returns the messages due a resend at `now` given `timeout`, and
    /// bumps their attempt counters.
    pub fn due_for_resend(&mut self, now: Instant, timeout: Duration) -> Vec<Message> {
        let mut due = Vec::new();
        for pending in self.pending.values_mut() {
            if now.saturating_duration_since(pending.sent_at) >= timeout {
                pending.sent_at = now;
                pending.attempts += 1;
                due.push(pending.message.clone());
            }
        }
        due
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessagePayload;
    use amf_types::NodeId;

    fn msg(id: u64) -> Message {
        Message::new(
            NodeId::new(1),
            NodeId::new(2),
            MsgId(id),
            MessagePayload::Ack { acked_msg_id: MsgId(id) },
        )
    }

    #[test]
    fn ack_drops_everything_up_to_and_including() {
        let mut r = Retransmitter::new();
        let now = Instant::now();
        r.record_sent(msg(1), now);
        r.record_sent(msg(2), now);
        r.record_sent(msg(3), now);
        r.ack(MsgId(2));
        assert_eq!(r.pending_count(), 1);
    }

    #[test]
    fn resend_only_fires_after_timeout() {
        let mut r = Retransmitter::new();
        let now = Instant::now();
        r.record_sent(msg(1), now);
        assert!(r.due_for_resend(now, Duration::from_secs(5)).is_empty());
        let later = now + Duration::from_secs(6);
        assert_eq!(r.due_for_resend(later, Duration::from_secs(5)).len(), 1);
    }
}
