//! Wire framing for [`amf_protocol::Message`] (spec.md §2: "does not
//! prescribe an on-wire format beyond the invariants listed in §6").
//!
//! A 4-byte big-endian length prefix followed by a JSON-encoded
//! [`amf_protocol::Message`]. JSON keeps the frame human-inspectable on
//! the wire during development; nothing here depends on the encoding
//! beyond length-prefixing, so swapping it for a binary codec later is a
//! one-file change.

use bytes::{Buf, BufMut, BytesMut};

use amf_protocol::Message;

pub const LENGTH_PREFIX_SIZE: usize = 4;
const MAX_FRAME_LEN: u32 = 1 << 20;

/// Attempts to decode one complete frame from `buf`, consuming it on
/// success. Returns `Ok(None)` if `buf` doesn't yet hold a full frame.
pub fn decode(buf: &mut BytesMut) -> serde_json::Result<Option<Message>> {
    if buf.len() < LENGTH_PREFIX_SIZE {
        return Ok(None);
    }
    let len = u32::from_be_bytes(buf[..LENGTH_PREFIX_SIZE].try_into().unwrap());
    let total = LENGTH_PREFIX_SIZE + len as usize;
    if len > MAX_FRAME_LEN || buf.len() < total {
        return Ok(None);
    }

    buf.advance(LENGTH_PREFIX_SIZE);
    let payload = buf.split_to(len as usize);
    let message = serde_json::from_slice(&payload)?;
    Ok(Some(message))
}

/// Encodes `message` onto `out`, prefixed with its length.
pub fn encode(message: &Message, out: &mut BytesMut) -> serde_json::Result<()> {
    let payload = serde_json::to_vec(message)?;
    out.put_u32(payload.len() as u32);
    out.put_slice(&payload);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use amf_protocol::{MessagePayload, MsgId};
    use amf_types::NodeId;

    fn sample() -> Message {
        Message::new(
            NodeId::new(1),
            NodeId::new(2),
            MsgId(7),
            MessagePayload::Ack { acked_msg_id: MsgId(6) },
        )
    }

    #[test]
    fn round_trips_a_single_frame() {
        let mut buf = BytesMut::new();
        encode(&sample(), &mut buf).unwrap();
        let decoded = decode(&mut buf).unwrap().unwrap();
        assert_eq!(decoded, sample());
        assert!(buf.is_empty());
    }

    #[test]
    fn partial_frame_returns_none_without_consuming() {
        let mut full = BytesMut::new();
        encode(&sample(), &mut full).unwrap();
        let mut partial = BytesMut::from(&full[..full.len() - 1]);
        assert!(decode(&mut partial).unwrap().is_none());
    }

    #[test]
    fn two_frames_back_to_back_decode_independently() {
        let mut buf = BytesMut::new();
        encode(&sample(), &mut buf).unwrap();
        encode(&sample(), &mut buf).unwrap();
        assert!(decode(&mut buf).unwrap().is_some());
        assert!(decode(&mut buf).unwrap().is_some());
        assert!(decode(&mut buf).unwrap().is_none());
    }
}
