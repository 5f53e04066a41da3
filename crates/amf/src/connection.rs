//! Mio connection state for one D<->ND TCP link (spec.md §6).
//!
//! Grounded on the teacher's connection-buffer split (read/write
//! `BytesMut`, non-blocking read/write loops draining until `WouldBlock`)
//! but framed with [`crate::codec`] instead of a binary wire crate.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::Instant;

use bytes::BytesMut;
use mio::net::TcpStream;
use mio::{Interest, Token};

use amf_protocol::Message;

use crate::codec;

/// One peer connection (director side talking to a node director, or
/// vice versa).
pub struct Connection {
    pub token: Token,
    pub peer: amf_types::NodeId,
    pub stream: TcpStream,
    read_buf: BytesMut,
    write_buf: BytesMut,
    pub closing: bool,
    pub last_activity: Instant,
}

impl Connection {
    pub fn new(token: Token, peer: amf_types::NodeId, stream: TcpStream) -> Self {
        Self {
            token,
            peer,
            stream,
            read_buf: BytesMut::with_capacity(4096),
            write_buf: BytesMut::with_capacity(4096),
            closing: false,
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Drains the socket into the read buffer. Returns `false` once the
    /// peer has closed its write half.
    pub fn read_ready(&mut self) -> io::Result<bool> {
        let mut scratch = [0u8; 4096];
        loop {
            match self.stream.read(&mut scratch) {
                Ok(0) => return Ok(false),
                Ok(n) => self.read_buf.extend_from_slice(&scratch[..n]),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(true),
                Err(e) => return Err(e),
            }
        }
    }

    /// Pulls every complete frame currently buffered.
    pub fn drain_messages(&mut self) -> serde_json::Result<VecDeque<Message>> {
        let mut out = VecDeque::new();
        while let Some(message) = codec::decode(&mut self.read_buf)? {
            out.push_back(message);
        }
        Ok(out)
    }

    pub fn queue(&mut self, message: &Message) -> serde_json::Result<()> {
        codec::encode(message, &mut self.write_buf)
    }

    /// Flushes the write buffer. Returns `true` once fully drained.
    pub fn write_ready(&mut self) -> io::Result<bool> {
        while !self.write_buf.is_empty() {
            match self.stream.write(&self.write_buf) {
                Ok(0) => return Err(io::Error::new(io::ErrorKind::WriteZero, "write returned 0")),
                Ok(n) => {
                    let _ = self.write_buf.split_to(n);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(false),
                Err(e) => return Err(e),
            }
        }
        Ok(true)
    }

    pub fn interest(&self) -> Interest {
        if self.write_buf.is_empty() {
            Interest::READABLE
        } else {
            Interest::READABLE | Interest::WRITABLE
        }
    }
}
