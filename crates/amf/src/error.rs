//! Daemon-level error type (spec.md §7 ties the AIS taxonomy to client
//! calls; this is the runtime's own I/O/config/protocol taxonomy).

use thiserror::Error;

pub type AmfResult<T> = Result<T, AmfError>;

#[derive(Debug, Error)]
pub enum AmfError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("protocol framing error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("msg_id violation: {0}")]
    MsgId(#[from] amf_protocol::MsgIdError),

    #[error("failed to bind {addr}: {source}")]
    BindFailed {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("unknown service group {0:?}")]
    UnknownSg(amf_types::SgId),

    #[error("peer closed the connection")]
    ConnectionClosed,

    #[error("daemon shutting down")]
    Shutdown,
}
