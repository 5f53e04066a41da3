//! The SAF AIS error taxonomy (spec.md §7), shared by every crate that
//! surfaces a public API boundary.

use thiserror::Error;

/// Semantic error kinds returned across the AMF and IMMA-OI public
/// boundaries. Named after the `SA_AIS_ERR_*` family without reproducing
/// the C enum values verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AisError {
    #[error("invalid parameter")]
    InvalidParam,
    #[error("bad handle")]
    BadHandle,
    #[error("object does not exist")]
    NotExist,
    #[error("object already exists")]
    Exist,
    #[error("out of memory")]
    NoMemory,
    #[error("insufficient resources")]
    NoResources,
    #[error("operation not permitted in current state")]
    BadOperation,
    #[error("try again")]
    TryAgain,
    #[error("operation timed out")]
    Timeout,
    #[error("operation interrupted")]
    Interrupt,
    #[error("internal library error")]
    Library,
    #[error("version mismatch")]
    Version,
    #[error("operation failed")]
    FailedOperation,
    #[error("operation failed but repair is in progress")]
    RepairPending,
    #[error("operation not supported")]
    NotSupported,
    #[error("operation is a no-op")]
    NoOp,
}

/// Result alias matching the public AIS API return convention.
pub type AisResult<T> = Result<T, AisError>;
