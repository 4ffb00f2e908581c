//! Error types for the encoding sniffer.

use thiserror::Error;

/// Result type alias for sniffing operations
pub type Result<T> = std::result::Result<T, SniffError>;

/// Errors surfaced to callers of the sniffing pipeline.
///
/// Only [`SniffError::ConflictingHint`] and [`SniffError::DecodeFailure`] ever come out of
/// [`EncodingSniffer::to_canonical`](crate::EncodingSniffer::to_canonical). Unresolvable labels
/// met inside the pipeline are logged and skipped instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SniffError {
    /// A transport encoding was supplied together with already-decoded text
    #[error("Transport encoding {0:?} supplied for already-decoded text")]
    ConflictingHint(String),

    /// The chosen codec rejected the input bytes
    #[error("Input is not valid {encoding}")]
    DecodeFailure {
        /// Canonical name of the codec that failed
        encoding: &'static str,
    },

    /// An encoding label is not in the alias table
    #[error("Unsupported encoding label: {0:?}")]
    UnsupportedLabel(String),
}

/// Why a cursor operation could not complete.
///
/// These never leave the prescan: every handler turns them into "stop scanning".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// No bytes remain
    #[error("cursor exhausted")]
    Exhausted,

    /// The cursor is before the first byte or past the last one
    #[error("cursor position out of range")]
    OutOfRange,

    /// A sought byte sequence does not occur in the rest of the buffer
    #[error("byte sequence not found")]
    NotFound,
}
