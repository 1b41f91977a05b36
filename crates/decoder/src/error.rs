//! Error types for the frame decoder
//!
//! Every error is fatal: once `process` reports one, the decoder is
//! permanently failed and the connection it served should be closed.

use std::fmt;
use thiserror::Error;

/// Boxed error returned by a [`FrameHandler`](crate::FrameHandler).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Frame decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// CONTINUATION frame without a fragmented message in progress
    #[error("Unexpected continuation frame: no fragmented message in progress")]
    UnexpectedContinuation,

    /// New data frame while a fragmented message is still open
    #[error("Expected continuation frame, got data opcode 0x{opcode:X}")]
    ExpectedContinuation { opcode: u8 },

    /// Control frame with FIN cleared
    #[error("Control frame (opcode 0x{opcode:X}) must not be fragmented")]
    FragmentedControlFrame { opcode: u8 },

    /// 64-bit extended payload length with its most significant bit set
    #[error("Extended payload length 0x{length:016X} has its most significant bit set")]
    LengthMsbSet { length: u64 },

    /// RSV bits set while `reject_reserved_bits` is enabled
    #[error("Reserved bits 0b{bits:03b} set without a negotiated extension")]
    ReservedBitsSet { bits: u8 },

    /// Opcode outside the RFC 6455 set while `reject_unknown_opcodes` is enabled
    #[error("Unknown opcode 0x{opcode:X}")]
    UnknownOpcode { opcode: u8 },

    /// Control frame payload above the configured maximum
    #[error("Control frame payload of {length} bytes exceeds maximum {max}")]
    ControlPayloadTooLarge { length: u64, max: u64 },

    /// Masking bit does not match the configured masking policy
    #[error("Masking violation: {message}")]
    Masking { message: &'static str },

    /// A frame handler rejected a header or payload chunk
    #[error("Frame handler failed: {0}")]
    Callback(#[source] BoxError),

    /// The decoder already failed and cannot make further progress
    #[error("Decoder is in a failed state and must be discarded")]
    Failed,
}

/// Broad classes of [`DecodeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Continuation/control fragmentation rules were broken
    Fragmentation,
    /// A reserved bit of the length encoding was set
    ReservedBit,
    /// A handler signaled failure
    Callback,
    /// An opt-in [`DecoderConfig`](crate::DecoderConfig) check failed
    Policy,
    /// The decoder was used after failing
    Failed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fragmentation => write!(f, "fragmentation"),
            Self::ReservedBit => write!(f, "reserved_bit"),
            Self::Callback => write!(f, "callback"),
            Self::Policy => write!(f, "policy"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result type alias for decoder operations
pub type DecodeResult<T> = Result<T, DecodeError>;

impl DecodeError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedContinuation
            | Self::ExpectedContinuation { .. }
            | Self::FragmentedControlFrame { .. } => ErrorKind::Fragmentation,
            Self::LengthMsbSet { .. } => ErrorKind::ReservedBit,
            Self::ReservedBitsSet { .. }
            | Self::UnknownOpcode { .. }
            | Self::ControlPayloadTooLarge { .. }
            | Self::Masking { .. } => ErrorKind::Policy,
            Self::Callback(_) => ErrorKind::Callback,
            Self::Failed => ErrorKind::Failed,
        }
    }

    /// Wrap a handler error
    pub fn callback(err: impl Into<BoxError>) -> Self {
        Self::Callback(err.into())
    }

    /// RFC 6455 close code a peer should receive for this error, if any.
    ///
    /// Handler failures and reuse-after-failure are local conditions and
    /// have no wire-level close code.
    pub fn close_code(&self) -> Option<u16> {
        match self.kind() {
            ErrorKind::Fragmentation | ErrorKind::ReservedBit | ErrorKind::Policy => Some(1002),
            ErrorKind::Callback | ErrorKind::Failed => None,
        }
    }
}
