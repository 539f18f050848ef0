//! Error types for the Vellum codec.

use thiserror::Error;

/// Errors that can occur while encoding or decoding armor and packets.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Armor structure is invalid: bad markers, bad base64, or CRC mismatch.
    #[error("malformed armor: {0}")]
    MalformedArmor(String),

    /// A packet declared more bytes than remain in the input.
    #[error("truncated packet: declared {declared} bytes, {remaining} remaining")]
    TruncatedPacket { declared: usize, remaining: usize },

    /// The packet tag byte is not one this engine understands.
    ///
    /// Treated as fatal: security-relevant content must not be silently
    /// skipped.
    #[error("unknown packet tag: {0}")]
    UnknownPacketTag(u8),

    /// The packet header or body violates the expected framing.
    #[error("malformed packet: {0}")]
    MalformedPacket(String),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
