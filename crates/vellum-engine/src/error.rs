//! Error types for the message and signature engines.

use thiserror::Error;
use vellum_codec::CodecError;
use vellum_keys::KeyError;

/// Errors that can occur while encrypting, decrypting, signing, or
/// verifying.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The payload's integrity tag did not verify. No plaintext bytes
    /// are returned, even partial ones.
    #[error("authentication failure: message integrity check failed")]
    AuthenticationFailure,

    /// The message declares an algorithm or version this engine does
    /// not implement.
    #[error("unsupported algorithm id: 0x{0:02x}")]
    UnsupportedAlgorithm(u8),

    /// The signature carries no issuer fingerprint to verify against.
    #[error("signature has no issuer fingerprint")]
    UnknownIssuer,

    /// The input is not a cleartext signed message.
    #[error("not a cleartext signed message: {0}")]
    NotSignedMessage(String),

    /// The message packet structure is invalid.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Key material error.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Armor or packet framing error.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
