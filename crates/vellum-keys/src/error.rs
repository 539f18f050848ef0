//! Error types for key material operations.

use thiserror::Error;
use vellum_codec::CodecError;

/// Errors that can occur during key generation, protection, and
/// import/export.
#[derive(Debug, Error)]
pub enum KeyError {
    /// Passphrase decryption failed its authentication check.
    #[error("wrong passphrase")]
    WrongPassphrase,

    /// The operation needs plain secret material but the key is
    /// passphrase-encrypted.
    #[error("secret key is locked; unlock with the passphrase first")]
    KeyLocked,

    /// The key declares an algorithm this engine does not implement.
    #[error("unsupported algorithm id: 0x{0:02x}")]
    UnsupportedAlgorithm(u8),

    /// The key packet structure is invalid.
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// The key carries no secret material.
    #[error("key has no secret material")]
    MissingSecretKey,

    /// Key derivation failed (invalid Argon2 parameters).
    #[error("key derivation error: {0}")]
    KeyDerivationError(String),

    /// Armor or packet framing error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Result type for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;
