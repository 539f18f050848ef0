//! Error types for the Vellum facade.

use thiserror::Error;
use vellum_codec::CodecError;
use vellum_engine::EngineError;
use vellum_keys::KeyError;

/// Errors that can occur during Vellum operations.
///
/// Component errors pass through transparently, so callers can match on
/// the underlying kind (wrong passphrase, authentication failure,
/// malformed armor) without unwrapping layers.
#[derive(Debug, Error)]
pub enum VellumError {
    /// A required input was blank.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    /// Key material error.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Encryption, decryption, signing, or verification error.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Armor or packet framing error.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Result type for Vellum operations.
pub type Result<T> = std::result::Result<T, VellumError>;
