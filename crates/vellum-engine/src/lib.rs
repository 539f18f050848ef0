//! # Vellum Engine
//!
//! The message and signature engines of the Vellum OpenPGP engine.
//!
//! - [`message`]: session-key wrapping and authenticated encryption of
//!   message payloads (encrypt/decrypt)
//! - [`signature`]: cleartext signing and verification
//! - [`session`]: X25519 + HKDF-SHA256 session-key wrap primitive
//!
//! All operations are synchronous pure functions over their inputs.
//! Session keys and key-encryption keys live in zeroize-on-drop
//! buffers; decryption failures never yield partial plaintext.

pub mod cleartext;
pub mod error;
pub mod message;
pub mod session;
pub mod signature;

pub use error::EngineError;
pub use message::{decrypt, encrypt};
pub use signature::{sign, verify, VerificationResult};
