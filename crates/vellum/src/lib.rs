//! # Vellum
//!
//! A compact OpenPGP-style engine: armored keys, authenticated
//! encryption, and cleartext signatures over modern curves.
//!
//! ## Overview
//!
//! Vellum provides a string-in, string-out API for:
//!
//! - **Keys**: Curve25519 keypairs with optional passphrase sealing,
//!   exported as ASCII-armored blocks
//! - **Messages**: authenticated encryption to a recipient's public
//!   key; decryption fails closed on any tampering
//! - **Signatures**: cleartext signed messages that survive
//!   line-ending and whitespace mangling in transit
//! - **Metadata**: a policy controlling the armor `Comment:` header;
//!   no `Version:` line is ever emitted
//!
//! ## Usage
//!
//! ```rust
//! use vellum::{Vellum, keys::Argon2Params};
//!
//! let engine = Vellum::new().kdf_params(Argon2Params::fast_insecure());
//!
//! let alice = engine.generate_key("Alice", "alice@example.org", "hunter2").unwrap();
//!
//! let encrypted = engine.encrypt_message("hello", &alice.public_armored).unwrap();
//! let decrypted = engine
//!     .decrypt_message(&encrypted, &alice.secret_armored, "hunter2")
//!     .unwrap();
//! assert_eq!(decrypted, "hello");
//!
//! let signed = engine.sign_message("hello", &alice.secret_armored, "hunter2").unwrap();
//! let result = engine.verify_message(&signed, &alice.public_armored).unwrap();
//! assert!(result.valid);
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `vellum::codec` - armor, packet framing, metadata policy
//! - `vellum::keys` - keypairs, fingerprints, passphrase protection

pub mod engine;
pub mod error;

// Re-export component crates
pub use vellum_codec as codec;
pub use vellum_keys as keys;

// Re-export main types for convenience
pub use engine::{GeneratedKey, Vellum};
pub use error::{Result, VellumError};

// Re-export commonly used component types
pub use vellum_codec::{ArmorKind, MetadataPolicy, DEFAULT_COMMENT};
pub use vellum_engine::{EngineError, VerificationResult};
pub use vellum_keys::{Argon2Params, Fingerprint, KeyError, KeyPair, UserId};
