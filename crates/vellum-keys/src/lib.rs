//! # Vellum Keys
//!
//! Key material for the Vellum OpenPGP engine: keypair generation,
//! fingerprint computation, passphrase protection of secret scalars,
//! and armored import/export of key packets.
//!
//! ## Key model
//!
//! A [`KeyPair`] is a dual-key Curve25519 primary key: an Ed25519
//! signing scalar and an independent X25519 encryption scalar, carried
//! together in one key packet. The [`Fingerprint`] is a SHA-256 digest
//! of the public key packet body (version, creation time, algorithm id,
//! public points) and is a pure function of those inputs.
//!
//! Secret scalars live in [`SecretScalars`], which is zeroized on drop
//! and never cloned or printed. Passphrase protection is Argon2id over
//! a random salt followed by ChaCha20-Poly1305 over the scalar block.

pub mod error;
pub mod fingerprint;
pub mod keypair;
pub mod protect;
pub mod userid;
pub mod wire;

pub use error::KeyError;
pub use fingerprint::Fingerprint;
pub use keypair::{KeyPair, PublicKey, SecretKeyMaterial, SecretScalars};
pub use protect::Argon2Params;
pub use userid::UserId;
pub use wire::{export_public, export_secret, import_public, import_secret};

/// Key packet version byte.
pub const KEY_VERSION: u8 = 4;

/// Public-key algorithm id: EdDSA (RFC 4880bis).
pub const ALGO_EDDSA: u8 = 0x16;

/// Hash algorithm id: SHA-256.
pub const HASH_SHA256: u8 = 0x08;
