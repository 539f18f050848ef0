//! # Vellum Testkit
//!
//! Testing utilities for Vellum.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: pre-built engines and parties for integration tests
//! - **Generators**: proptest strategies for property-based testing
//! - **Golden vectors**: pinned armor text and CRC24 known answers
//!
//! ## Test Fixtures
//!
//! Quickly set up a two-party scenario:
//!
//! ```rust
//! use vellum_testkit::fixtures::{TestFixture, ALICE_PASSPHRASE};
//!
//! let fixture = TestFixture::new();
//! let encrypted = fixture
//!     .engine
//!     .encrypt_message("hello", &fixture.alice.public_armored)
//!     .unwrap();
//! let decrypted = fixture
//!     .engine
//!     .decrypt_message(&encrypted, &fixture.alice.secret_armored, ALICE_PASSPHRASE)
//!     .unwrap();
//! assert_eq!(decrypted, "hello");
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use vellum_testkit::generators;
//!
//! proptest! {
//!     #[test]
//!     fn armor_roundtrips(kind in generators::armor_kind(),
//!                         body in generators::body(512)) {
//!         let armored = vellum_codec::encode_armor(kind, &body, &[]);
//!         let block = vellum_codec::decode_armor(&armored).unwrap();
//!         prop_assert_eq!(block.body, body);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{keypair_from_seed, TestFixture, ALICE_PASSPHRASE};
