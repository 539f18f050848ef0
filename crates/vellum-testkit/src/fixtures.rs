//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Fixtures use the cheap
//! Argon2 parameters so passphrase-sealed keys do not dominate test
//! runtime.

use vellum::{GeneratedKey, MetadataPolicy, Vellum};
use vellum_keys::{Argon2Params, KeyPair, SecretKeyMaterial, SecretScalars, UserId};

/// Alice's passphrase in every fixture.
pub const ALICE_PASSPHRASE: &str = "correct horse battery staple";

/// A test fixture with an engine and two parties.
///
/// Alice's private key is sealed under [`ALICE_PASSPHRASE`]; Bob's is
/// plain.
pub struct TestFixture {
    pub engine: Vellum,
    pub alice: GeneratedKey,
    pub bob: GeneratedKey,
}

impl TestFixture {
    /// Create a fixture with the default metadata policy.
    pub fn new() -> Self {
        Self::with_policy(MetadataPolicy::new())
    }

    /// Create a fixture with an explicit metadata policy.
    pub fn with_policy(policy: MetadataPolicy) -> Self {
        let engine = Vellum::with_policy(policy).kdf_params(Argon2Params::fast_insecure());
        let alice = engine
            .generate_key("Alice", "alice@example.org", ALICE_PASSPHRASE)
            .expect("generate alice");
        let bob = engine
            .generate_key("Bob", "bob@example.org", "")
            .expect("generate bob");
        Self {
            engine,
            alice,
            bob,
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A plain keypair derived deterministically from a seed.
///
/// The signing scalar is the seed itself; the encryption scalar is the
/// seed with its first byte flipped so the two scalars differ.
pub fn keypair_from_seed(seed: [u8; 32]) -> KeyPair {
    let mut encryption = seed;
    encryption[0] ^= 0xFF;
    let scalars = SecretScalars::from_parts(seed, encryption);
    let public = scalars.derive_public(1_700_000_000);
    KeyPair {
        public,
        user_ids: vec![UserId::name_only("seeded")],
        secret: Some(SecretKeyMaterial::Plain(scalars)),
    }
}
