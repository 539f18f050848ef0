//! Proptest generators for property-based testing.

use proptest::prelude::*;

use vellum_codec::{ArmorKind, MetadataPolicy};
use vellum_keys::{KeyPair, UserId};

use crate::fixtures::keypair_from_seed;

/// Generate a deterministic plain keypair.
pub fn keypair() -> impl Strategy<Value = KeyPair> {
    any::<[u8; 32]>().prop_map(keypair_from_seed)
}

/// Generate binary packet/armor body bytes up to `max_len`.
pub fn body(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an armor kind.
pub fn armor_kind() -> impl Strategy<Value = ArmorKind> {
    prop_oneof![
        Just(ArmorKind::PublicKey),
        Just(ArmorKind::PrivateKey),
        Just(ArmorKind::Message),
        Just(ArmorKind::Signature),
    ]
}

/// Generate an armor header line (printable tag and value, no colons
/// or line breaks).
pub fn header_line() -> impl Strategy<Value = (String, String)> {
    ("[A-Za-z][A-Za-z0-9-]{0,15}", "[ -9;-~]{0,40}")
        .prop_map(|(tag, value)| (tag, value.trim().to_string()))
}

/// Generate a user identity; about one in five is anonymous.
pub fn user_id() -> impl Strategy<Value = UserId> {
    let name = prop::option::of("[A-Za-z][A-Za-z .'-]{0,30}".prop_map(|s| s.trim().to_string()));
    let email = prop::option::of("[a-z][a-z0-9.]{0,15}@[a-z][a-z0-9]{0,10}\\.[a-z]{2,4}");
    (name, email).prop_map(|(name, email)| UserId {
        name: name.filter(|n| !n.is_empty()),
        email,
    })
}

/// Generate message plaintext, including embedded newlines and
/// dash-prefixed lines.
pub fn plaintext() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[ -~]{0,60}",
            Just("-----BEGIN PGP MESSAGE-----".to_string()),
            Just("- dashed".to_string()),
            Just(String::new()),
        ],
        1..8,
    )
    .prop_map(|lines| lines.join("\n"))
}

/// Generate a metadata policy.
pub fn metadata_policy() -> impl Strategy<Value = MetadataPolicy> {
    prop_oneof![
        Just(MetadataPolicy::new()),
        Just(MetadataPolicy::suppressed()),
        "[ -9;-~]{1,30}".prop_map(|c| MetadataPolicy::with_comment(c.trim().to_string())),
    ]
}
