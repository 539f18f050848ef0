//! Property tests over the facade, driven by the testkit generators.

use proptest::prelude::*;
use vellum::codec::{decode_armor, encode_armor};
use vellum_testkit::generators;

proptest! {
    #[test]
    fn armor_roundtrips_for_generated_inputs(
        kind in generators::armor_kind(),
        body in generators::body(1024),
        header in generators::header_line(),
    ) {
        let armored = encode_armor(kind, &body, &[header.clone()]);
        let block = decode_armor(&armored).unwrap();
        prop_assert_eq!(block.kind, kind);
        prop_assert_eq!(block.body, body);
        prop_assert_eq!(block.header_lines, vec![header]);
    }

    #[test]
    fn policy_never_emits_version_line(
        policy in generators::metadata_policy(),
        body in generators::body(256),
    ) {
        let armored = encode_armor(vellum::ArmorKind::Message, &body, &policy.apply());
        prop_assert!(!armored.contains("Version:"));
        prop_assert!(armored.matches("Comment:").count() <= 1);
    }

    #[test]
    fn exported_keys_reimport_with_same_fingerprint(
        seed in any::<[u8; 32]>(),
        uid in generators::user_id(),
    ) {
        use vellum::keys::{export_public, import_public};

        let mut kp = vellum_testkit::keypair_from_seed(seed);
        kp.user_ids = vec![uid];
        let armored = export_public(&kp, &vellum::MetadataPolicy::new());
        let imported = import_public(&armored).unwrap();
        prop_assert_eq!(imported.fingerprint(), kp.fingerprint());
    }
}

proptest! {
    // Full sign/verify per case; keep the count modest.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn signed_plaintext_always_verifies(
        seed in any::<[u8; 32]>(),
        text in generators::plaintext(),
    ) {
        use vellum_engine::{sign, verify};

        let kp = vellum_testkit::keypair_from_seed(seed);
        let signed = sign(&text, &kp, &vellum::MetadataPolicy::suppressed()).unwrap();
        let result = verify(&signed, &kp.public).unwrap();
        prop_assert!(result.valid);
    }
}
