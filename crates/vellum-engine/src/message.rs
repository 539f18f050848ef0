//! Message encryption and decryption.
//!
//! An encrypted message is two packets: a wrapped session key and an
//! integrity-protected data packet. The payload inside the envelope is
//! a literal data packet, sealed with ChaCha20-Poly1305 under the
//! session key. Plain CFB without integrity protection is deliberately
//! not implemented.
//!
//! Encrypted data packet body:
//!
//! ```text
//! version(1)=1 | nonce(12) | AEAD ciphertext of the literal packet
//! ```

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use rand::RngCore;
use zeroize::Zeroizing;

use vellum_codec::{
    decode_armor, decode_packets, encode_armor, encode_packet, ArmorKind, MetadataPolicy, Packet,
};
use vellum_keys::{KeyPair, PublicKey};

use crate::error::{EngineError, Result};
use crate::session::{generate_session_key, unwrap_session_key, wrap_session_key};

/// Encrypted data packet body version.
const ENVELOPE_VERSION: u8 = 1;

/// Build a literal data packet body for binary data.
fn literal_body(data: &[u8]) -> Vec<u8> {
    // format 'b', empty filename, zero date, then the data
    let mut body = Vec::with_capacity(data.len() + 6);
    body.push(b'b');
    body.push(0);
    body.extend_from_slice(&0u32.to_be_bytes());
    body.extend_from_slice(data);
    body
}

/// Extract the data from a literal data packet body.
fn parse_literal_body(body: &[u8]) -> Result<Vec<u8>> {
    if body.len() < 6 {
        return Err(EngineError::MalformedMessage(
            "literal data packet too short".into(),
        ));
    }
    let filename_len = body[1] as usize;
    let data_start = 2 + filename_len + 4;
    if body.len() < data_start {
        return Err(EngineError::MalformedMessage(
            "literal data packet header exceeds body".into(),
        ));
    }
    Ok(body[data_start..].to_vec())
}

/// Encrypt `plaintext` to a recipient's public key.
///
/// A fresh random session key is drawn per call, so two encryptions of
/// identical plaintext to the same recipient yield different
/// ciphertext. Returns the armored `PGP MESSAGE` block with the
/// metadata policy applied to its headers.
pub fn encrypt(
    plaintext: &[u8],
    recipient: &PublicKey,
    policy: &MetadataPolicy,
) -> Result<String> {
    let session_key = generate_session_key();
    let session_packet = Packet::SessionKey(wrap_session_key(&session_key, recipient)?);

    let literal = encode_packet(&Packet::LiteralData(literal_body(plaintext)));

    let mut nonce = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut nonce);
    let cipher = ChaCha20Poly1305::new_from_slice(session_key.as_ref())
        .map_err(|e| EngineError::MalformedMessage(e.to_string()))?;
    let sealed = cipher
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: &literal,
                aad: &[ENVELOPE_VERSION],
            },
        )
        .map_err(|_| EngineError::AuthenticationFailure)?;

    let mut envelope = Vec::with_capacity(sealed.len() + 13);
    envelope.push(ENVELOPE_VERSION);
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&sealed);

    let body = vellum_codec::encode_packets(&[session_packet, Packet::EncryptedData(envelope)]);
    Ok(encode_armor(ArmorKind::Message, &body, &policy.apply()))
}

/// Decrypt an armored message with the recipient's keypair.
///
/// The secret material must be in plain form; unlock a
/// passphrase-sealed key first. Fails with
/// [`EngineError::AuthenticationFailure`] if the integrity tag does
/// not verify; no plaintext is returned in that case.
pub fn decrypt(armored: &str, keypair: &KeyPair) -> Result<Vec<u8>> {
    let block = decode_armor(armored)?;
    if block.kind != ArmorKind::Message {
        return Err(EngineError::MalformedMessage(format!(
            "expected a message block, got {:?}",
            block.kind
        )));
    }

    let packets = decode_packets(&block.body)?;
    let session_body = packets
        .iter()
        .find_map(|p| match p {
            Packet::SessionKey(body) => Some(body.as_slice()),
            _ => None,
        })
        .ok_or_else(|| EngineError::MalformedMessage("no session key packet".into()))?;
    let envelope = packets
        .iter()
        .find_map(|p| match p {
            Packet::EncryptedData(body) => Some(body.as_slice()),
            _ => None,
        })
        .ok_or_else(|| EngineError::MalformedMessage("no encrypted data packet".into()))?;

    let scalars = keypair.scalars()?;
    let session_key = unwrap_session_key(session_body, scalars)?;

    if envelope.len() < 13 {
        return Err(EngineError::MalformedMessage(
            "encrypted data packet too short".into(),
        ));
    }
    if envelope[0] != ENVELOPE_VERSION {
        return Err(EngineError::UnsupportedAlgorithm(envelope[0]));
    }
    let nonce = &envelope[1..13];
    let sealed = &envelope[13..];

    let cipher = ChaCha20Poly1305::new_from_slice(session_key.as_ref())
        .map_err(|e| EngineError::MalformedMessage(e.to_string()))?;
    let literal_bytes = Zeroizing::new(
        cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: &[ENVELOPE_VERSION],
                },
            )
            .map_err(|_| EngineError::AuthenticationFailure)?,
    );

    let inner = decode_packets(&literal_bytes)?;
    match inner.as_slice() {
        [Packet::LiteralData(body)] => parse_literal_body(body),
        _ => Err(EngineError::MalformedMessage(
            "envelope does not contain a single literal data packet".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_codec::CodecError;
    use vellum_keys::{KeyError, UserId};

    fn keypair() -> KeyPair {
        KeyPair::generate(vec![UserId::name_only("test")], None).unwrap()
    }

    fn policy() -> MetadataPolicy {
        MetadataPolicy::suppressed()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let kp = keypair();
        let armored = encrypt(b"hello", &kp.public, &policy()).unwrap();
        assert!(armored.starts_with("-----BEGIN PGP MESSAGE-----"));
        assert_eq!(decrypt(&armored, &kp).unwrap(), b"hello");
    }

    #[test]
    fn test_empty_and_binary_plaintexts() {
        let kp = keypair();
        for plaintext in [&b""[..], &[0u8, 255, 10, 13, 0][..]] {
            let armored = encrypt(plaintext, &kp.public, &policy()).unwrap();
            assert_eq!(decrypt(&armored, &kp).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_encryption_is_nondeterministic() {
        let kp = keypair();
        let a = encrypt(b"same", &kp.public, &policy()).unwrap();
        let b = encrypt(b"same", &kp.public, &policy()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_wrong_key_fails_authentication() {
        let kp = keypair();
        let other = keypair();
        let armored = encrypt(b"secret", &kp.public, &policy()).unwrap();
        assert!(matches!(
            decrypt(&armored, &other),
            Err(EngineError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_tampered_payload_fails_authentication() {
        let kp = keypair();
        let armored = encrypt(b"attack at dawn", &kp.public, &policy()).unwrap();
        let block = decode_armor(&armored).unwrap();

        // Flip one byte inside the sealed payload (last packet byte is
        // deep in the AEAD ciphertext).
        let mut body = block.body.clone();
        let last = body.len() - 1;
        body[last] ^= 0x01;
        let tampered = encode_armor(ArmorKind::Message, &body, &[]);

        match decrypt(&tampered, &kp) {
            Err(EngineError::AuthenticationFailure) => {}
            other => panic!("expected AuthenticationFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_locked_key_rejected() {
        use vellum_keys::Argon2Params;
        let kp = KeyPair::generate_with_params(
            vec![],
            Some("pw"),
            &Argon2Params::fast_insecure(),
        )
        .unwrap();
        let armored = encrypt(b"x", &kp.public, &policy()).unwrap();
        assert!(matches!(
            decrypt(&armored, &kp),
            Err(EngineError::Key(KeyError::KeyLocked))
        ));
    }

    #[test]
    fn test_non_message_armor_rejected() {
        let kp = keypair();
        let key_armor = vellum_keys::export_public(&kp, &policy());
        assert!(matches!(
            decrypt(&key_armor, &kp),
            Err(EngineError::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_corrupted_armor_rejected() {
        let kp = keypair();
        let armored = encrypt(b"x", &kp.public, &policy()).unwrap();
        let broken = armored.replace("-----END PGP MESSAGE-----", "");
        assert!(matches!(
            decrypt(&broken, &kp),
            Err(EngineError::Codec(CodecError::MalformedArmor(_)))
        ));
    }

    #[test]
    fn test_literal_body_roundtrip() {
        let data = b"some payload";
        assert_eq!(parse_literal_body(&literal_body(data)).unwrap(), data);
    }
}
