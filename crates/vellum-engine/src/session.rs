//! Session-key wrapping via X25519 key agreement.
//!
//! Each encrypted message carries one wrapped copy of its session key.
//! The sender performs ephemeral X25519 ECDH against the recipient's
//! encryption point, derives a key-encryption key with HKDF-SHA256, and
//! seals the session key with ChaCha20-Poly1305.
//!
//! Wrapped session key packet body:
//!
//! ```text
//! version(1)=3 | key id(8) | algo(1)=0x16 | ephemeral point(32) |
//! nonce(12) | sealed session key(48)
//! ```

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use x25519_dalek::{EphemeralSecret, PublicKey as XPublicKey};
use zeroize::Zeroizing;

use vellum_keys::{PublicKey, SecretScalars, ALGO_EDDSA};

use crate::error::{EngineError, Result};

/// Session key packet body version.
const SESSION_VERSION: u8 = 3;

/// HKDF domain-separation label for the key-encryption key.
const WRAP_INFO: &[u8] = b"vellum-v1 session key wrap";

/// Byte length of the wrapped session key packet body.
const WRAPPED_LEN: usize = 1 + 8 + 1 + 32 + 12 + 32 + 16;

/// Generate a fresh 256-bit session key from OS entropy.
pub fn generate_session_key() -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([0u8; 32]);
    rand::thread_rng().fill_bytes(key.as_mut());
    key
}

/// Derive the key-encryption key from an X25519 shared secret.
///
/// Salted with both public points for binding; the info string gives
/// domain separation.
fn derive_kek(
    shared: &x25519_dalek::SharedSecret,
    ephemeral: &XPublicKey,
    recipient: &XPublicKey,
) -> Zeroizing<[u8; 32]> {
    let mut salt = [0u8; 64];
    salt[..32].copy_from_slice(ephemeral.as_bytes());
    salt[32..].copy_from_slice(recipient.as_bytes());

    let hkdf = Hkdf::<Sha256>::new(Some(&salt), shared.as_bytes());
    let mut kek = Zeroizing::new([0u8; 32]);
    // 32 bytes is always a valid HKDF-SHA256 output length.
    hkdf.expand(WRAP_INFO, kek.as_mut())
        .unwrap_or_else(|_| unreachable!("32-byte HKDF output"));
    kek
}

/// Wrap a session key for a recipient, producing the session key
/// packet body.
///
/// The ephemeral secret is consumed by the key agreement and never
/// leaves this function.
pub fn wrap_session_key(session_key: &[u8; 32], recipient: &PublicKey) -> Result<Vec<u8>> {
    let ephemeral = EphemeralSecret::random_from_rng(rand::thread_rng());
    let ephemeral_public = XPublicKey::from(&ephemeral);
    let recipient_point = recipient.encryption_point();

    let shared = ephemeral.diffie_hellman(&recipient_point);
    let kek = derive_kek(&shared, &ephemeral_public, &recipient_point);

    let mut nonce = [0u8; 12];
    rand::thread_rng().fill_bytes(&mut nonce);

    let cipher = ChaCha20Poly1305::new_from_slice(kek.as_ref())
        .map_err(|e| EngineError::MalformedMessage(e.to_string()))?;
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), session_key.as_slice())
        .map_err(|_| EngineError::AuthenticationFailure)?;

    let mut body = Vec::with_capacity(WRAPPED_LEN);
    body.push(SESSION_VERSION);
    body.extend_from_slice(&recipient.fingerprint().key_id());
    body.push(ALGO_EDDSA);
    body.extend_from_slice(ephemeral_public.as_bytes());
    body.extend_from_slice(&nonce);
    body.extend_from_slice(&sealed);
    Ok(body)
}

/// Unwrap a session key packet body with the recipient's secret
/// scalars.
///
/// The key id in the packet is advisory (recipients may be anonymous);
/// the authentication tag is what proves the right key was used. Tag
/// mismatch fails with [`EngineError::AuthenticationFailure`].
pub fn unwrap_session_key(body: &[u8], scalars: &SecretScalars) -> Result<Zeroizing<[u8; 32]>> {
    if body.len() != WRAPPED_LEN {
        return Err(EngineError::MalformedMessage(format!(
            "session key packet must be {WRAPPED_LEN} bytes, got {}",
            body.len()
        )));
    }
    if body[0] != SESSION_VERSION {
        return Err(EngineError::UnsupportedAlgorithm(body[0]));
    }
    if body[9] != ALGO_EDDSA {
        return Err(EngineError::UnsupportedAlgorithm(body[9]));
    }

    let mut ephemeral_bytes = [0u8; 32];
    ephemeral_bytes.copy_from_slice(&body[10..42]);
    let ephemeral_public = XPublicKey::from(ephemeral_bytes);
    let nonce = &body[42..54];
    let sealed = &body[54..];

    let secret = scalars.encryption_secret();
    let recipient_point = XPublicKey::from(&secret);
    let shared = secret.diffie_hellman(&ephemeral_public);
    let kek = derive_kek(&shared, &ephemeral_public, &recipient_point);

    let cipher = ChaCha20Poly1305::new_from_slice(kek.as_ref())
        .map_err(|e| EngineError::MalformedMessage(e.to_string()))?;
    let opened = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| EngineError::AuthenticationFailure)?,
    );

    if opened.len() != 32 {
        return Err(EngineError::MalformedMessage(
            "unwrapped session key has wrong length".into(),
        ));
    }
    let mut key = Zeroizing::new([0u8; 32]);
    key.copy_from_slice(&opened);
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vellum_keys::{KeyPair, UserId};

    fn keypair() -> KeyPair {
        KeyPair::generate(vec![UserId::name_only("test")], None).unwrap()
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let kp = keypair();
        let session_key = generate_session_key();

        let body = wrap_session_key(&session_key, &kp.public).unwrap();
        let unwrapped = unwrap_session_key(&body, kp.scalars().unwrap()).unwrap();
        assert_eq!(unwrapped.as_ref(), session_key.as_ref());
    }

    #[test]
    fn test_wrap_is_nondeterministic() {
        let kp = keypair();
        let session_key = generate_session_key();
        let a = wrap_session_key(&session_key, &kp.public).unwrap();
        let b = wrap_session_key(&session_key, &kp.public).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unwrap_with_wrong_key_fails() {
        let kp = keypair();
        let other = keypair();
        let session_key = generate_session_key();

        let body = wrap_session_key(&session_key, &kp.public).unwrap();
        let err = unwrap_session_key(&body, other.scalars().unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::AuthenticationFailure));
    }

    #[test]
    fn test_tampered_wrap_fails() {
        let kp = keypair();
        let session_key = generate_session_key();
        let mut body = wrap_session_key(&session_key, &kp.public).unwrap();
        let last = body.len() - 1;
        body[last] ^= 0x01;
        assert!(matches!(
            unwrap_session_key(&body, kp.scalars().unwrap()),
            Err(EngineError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_bad_version_rejected() {
        let kp = keypair();
        let session_key = generate_session_key();
        let mut body = wrap_session_key(&session_key, &kp.public).unwrap();
        body[0] = 9;
        assert!(matches!(
            unwrap_session_key(&body, kp.scalars().unwrap()),
            Err(EngineError::UnsupportedAlgorithm(9))
        ));
    }

    #[test]
    fn test_truncated_body_rejected() {
        let kp = keypair();
        let session_key = generate_session_key();
        let body = wrap_session_key(&session_key, &kp.public).unwrap();
        assert!(matches!(
            unwrap_session_key(&body[..body.len() - 1], kp.scalars().unwrap()),
            Err(EngineError::MalformedMessage(_))
        ));
    }
}
