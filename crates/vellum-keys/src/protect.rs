//! Passphrase protection of secret scalars.
//!
//! Argon2id stretches the passphrase with a random 16-byte salt into a
//! 256-bit key, which seals the 64-byte scalar block with
//! ChaCha20-Poly1305. A wrong passphrase fails the authentication tag
//! check; no partial plaintext is ever produced.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{KeyError, Result};
use crate::keypair::SecretScalars;

/// Salt length for the passphrase KDF.
pub const SALT_LEN: usize = 16;

/// Nonce length for ChaCha20-Poly1305.
pub const NONCE_LEN: usize = 12;

/// Configurable Argon2id parameters.
///
/// The defaults (64 MiB, 3 passes, 1 lane) follow RFC 9106's second
/// recommended option. Tests use much lighter parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub m_cost: u32,
    /// Number of passes.
    pub t_cost: u32,
    /// Degree of parallelism.
    pub p_cost: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            m_cost: 65_536, // 64 MiB
            t_cost: 3,
            p_cost: 1,
        }
    }
}

impl Argon2Params {
    /// Light parameters for fast tests. Not for production keys.
    pub fn fast_insecure() -> Self {
        Self {
            m_cost: 256,
            t_cost: 1,
            p_cost: 1,
        }
    }
}

/// Derive the 256-bit protection key from a passphrase and salt.
fn derive_key(passphrase: &str, salt: &[u8], params: &Argon2Params) -> Result<Zeroizing<[u8; 32]>> {
    let argon2_params = argon2::Params::new(params.m_cost, params.t_cost, params.p_cost, Some(32))
        .map_err(|e| KeyError::KeyDerivationError(format!("invalid Argon2 parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut output = Zeroizing::new([0u8; 32]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, output.as_mut())
        .map_err(|e| KeyError::KeyDerivationError(format!("Argon2id derivation failed: {e}")))?;
    Ok(output)
}

/// Encrypt secret scalars under a passphrase.
///
/// Returns `(salt, nonce, ciphertext)`; the ciphertext includes the
/// 16-byte Poly1305 tag. Fresh salt and nonce are drawn per call.
pub fn seal_scalars(
    scalars: &SecretScalars,
    passphrase: &str,
    params: &Argon2Params,
) -> Result<([u8; SALT_LEN], [u8; NONCE_LEN], Vec<u8>)> {
    let mut rng = rand::thread_rng();
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt, params)?;
    let cipher = ChaCha20Poly1305::new_from_slice(key.as_ref())
        .map_err(|e| KeyError::KeyDerivationError(e.to_string()))?;

    let block = Zeroizing::new(scalars.to_block());
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), block.as_ref() as &[u8])
        .map_err(|e| KeyError::KeyDerivationError(format!("sealing failed: {e}")))?;

    Ok((salt, nonce, ciphertext))
}

/// Decrypt secret scalars with a passphrase.
///
/// Fails with [`KeyError::WrongPassphrase`] on authentication-tag
/// mismatch; never partially decrypts.
pub fn open_scalars(
    ciphertext: &[u8],
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
    passphrase: &str,
    params: &Argon2Params,
) -> Result<SecretScalars> {
    let key = derive_key(passphrase, salt, params)?;
    let cipher = ChaCha20Poly1305::new_from_slice(key.as_ref())
        .map_err(|e| KeyError::KeyDerivationError(e.to_string()))?;

    let block = Zeroizing::new(
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| KeyError::WrongPassphrase)?,
    );
    SecretScalars::from_block(&block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalars() -> SecretScalars {
        SecretScalars::from_parts([0x11; 32], [0x22; 32])
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let params = Argon2Params::fast_insecure();
        let (salt, nonce, ct) = seal_scalars(&scalars(), "hunter2", &params).unwrap();
        let recovered = open_scalars(&ct, &salt, &nonce, "hunter2", &params).unwrap();
        assert_eq!(recovered.to_block(), scalars().to_block());
    }

    #[test]
    fn test_wrong_passphrase_fails() {
        let params = Argon2Params::fast_insecure();
        let (salt, nonce, ct) = seal_scalars(&scalars(), "correct", &params).unwrap();
        let err = open_scalars(&ct, &salt, &nonce, "wrong", &params).unwrap_err();
        assert!(matches!(err, KeyError::WrongPassphrase));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let params = Argon2Params::fast_insecure();
        let (salt, nonce, mut ct) = seal_scalars(&scalars(), "pw", &params).unwrap();
        ct[0] ^= 0xFF;
        assert!(matches!(
            open_scalars(&ct, &salt, &nonce, "pw", &params),
            Err(KeyError::WrongPassphrase)
        ));
    }

    #[test]
    fn test_fresh_salt_per_seal() {
        let params = Argon2Params::fast_insecure();
        let (salt1, _, _) = seal_scalars(&scalars(), "pw", &params).unwrap();
        let (salt2, _, _) = seal_scalars(&scalars(), "pw", &params).unwrap();
        assert_ne!(salt1, salt2);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Argon2Params {
            m_cost: 1,
            t_cost: 0,
            p_cost: 0,
        };
        assert!(matches!(
            seal_scalars(&scalars(), "pw", &params),
            Err(KeyError::KeyDerivationError(_))
        ));
    }
}
