//! Keypairs and secret key material.

use ed25519_dalek::SigningKey;
use rand::RngCore;
use std::fmt;
use x25519_dalek::StaticSecret;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{KeyError, Result};
use crate::fingerprint::Fingerprint;
use crate::protect::{self, Argon2Params, NONCE_LEN, SALT_LEN};
use crate::userid::UserId;

/// The public half of a keypair: creation time plus the Ed25519 signing
/// point and the X25519 encryption point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    /// Creation time in Unix seconds. Part of the fingerprint input.
    pub created_at: u32,
    /// Ed25519 public point (32 bytes), used to verify signatures.
    pub signing: [u8; 32],
    /// X25519 public point (32 bytes), used to wrap session keys.
    pub encryption: [u8; 32],
}

impl PublicKey {
    /// Compute the fingerprint: SHA-256 over the public key packet body.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::digest(&crate::wire::public_body(self))
    }

    /// The Ed25519 verifying key, if the stored point is valid.
    pub fn verifying_key(&self) -> Result<ed25519_dalek::VerifyingKey> {
        ed25519_dalek::VerifyingKey::from_bytes(&self.signing)
            .map_err(|_| KeyError::MalformedKey("invalid Ed25519 public point".into()))
    }

    /// The X25519 public key for session-key wrapping.
    pub fn encryption_point(&self) -> x25519_dalek::PublicKey {
        x25519_dalek::PublicKey::from(self.encryption)
    }
}

/// The two secret scalars of a keypair.
///
/// Zeroized on drop. Deliberately implements neither `Clone` nor a
/// byte-revealing `Debug`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretScalars {
    signing: [u8; 32],
    encryption: [u8; 32],
}

impl SecretScalars {
    /// Assemble from the two raw scalars.
    pub fn from_parts(signing: [u8; 32], encryption: [u8; 32]) -> Self {
        Self {
            signing,
            encryption,
        }
    }

    /// Serialize to the 64-byte block form (signing || encryption).
    pub fn to_block(&self) -> [u8; 64] {
        let mut block = [0u8; 64];
        block[..32].copy_from_slice(&self.signing);
        block[32..].copy_from_slice(&self.encryption);
        block
    }

    /// Parse the 64-byte block form.
    pub fn from_block(block: &[u8]) -> Result<Self> {
        if block.len() != 64 {
            return Err(KeyError::MalformedKey(format!(
                "secret scalar block must be 64 bytes, got {}",
                block.len()
            )));
        }
        let mut signing = [0u8; 32];
        let mut encryption = [0u8; 32];
        signing.copy_from_slice(&block[..32]);
        encryption.copy_from_slice(&block[32..]);
        Ok(Self {
            signing,
            encryption,
        })
    }

    /// The Ed25519 signing key.
    pub fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.signing)
    }

    /// The X25519 static secret for session-key unwrapping.
    pub fn encryption_secret(&self) -> StaticSecret {
        StaticSecret::from(self.encryption)
    }

    /// Derive the public key for these scalars at a given creation time.
    pub fn derive_public(&self, created_at: u32) -> PublicKey {
        PublicKey {
            created_at,
            signing: self.signing_key().verifying_key().to_bytes(),
            encryption: x25519_dalek::PublicKey::from(&self.encryption_secret()).to_bytes(),
        }
    }
}

impl fmt::Debug for SecretScalars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretScalars(..)")
    }
}

/// Secret key material: plain scalars or a passphrase-sealed block.
///
/// Owned exclusively by its [`KeyPair`]; transitions Plain → Encrypted
/// via [`KeyPair::lock`] and Encrypted → Plain via [`KeyPair::unlock`].
#[derive(Debug)]
pub enum SecretKeyMaterial {
    /// Scalars available in memory.
    Plain(SecretScalars),
    /// Scalars sealed under a passphrase-derived key.
    Encrypted {
        /// Argon2id parameters used for the KDF.
        params: Argon2Params,
        /// Random KDF salt.
        salt: [u8; SALT_LEN],
        /// Random AEAD nonce.
        nonce: [u8; NONCE_LEN],
        /// ChaCha20-Poly1305 ciphertext of the 64-byte scalar block.
        ciphertext: Vec<u8>,
    },
}

/// A keypair: public key, user identities, and optional secret material.
///
/// The public key is always derivable from the secret scalars when they
/// are present; the fingerprint is a pure function of the public key
/// material and creation time.
#[derive(Debug)]
pub struct KeyPair {
    /// The public half.
    pub public: PublicKey,
    /// Attached identities, in order. May be empty (anonymous key).
    pub user_ids: Vec<UserId>,
    /// Secret material; `None` for a public-only key.
    pub secret: Option<SecretKeyMaterial>,
}

impl KeyPair {
    /// Generate a fresh keypair.
    ///
    /// Accepts zero or more user IDs in any combination of filled and
    /// empty fields. A non-empty passphrase seals the secret scalars
    /// immediately; an empty or absent passphrase leaves them plain.
    pub fn generate(user_ids: Vec<UserId>, passphrase: Option<&str>) -> Result<Self> {
        Self::generate_with_params(user_ids, passphrase, &Argon2Params::default())
    }

    /// [`KeyPair::generate`] with explicit KDF parameters.
    pub fn generate_with_params(
        user_ids: Vec<UserId>,
        passphrase: Option<&str>,
        params: &Argon2Params,
    ) -> Result<Self> {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        let mut encryption_seed = [0u8; 32];
        rng.fill_bytes(&mut encryption_seed);

        let scalars = SecretScalars::from_parts(signing_key.to_bytes(), encryption_seed);
        let public = scalars.derive_public(now_secs());

        let secret = match passphrase.filter(|p| !p.is_empty()) {
            Some(passphrase) => {
                let (salt, nonce, ciphertext) =
                    protect::seal_scalars(&scalars, passphrase, params)?;
                SecretKeyMaterial::Encrypted {
                    params: *params,
                    salt,
                    nonce,
                    ciphertext,
                }
            }
            None => SecretKeyMaterial::Plain(scalars),
        };

        Ok(Self {
            public,
            user_ids,
            secret: Some(secret),
        })
    }

    /// The key's fingerprint.
    pub fn fingerprint(&self) -> Fingerprint {
        self.public.fingerprint()
    }

    /// Whether the secret material is present but passphrase-sealed.
    pub fn is_locked(&self) -> bool {
        matches!(self.secret, Some(SecretKeyMaterial::Encrypted { .. }))
    }

    /// Borrow the plain secret scalars.
    ///
    /// Fails with [`KeyError::KeyLocked`] when sealed and
    /// [`KeyError::MissingSecretKey`] for a public-only key.
    pub fn scalars(&self) -> Result<&SecretScalars> {
        match &self.secret {
            Some(SecretKeyMaterial::Plain(scalars)) => Ok(scalars),
            Some(SecretKeyMaterial::Encrypted { .. }) => Err(KeyError::KeyLocked),
            None => Err(KeyError::MissingSecretKey),
        }
    }

    /// Seal plain secret scalars under a passphrase (Plain → Encrypted).
    pub fn lock(&mut self, passphrase: &str, params: &Argon2Params) -> Result<()> {
        match self.secret.take() {
            Some(SecretKeyMaterial::Plain(scalars)) => {
                let (salt, nonce, ciphertext) =
                    protect::seal_scalars(&scalars, passphrase, params)?;
                self.secret = Some(SecretKeyMaterial::Encrypted {
                    params: *params,
                    salt,
                    nonce,
                    ciphertext,
                });
                Ok(())
            }
            other @ Some(SecretKeyMaterial::Encrypted { .. }) => {
                self.secret = other;
                Err(KeyError::KeyLocked)
            }
            None => Err(KeyError::MissingSecretKey),
        }
    }

    /// Recover plain secret scalars with the passphrase
    /// (Encrypted → Plain).
    ///
    /// A no-op success when the material is already plain. Fails with
    /// [`KeyError::WrongPassphrase`] on authentication failure, leaving
    /// the sealed material untouched.
    pub fn unlock(&mut self, passphrase: &str) -> Result<()> {
        match &self.secret {
            Some(SecretKeyMaterial::Plain(_)) => Ok(()),
            Some(SecretKeyMaterial::Encrypted {
                params,
                salt,
                nonce,
                ciphertext,
            }) => {
                let scalars = protect::open_scalars(ciphertext, salt, nonce, passphrase, params)?;
                self.secret = Some(SecretKeyMaterial::Plain(scalars));
                Ok(())
            }
            None => Err(KeyError::MissingSecretKey),
        }
    }
}

/// Current time in Unix seconds.
fn now_secs() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Params {
        Argon2Params::fast_insecure()
    }

    #[test]
    fn test_generate_plain() {
        let kp = KeyPair::generate(vec![UserId::name_only("Alice")], None).unwrap();
        assert!(!kp.is_locked());
        assert!(kp.scalars().is_ok());
    }

    #[test]
    fn test_generate_anonymous() {
        let kp = KeyPair::generate(vec![], None).unwrap();
        assert!(kp.user_ids.is_empty());
        assert!(kp.scalars().is_ok());
    }

    #[test]
    fn test_empty_passphrase_stays_plain() {
        let kp = KeyPair::generate(vec![], Some("")).unwrap();
        assert!(!kp.is_locked());
    }

    #[test]
    fn test_generate_with_passphrase_is_locked() {
        let kp =
            KeyPair::generate_with_params(vec![], Some("secret"), &fast()).unwrap();
        assert!(kp.is_locked());
        assert!(matches!(kp.scalars(), Err(KeyError::KeyLocked)));
    }

    #[test]
    fn test_unlock_with_correct_passphrase() {
        let mut kp =
            KeyPair::generate_with_params(vec![], Some("secret"), &fast()).unwrap();
        kp.unlock("secret").unwrap();
        assert!(!kp.is_locked());
        // Public key derivable from the recovered scalars.
        let derived = kp.scalars().unwrap().derive_public(kp.public.created_at);
        assert_eq!(derived, kp.public);
    }

    #[test]
    fn test_unlock_wrong_passphrase_fails_and_stays_locked() {
        let mut kp =
            KeyPair::generate_with_params(vec![], Some("secret"), &fast()).unwrap();
        assert!(matches!(
            kp.unlock("nope"),
            Err(KeyError::WrongPassphrase)
        ));
        assert!(kp.is_locked());
        // Correct passphrase still works afterwards.
        kp.unlock("secret").unwrap();
    }

    #[test]
    fn test_unlock_plain_is_noop() {
        let mut kp = KeyPair::generate(vec![], None).unwrap();
        kp.unlock("anything").unwrap();
        assert!(!kp.is_locked());
    }

    #[test]
    fn test_lock_then_unlock_roundtrip() {
        let mut kp = KeyPair::generate(vec![], None).unwrap();
        let fp = kp.fingerprint();
        kp.lock("pw", &fast()).unwrap();
        assert!(kp.is_locked());
        kp.unlock("pw").unwrap();
        assert_eq!(kp.fingerprint(), fp);
    }

    #[test]
    fn test_fingerprint_pure_function_of_public() {
        let kp = KeyPair::generate(vec![], None).unwrap();
        let fp1 = kp.fingerprint();
        let fp2 = kp.public.fingerprint();
        assert_eq!(fp1, fp2);

        let other = KeyPair::generate(vec![], None).unwrap();
        assert_ne!(kp.fingerprint(), other.fingerprint());
    }
}
