//! The Vellum facade: armored-text operations over the component
//! crates.
//!
//! Every operation takes and returns armored strings, so a caller
//! never handles raw packets or key material directly. Input strings
//! are validated up front; blank required inputs fail with
//! [`VellumError::MissingInput`] before any parsing happens.

use vellum_codec::MetadataPolicy;
use vellum_engine::VerificationResult;
use vellum_keys::{
    export_public, export_secret, import_public, import_secret, Argon2Params, Fingerprint,
    KeyPair, UserId,
};

use crate::error::{Result, VellumError};

/// A freshly generated keypair in exportable form.
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// The armored public key block.
    pub public_armored: String,
    /// The armored private key block. Sealed under the passphrase when
    /// one was given.
    pub secret_armored: String,
    /// The key's fingerprint.
    pub fingerprint: Fingerprint,
}

/// The Vellum engine.
///
/// Holds the metadata policy applied to all armored output and the KDF
/// parameters used to seal generated keys. Stateless otherwise; every
/// operation is a pure function of its string inputs.
pub struct Vellum {
    /// Armor header policy for exported blocks.
    policy: MetadataPolicy,
    /// Argon2id parameters for passphrase-sealed keys.
    kdf_params: Argon2Params,
}

impl Vellum {
    /// An engine with the ambient default comment and production KDF
    /// parameters.
    pub fn new() -> Self {
        Self {
            policy: MetadataPolicy::new(),
            kdf_params: Argon2Params::default(),
        }
    }

    /// An engine with an explicit metadata policy.
    pub fn with_policy(policy: MetadataPolicy) -> Self {
        Self {
            policy,
            kdf_params: Argon2Params::default(),
        }
    }

    /// Replace the KDF parameters. Tests use this to avoid the
    /// production Argon2 cost.
    pub fn kdf_params(mut self, params: Argon2Params) -> Self {
        self.kdf_params = params;
        self
    }

    /// The active metadata policy.
    pub fn policy(&self) -> &MetadataPolicy {
        &self.policy
    }

    // ─────────────────────────────────────────────────────────────────
    // Key Operations
    // ─────────────────────────────────────────────────────────────────

    /// Generate a keypair and export both halves.
    ///
    /// Blank name and email produce an anonymous key. A non-empty
    /// passphrase seals the private key before export.
    pub fn generate_key(&self, name: &str, email: &str, passphrase: &str) -> Result<GeneratedKey> {
        let user_id = UserId {
            name: non_blank(name),
            email: non_blank(email),
        };
        let user_ids = if user_id.is_empty() {
            Vec::new()
        } else {
            vec![user_id]
        };

        let passphrase = (!passphrase.is_empty()).then_some(passphrase);
        let keypair = KeyPair::generate_with_params(user_ids, passphrase, &self.kdf_params)?;
        let fingerprint = keypair.fingerprint();
        tracing::debug!(%fingerprint, locked = keypair.is_locked(), "generated keypair");

        Ok(GeneratedKey {
            public_armored: export_public(&keypair, &self.policy),
            secret_armored: export_secret(&keypair, &self.policy)?,
            fingerprint,
        })
    }

    // ─────────────────────────────────────────────────────────────────
    // Message Operations
    // ─────────────────────────────────────────────────────────────────

    /// Encrypt a message to a recipient's armored public key.
    pub fn encrypt_message(&self, plaintext: &str, recipient_key: &str) -> Result<String> {
        require(plaintext, "message")?;
        require(recipient_key, "recipient public key")?;

        let recipient = import_public(recipient_key)?;
        tracing::debug!(recipient = %recipient.fingerprint(), "encrypting message");
        Ok(vellum_engine::encrypt(
            plaintext.as_bytes(),
            &recipient.public,
            &self.policy,
        )?)
    }

    /// Decrypt an armored message with an armored private key.
    ///
    /// The passphrase is required only when the key is sealed; it is
    /// ignored for a plain key.
    pub fn decrypt_message(
        &self,
        message: &str,
        secret_key: &str,
        passphrase: &str,
    ) -> Result<String> {
        require(message, "encrypted message")?;
        require(secret_key, "secret key")?;

        let mut keypair = import_secret(secret_key)?;
        if keypair.is_locked() {
            require(passphrase, "passphrase")?;
            keypair.unlock(passphrase)?;
        }

        let plaintext = vellum_engine::decrypt(message, &keypair).map_err(|e| {
            tracing::warn!(recipient = %keypair.fingerprint(), "decryption failed: {e}");
            e
        })?;
        Ok(String::from_utf8_lossy(&plaintext).into_owned())
    }

    // ─────────────────────────────────────────────────────────────────
    // Signature Operations
    // ─────────────────────────────────────────────────────────────────

    /// Produce a cleartext signed message with an armored private key.
    pub fn sign_message(&self, text: &str, secret_key: &str, passphrase: &str) -> Result<String> {
        require(text, "message")?;
        require(secret_key, "secret key")?;

        let mut keypair = import_secret(secret_key)?;
        if keypair.is_locked() {
            require(passphrase, "passphrase")?;
            keypair.unlock(passphrase)?;
        }

        tracing::debug!(signer = %keypair.fingerprint(), "signing message");
        Ok(vellum_engine::sign(text, &keypair, &self.policy)?)
    }

    /// Verify a cleartext signed message against an armored public key.
    ///
    /// A signature that does not match is reported in the result, not
    /// as an error.
    pub fn verify_message(&self, signed: &str, public_key: &str) -> Result<VerificationResult> {
        require(signed, "signed message")?;
        require(public_key, "signer public key")?;

        let signer = import_public(public_key)?;
        let result = vellum_engine::verify(signed, &signer.public)?;
        if !result.valid {
            tracing::warn!(claimed = %result.signer_fingerprint, "signature did not verify");
        }
        Ok(result)
    }
}

impl Default for Vellum {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject a blank required input.
fn require(value: &str, name: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VellumError::MissingInput(name));
    }
    Ok(())
}

/// A trimmed string, or `None` when blank.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
