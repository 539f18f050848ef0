//! Cleartext signing and verification.
//!
//! A signed message is the canonical text wrapped in cleartext framing
//! with a detached armored signature block appended:
//!
//! ```text
//! -----BEGIN PGP SIGNED MESSAGE-----
//! Hash: SHA256
//!
//! <dash-escaped text>
//! -----BEGIN PGP SIGNATURE-----
//! ...
//! -----END PGP SIGNATURE-----
//! ```
//!
//! Signature packet body:
//!
//! ```text
//! version(1)=4 | sig type(1)=0x01 | algo(1)=0x16 | hash(1)=0x08 |
//! created(4) | fp present(1) | issuer fingerprint(32, optional) |
//! Ed25519 signature(64)
//! ```
//!
//! The digest covers the canonical text plus a trailer of the packet's
//! own metadata (version, type, algorithms, creation time, issuer), so
//! none of those fields can be swapped after signing.

use ed25519_dalek::{Signature, Signer, Verifier};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use vellum_codec::{
    decode_armor, decode_packets, encode_armor, encode_packet, ArmorKind, MetadataPolicy, Packet,
};
use vellum_keys::{Fingerprint, KeyPair, PublicKey, ALGO_EDDSA, HASH_SHA256};

use crate::cleartext::{canonicalize, dash_escape, dash_unescape};
use crate::error::{EngineError, Result};

/// Signature packet body version.
const SIG_VERSION: u8 = 4;

/// Signature type: canonical text document.
const SIG_TYPE_TEXT: u8 = 0x01;

const BEGIN_SIGNED: &str = "-----BEGIN PGP SIGNED MESSAGE-----";
const BEGIN_SIGNATURE: &str = "-----BEGIN PGP SIGNATURE-----";

/// Minimum signature packet body length (without issuer fingerprint).
const SIG_BODY_MIN: usize = 1 + 1 + 1 + 1 + 4 + 1 + 64;

/// The outcome of verifying a cleartext signed message.
///
/// A mismatched signature is a verification *result*, not an error:
/// `valid` is false and the issuer details still describe what the
/// signature claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Whether the signature is valid for the supplied public key.
    pub valid: bool,
    /// The issuer fingerprint embedded in the signature.
    pub signer_fingerprint: Fingerprint,
    /// Signature creation time in Unix seconds.
    pub created_at: u32,
}

/// Compute the signing digest: canonical text followed by the metadata
/// trailer.
fn signing_digest(canonical: &str, created_at: u32, issuer: Option<&Fingerprint>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hasher.update([SIG_VERSION, SIG_TYPE_TEXT, ALGO_EDDSA, HASH_SHA256]);
    hasher.update(created_at.to_be_bytes());
    if let Some(fp) = issuer {
        hasher.update(fp.as_bytes());
    }
    hasher.finalize().into()
}

/// Sign `text` with the keypair's signing key, producing the full
/// cleartext signed message.
///
/// The secret material must be in plain form. The metadata policy
/// shapes the armor headers of the signature block.
pub fn sign(text: &str, keypair: &KeyPair, policy: &MetadataPolicy) -> Result<String> {
    let scalars = keypair.scalars()?;
    let canonical = canonicalize(text);
    let created_at = now_secs();
    let issuer = keypair.fingerprint();

    let digest = signing_digest(&canonical, created_at, Some(&issuer));
    let signature = scalars.signing_key().sign(&digest);

    let mut body = Vec::with_capacity(SIG_BODY_MIN + 32);
    body.push(SIG_VERSION);
    body.push(SIG_TYPE_TEXT);
    body.push(ALGO_EDDSA);
    body.push(HASH_SHA256);
    body.extend_from_slice(&created_at.to_be_bytes());
    body.push(1);
    body.extend_from_slice(issuer.as_bytes());
    body.extend_from_slice(&signature.to_bytes());

    let packet = encode_packet(&Packet::Signature(body));
    let armored = encode_armor(ArmorKind::Signature, &packet, &policy.apply());

    let mut out = String::new();
    out.push_str(BEGIN_SIGNED);
    out.push_str("\nHash: SHA256\n\n");
    out.push_str(&dash_escape(&canonical));
    out.push('\n');
    out.push_str(&armored);
    Ok(out)
}

/// Split a cleartext signed message into its text and the armored
/// signature block.
fn split_signed(signed: &str) -> Result<(String, &str)> {
    let after_begin = signed
        .find(BEGIN_SIGNED)
        .map(|i| &signed[i + BEGIN_SIGNED.len()..])
        .ok_or_else(|| EngineError::NotSignedMessage("missing signed message marker".into()))?;

    // Framing headers run to the first blank line.
    let mut rest = after_begin;
    let text_start = loop {
        let line_end = rest
            .find('\n')
            .ok_or_else(|| EngineError::NotSignedMessage("missing message body".into()))?;
        let line = rest[..line_end].trim_end();
        rest = &rest[line_end + 1..];
        if line.is_empty() {
            break rest;
        }
    };

    // The marker must start a line; dash-escaped text can contain it
    // mid-line.
    let sig_offset = line_offsets(text_start)
        .find(|&off| text_start[off..].starts_with(BEGIN_SIGNATURE))
        .ok_or_else(|| EngineError::NotSignedMessage("missing signature block".into()))?;
    let text = dash_unescape(text_start[..sig_offset].trim_end_matches(['\r', '\n']));
    Ok((text, &text_start[sig_offset..]))
}

/// Byte offsets of each line start in `text`.
fn line_offsets(text: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1))
}

/// Parsed signature packet fields.
struct SignaturePacket {
    created_at: u32,
    issuer: Option<Fingerprint>,
    signature: Signature,
}

fn parse_signature_body(body: &[u8]) -> Result<SignaturePacket> {
    if body.len() < SIG_BODY_MIN {
        return Err(EngineError::MalformedMessage(
            "signature packet too short".into(),
        ));
    }
    if body[0] != SIG_VERSION {
        return Err(EngineError::UnsupportedAlgorithm(body[0]));
    }
    if body[1] != SIG_TYPE_TEXT {
        return Err(EngineError::UnsupportedAlgorithm(body[1]));
    }
    if body[2] != ALGO_EDDSA {
        return Err(EngineError::UnsupportedAlgorithm(body[2]));
    }
    if body[3] != HASH_SHA256 {
        return Err(EngineError::UnsupportedAlgorithm(body[3]));
    }

    let created_at = u32::from_be_bytes([body[4], body[5], body[6], body[7]]);
    let (issuer, sig_start) = match body[8] {
        0 => (None, 9),
        1 => {
            if body.len() != SIG_BODY_MIN + 32 {
                return Err(EngineError::MalformedMessage(
                    "signature packet has wrong length".into(),
                ));
            }
            let mut fp = [0u8; 32];
            fp.copy_from_slice(&body[9..41]);
            (Some(Fingerprint::from_bytes(fp)), 41)
        }
        other => {
            return Err(EngineError::MalformedMessage(format!(
                "invalid issuer presence flag: 0x{other:02x}"
            )))
        }
    };

    let sig_bytes: [u8; 64] = body[sig_start..]
        .try_into()
        .map_err(|_| EngineError::MalformedMessage("signature packet has wrong length".into()))?;
    Ok(SignaturePacket {
        created_at,
        issuer,
        signature: Signature::from_bytes(&sig_bytes),
    })
}

/// Verify a cleartext signed message against a signer's public key.
///
/// Returns `Ok` with `valid: false` when the signature does not match,
/// including when the embedded issuer fingerprint belongs to a
/// different key than the one supplied. Errors are reserved for
/// structural problems: missing framing, malformed packets, or a
/// signature that names no issuer at all.
pub fn verify(signed: &str, signer: &PublicKey) -> Result<VerificationResult> {
    let (text, armored) = split_signed(signed)?;

    let block = decode_armor(armored)?;
    if block.kind != ArmorKind::Signature {
        return Err(EngineError::MalformedMessage(format!(
            "expected a signature block, got {:?}",
            block.kind
        )));
    }
    let packets = decode_packets(&block.body)?;
    let sig = match packets.as_slice() {
        [Packet::Signature(body)] => parse_signature_body(body)?,
        _ => {
            return Err(EngineError::MalformedMessage(
                "signature block must contain exactly one signature packet".into(),
            ))
        }
    };

    let issuer = sig.issuer.ok_or(EngineError::UnknownIssuer)?;
    let created_at = sig.created_at;

    if issuer != signer.fingerprint() {
        return Ok(VerificationResult {
            valid: false,
            signer_fingerprint: issuer,
            created_at,
        });
    }

    let digest = signing_digest(&canonicalize(&text), created_at, Some(&issuer));
    let valid = signer
        .verifying_key()?
        .verify(&digest, &sig.signature)
        .is_ok();

    Ok(VerificationResult {
        valid,
        signer_fingerprint: issuer,
        created_at,
    })
}

/// Current time in Unix seconds.
fn now_secs() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}
