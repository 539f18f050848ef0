//! Key packet serialization and armored import/export.
//!
//! Packet body layouts (self-describing, version-4 shaped):
//!
//! ```text
//! public key body:  version(1)=4 | created(4 BE) | algo(1)=0x16 |
//!                   ed25519 point(32) | x25519 point(32)
//! secret key body:  public body | usage(1) | secret part
//!   usage 0x00: plain scalar block(64)
//!   usage 0xFE: m_cost(4 BE) | t_cost(4 BE) | p_cost(4 BE) |
//!               salt(16) | nonce(12) | ciphertext(80)
//! user id body:     UTF-8 text
//! ```

use vellum_codec::{
    decode_armor, decode_packets, encode_armor, encode_packets, ArmorKind, MetadataPolicy, Packet,
};

use crate::error::{KeyError, Result};
use crate::keypair::{KeyPair, PublicKey, SecretKeyMaterial, SecretScalars};
use crate::protect::{Argon2Params, NONCE_LEN, SALT_LEN};
use crate::userid::UserId;
use crate::{ALGO_EDDSA, KEY_VERSION};

/// Usage byte: plain secret scalars follow.
const USAGE_PLAIN: u8 = 0x00;
/// Usage byte: passphrase-sealed scalars follow.
const USAGE_SEALED: u8 = 0xFE;

/// Length of the public key packet body.
const PUBLIC_BODY_LEN: usize = 1 + 4 + 1 + 32 + 32;

/// Serialize the public key packet body. This is also the fingerprint
/// preimage.
pub fn public_body(public: &PublicKey) -> Vec<u8> {
    let mut body = Vec::with_capacity(PUBLIC_BODY_LEN);
    body.push(KEY_VERSION);
    body.extend_from_slice(&public.created_at.to_be_bytes());
    body.push(ALGO_EDDSA);
    body.extend_from_slice(&public.signing);
    body.extend_from_slice(&public.encryption);
    body
}

/// Parse a public key packet body.
pub fn parse_public_body(body: &[u8]) -> Result<PublicKey> {
    if body.len() < PUBLIC_BODY_LEN {
        return Err(KeyError::MalformedKey(format!(
            "public key body too short: {} bytes",
            body.len()
        )));
    }
    if body[0] != KEY_VERSION {
        return Err(KeyError::MalformedKey(format!(
            "unsupported key packet version: {}",
            body[0]
        )));
    }
    let algo = body[5];
    if algo != ALGO_EDDSA {
        return Err(KeyError::UnsupportedAlgorithm(algo));
    }

    let created_at = u32::from_be_bytes([body[1], body[2], body[3], body[4]]);
    let mut signing = [0u8; 32];
    signing.copy_from_slice(&body[6..38]);
    let mut encryption = [0u8; 32];
    encryption.copy_from_slice(&body[38..70]);

    Ok(PublicKey {
        created_at,
        signing,
        encryption,
    })
}

/// Serialize a secret key packet body (public body + secret part).
fn secret_body(public: &PublicKey, material: &SecretKeyMaterial) -> Vec<u8> {
    let mut body = public_body(public);
    match material {
        SecretKeyMaterial::Plain(scalars) => {
            body.push(USAGE_PLAIN);
            body.extend_from_slice(&scalars.to_block());
        }
        SecretKeyMaterial::Encrypted {
            params,
            salt,
            nonce,
            ciphertext,
        } => {
            body.push(USAGE_SEALED);
            body.extend_from_slice(&params.m_cost.to_be_bytes());
            body.extend_from_slice(&params.t_cost.to_be_bytes());
            body.extend_from_slice(&params.p_cost.to_be_bytes());
            body.extend_from_slice(salt);
            body.extend_from_slice(nonce);
            body.extend_from_slice(ciphertext);
        }
    }
    body
}

/// Parse a secret key packet body.
fn parse_secret_body(body: &[u8]) -> Result<(PublicKey, SecretKeyMaterial)> {
    let public = parse_public_body(body)?;
    let rest = &body[PUBLIC_BODY_LEN..];
    let (&usage, rest) = rest
        .split_first()
        .ok_or_else(|| KeyError::MalformedKey("missing secret key usage byte".into()))?;

    let material = match usage {
        USAGE_PLAIN => SecretKeyMaterial::Plain(SecretScalars::from_block(rest)?),
        USAGE_SEALED => {
            let fixed = 12 + SALT_LEN + NONCE_LEN;
            if rest.len() < fixed {
                return Err(KeyError::MalformedKey(
                    "sealed secret key part too short".into(),
                ));
            }
            let params = Argon2Params {
                m_cost: u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]),
                t_cost: u32::from_be_bytes([rest[4], rest[5], rest[6], rest[7]]),
                p_cost: u32::from_be_bytes([rest[8], rest[9], rest[10], rest[11]]),
            };
            let mut salt = [0u8; SALT_LEN];
            salt.copy_from_slice(&rest[12..12 + SALT_LEN]);
            let mut nonce = [0u8; NONCE_LEN];
            nonce.copy_from_slice(&rest[12 + SALT_LEN..fixed]);
            SecretKeyMaterial::Encrypted {
                params,
                salt,
                nonce,
                ciphertext: rest[fixed..].to_vec(),
            }
        }
        other => {
            return Err(KeyError::MalformedKey(format!(
                "unknown secret key usage byte: 0x{other:02x}"
            )))
        }
    };
    Ok((public, material))
}

/// UserId packets for a key's non-empty identities, in order.
fn user_id_packets(user_ids: &[UserId]) -> Vec<Packet> {
    user_ids
        .iter()
        .filter(|uid| !uid.is_empty())
        .map(|uid| Packet::UserId(uid.to_packet_body()))
        .collect()
}

/// Export the public key as an armored block.
pub fn export_public(keypair: &KeyPair, policy: &MetadataPolicy) -> String {
    let mut packets = vec![Packet::PublicKey(public_body(&keypair.public))];
    packets.extend(user_id_packets(&keypair.user_ids));
    encode_armor(
        ArmorKind::PublicKey,
        &encode_packets(&packets),
        &policy.apply(),
    )
}

/// Export the secret key as an armored block.
///
/// Serializes the secret material in its current state (plain or
/// sealed); callers wanting passphrase protection lock the key first.
pub fn export_secret(keypair: &KeyPair, policy: &MetadataPolicy) -> Result<String> {
    let material = keypair.secret.as_ref().ok_or(KeyError::MissingSecretKey)?;
    let mut packets = vec![Packet::SecretKey(secret_body(&keypair.public, material))];
    packets.extend(user_id_packets(&keypair.user_ids));
    Ok(encode_armor(
        ArmorKind::PrivateKey,
        &encode_packets(&packets),
        &policy.apply(),
    ))
}

/// Import an armored public key block.
///
/// Accepts zero or more UserId packets after the key packet.
pub fn import_public(armored: &str) -> Result<KeyPair> {
    let block = decode_armor(armored)?;
    if block.kind != ArmorKind::PublicKey {
        return Err(KeyError::MalformedKey(format!(
            "expected a public key block, got {:?}",
            block.kind
        )));
    }
    let packets = decode_packets(&block.body)?;
    let (first, rest) = packets
        .split_first()
        .ok_or_else(|| KeyError::MalformedKey("empty key block".into()))?;
    let public = match first {
        Packet::PublicKey(body) => parse_public_body(body)?,
        other => {
            return Err(KeyError::MalformedKey(format!(
                "expected a public key packet first, got {:?}",
                other.tag()
            )))
        }
    };
    Ok(KeyPair {
        public,
        user_ids: parse_user_ids(rest)?,
        secret: None,
    })
}

/// Import an armored secret key block.
pub fn import_secret(armored: &str) -> Result<KeyPair> {
    let block = decode_armor(armored)?;
    if block.kind != ArmorKind::PrivateKey {
        return Err(KeyError::MalformedKey(format!(
            "expected a private key block, got {:?}",
            block.kind
        )));
    }
    let packets = decode_packets(&block.body)?;
    let (first, rest) = packets
        .split_first()
        .ok_or_else(|| KeyError::MalformedKey("empty key block".into()))?;
    let (public, material) = match first {
        Packet::SecretKey(body) => parse_secret_body(body)?,
        other => {
            return Err(KeyError::MalformedKey(format!(
                "expected a secret key packet first, got {:?}",
                other.tag()
            )))
        }
    };
    Ok(KeyPair {
        public,
        user_ids: parse_user_ids(rest)?,
        secret: Some(material),
    })
}

fn parse_user_ids(packets: &[Packet]) -> Result<Vec<UserId>> {
    packets
        .iter()
        .map(|packet| match packet {
            Packet::UserId(body) => Ok(UserId::from_packet_body(body)),
            other => Err(KeyError::MalformedKey(format!(
                "unexpected packet in key block: {:?}",
                other.tag()
            ))),
        })
        .collect()
}
