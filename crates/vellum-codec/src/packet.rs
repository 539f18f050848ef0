//! OpenPGP packet framing (RFC 4880 §4).
//!
//! A packet is a tag byte plus a length-prefixed binary body. This
//! module implements new-format headers only: the tag byte is
//! `0xC0 | tag`, followed by a 1-, 2-, or 5-octet length. Partial
//! (streamed) lengths and old-format headers are rejected.

use crate::error::{CodecError, Result};

/// RFC 4880 packet tag numbers for the packet types this engine emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketTag {
    /// Public-Key Encrypted Session Key packet.
    SessionKey = 1,
    /// Signature packet.
    Signature = 2,
    /// One-Pass Signature packet.
    OnePassSignature = 4,
    /// Secret-Key packet.
    SecretKey = 5,
    /// Public-Key packet.
    PublicKey = 6,
    /// Literal Data packet.
    LiteralData = 11,
    /// User ID packet.
    UserId = 13,
    /// Symmetrically Encrypted and Integrity Protected Data packet.
    EncryptedData = 18,
}

impl PacketTag {
    /// Try to parse a tag number.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::SessionKey),
            2 => Some(Self::Signature),
            4 => Some(Self::OnePassSignature),
            5 => Some(Self::SecretKey),
            6 => Some(Self::PublicKey),
            11 => Some(Self::LiteralData),
            13 => Some(Self::UserId),
            18 => Some(Self::EncryptedData),
            _ => None,
        }
    }
}

/// A single OpenPGP packet: a tag and its binary body.
///
/// A key or message is an ordered sequence of packets; the order is
/// semantically significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Wrapped session key for one recipient.
    SessionKey(Vec<u8>),
    /// A signature over some digested content.
    Signature(Vec<u8>),
    /// Announces a signature that follows the signed data.
    OnePassSignature(Vec<u8>),
    /// Secret key material (possibly passphrase-protected).
    SecretKey(Vec<u8>),
    /// Public key material.
    PublicKey(Vec<u8>),
    /// Raw message payload.
    LiteralData(Vec<u8>),
    /// A user identity attached to a key.
    UserId(Vec<u8>),
    /// Authenticated ciphertext.
    EncryptedData(Vec<u8>),
}

impl Packet {
    /// The RFC 4880 tag of this packet.
    pub fn tag(&self) -> PacketTag {
        match self {
            Self::SessionKey(_) => PacketTag::SessionKey,
            Self::Signature(_) => PacketTag::Signature,
            Self::OnePassSignature(_) => PacketTag::OnePassSignature,
            Self::SecretKey(_) => PacketTag::SecretKey,
            Self::PublicKey(_) => PacketTag::PublicKey,
            Self::LiteralData(_) => PacketTag::LiteralData,
            Self::UserId(_) => PacketTag::UserId,
            Self::EncryptedData(_) => PacketTag::EncryptedData,
        }
    }

    /// The packet body bytes.
    pub fn body(&self) -> &[u8] {
        match self {
            Self::SessionKey(b)
            | Self::Signature(b)
            | Self::OnePassSignature(b)
            | Self::SecretKey(b)
            | Self::PublicKey(b)
            | Self::LiteralData(b)
            | Self::UserId(b)
            | Self::EncryptedData(b) => b,
        }
    }

    /// Construct a packet from a tag and body.
    pub fn from_tag(tag: PacketTag, body: Vec<u8>) -> Self {
        match tag {
            PacketTag::SessionKey => Self::SessionKey(body),
            PacketTag::Signature => Self::Signature(body),
            PacketTag::OnePassSignature => Self::OnePassSignature(body),
            PacketTag::SecretKey => Self::SecretKey(body),
            PacketTag::PublicKey => Self::PublicKey(body),
            PacketTag::LiteralData => Self::LiteralData(body),
            PacketTag::UserId => Self::UserId(body),
            PacketTag::EncryptedData => Self::EncryptedData(body),
        }
    }
}

/// Encode a packet to its new-format wire form.
pub fn encode_packet(packet: &Packet) -> Vec<u8> {
    let body = packet.body();
    let mut out = Vec::with_capacity(body.len() + 6);
    out.push(0xC0 | packet.tag() as u8);
    encode_length(&mut out, body.len());
    out.extend_from_slice(body);
    out
}

/// Encode an ordered sequence of packets.
pub fn encode_packets(packets: &[Packet]) -> Vec<u8> {
    let mut out = Vec::new();
    for packet in packets {
        out.extend_from_slice(&encode_packet(packet));
    }
    out
}

/// Decode a single packet from the front of `input`.
///
/// Returns the packet and the number of bytes consumed.
pub fn decode_packet(input: &[u8]) -> Result<(Packet, usize)> {
    let ctb = *input
        .first()
        .ok_or(CodecError::TruncatedPacket {
            declared: 1,
            remaining: 0,
        })?;

    if ctb & 0x80 == 0 {
        return Err(CodecError::MalformedPacket(format!(
            "invalid packet header byte: 0x{ctb:02x}"
        )));
    }
    if ctb & 0x40 == 0 {
        // Old-format headers are not produced by any modern peer we
        // interoperate with; reject rather than guess at lengths.
        return Err(CodecError::MalformedPacket(
            "old-format packet header".into(),
        ));
    }

    let tag_byte = ctb & 0x3F;
    let tag = PacketTag::from_u8(tag_byte).ok_or(CodecError::UnknownPacketTag(tag_byte))?;

    let (length, header_len) = decode_length(&input[1..])?;
    let start = 1 + header_len;
    let remaining = input.len().saturating_sub(start);
    if length > remaining {
        return Err(CodecError::TruncatedPacket {
            declared: length,
            remaining,
        });
    }

    let body = input[start..start + length].to_vec();
    Ok((Packet::from_tag(tag, body), start + length))
}

/// Decode a whole buffer as an ordered packet sequence.
///
/// Fails on the first malformed, truncated, or unknown packet; nothing
/// is silently skipped.
pub fn decode_packets(input: &[u8]) -> Result<Vec<Packet>> {
    let mut packets = Vec::new();
    let mut offset = 0;
    while offset < input.len() {
        let (packet, consumed) = decode_packet(&input[offset..])?;
        packets.push(packet);
        offset += consumed;
    }
    Ok(packets)
}

/// Write a new-format length (RFC 4880 §4.2.2).
fn encode_length(out: &mut Vec<u8>, len: usize) {
    if len < 192 {
        out.push(len as u8);
    } else if len < 8384 {
        let adjusted = len - 192;
        out.push((adjusted >> 8) as u8 + 192);
        out.push(adjusted as u8);
    } else {
        out.push(0xFF);
        out.extend_from_slice(&(len as u32).to_be_bytes());
    }
}

/// Read a new-format length; returns (length, octets consumed).
fn decode_length(input: &[u8]) -> Result<(usize, usize)> {
    let first = *input.first().ok_or(CodecError::TruncatedPacket {
        declared: 1,
        remaining: 0,
    })?;
    match first {
        0..=191 => Ok((first as usize, 1)),
        192..=223 => {
            let second = *input.get(1).ok_or(CodecError::TruncatedPacket {
                declared: 2,
                remaining: 1,
            })?;
            Ok((((first as usize - 192) << 8) + second as usize + 192, 2))
        }
        224..=254 => Err(CodecError::MalformedPacket(
            "partial body lengths are not supported".into(),
        )),
        255 => {
            if input.len() < 5 {
                return Err(CodecError::TruncatedPacket {
                    declared: 5,
                    remaining: input.len(),
                });
            }
            let len = u32::from_be_bytes([input[1], input[2], input[3], input[4]]);
            Ok((len as usize, 5))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_roundtrip_all_tags() {
        for tag in [
            PacketTag::SessionKey,
            PacketTag::Signature,
            PacketTag::OnePassSignature,
            PacketTag::SecretKey,
            PacketTag::PublicKey,
            PacketTag::LiteralData,
            PacketTag::UserId,
            PacketTag::EncryptedData,
        ] {
            let packet = Packet::from_tag(tag, vec![1, 2, 3]);
            let encoded = encode_packet(&packet);
            let (decoded, consumed) = decode_packet(&encoded).unwrap();
            assert_eq!(decoded, packet);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn test_length_encoding_boundaries() {
        // One-octet: 0 and 191.
        for len in [0usize, 1, 191] {
            let packet = Packet::UserId(vec![0xAA; len]);
            let encoded = encode_packet(&packet);
            assert_eq!(encoded.len(), 2 + len);
            assert_eq!(decode_packet(&encoded).unwrap().0.body().len(), len);
        }
        // Two-octet: 192 and 8383.
        for len in [192usize, 1000, 8383] {
            let packet = Packet::LiteralData(vec![0xBB; len]);
            let encoded = encode_packet(&packet);
            assert_eq!(encoded.len(), 3 + len);
            assert_eq!(decode_packet(&encoded).unwrap().0.body().len(), len);
        }
        // Five-octet: 8384 and larger.
        let len = 8384usize;
        let packet = Packet::EncryptedData(vec![0xCC; len]);
        let encoded = encode_packet(&packet);
        assert_eq!(encoded.len(), 6 + len);
        assert_eq!(decode_packet(&encoded).unwrap().0.body().len(), len);
    }

    #[test]
    fn test_sequence_roundtrip_preserves_order() {
        let packets = vec![
            Packet::SessionKey(vec![1; 10]),
            Packet::EncryptedData(vec![2; 300]),
        ];
        let encoded = encode_packets(&packets);
        let decoded = decode_packets(&encoded).unwrap();
        assert_eq!(decoded, packets);
    }

    #[test]
    fn test_truncated_packet_rejected() {
        let packet = Packet::LiteralData(vec![0xAB; 100]);
        let encoded = encode_packet(&packet);
        let err = decode_packet(&encoded[..50]).unwrap_err();
        assert!(matches!(err, CodecError::TruncatedPacket { .. }));
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        // Tag 60 is unassigned; header byte 0xC0 | 60.
        let bytes = [0xC0 | 60, 0x01, 0x00];
        let err = decode_packet(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::UnknownPacketTag(60)));

        // And a sequence containing one fails wholesale.
        let mut seq = encode_packet(&Packet::UserId(b"ok".to_vec()));
        seq.extend_from_slice(&bytes);
        assert!(decode_packets(&seq).is_err());
    }

    #[test]
    fn test_old_format_header_rejected() {
        // Old format: bit 6 clear. 0x80 | (6 << 2) would be a public key.
        let bytes = [0x98, 0x00];
        let err = decode_packet(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPacket(_)));
    }

    #[test]
    fn test_partial_length_rejected() {
        // First length octet in 224..=254 signals a partial body length.
        let bytes = [0xC0 | 11, 0xE0, 0x00];
        let err = decode_packet(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPacket(_)));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(decode_packet(&[]).is_err());
        // But an empty sequence is a valid (empty) packet list.
        assert!(decode_packets(&[]).unwrap().is_empty());
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn packet_roundtrips_any_body(
            tag in prop_oneof![
                Just(PacketTag::SessionKey),
                Just(PacketTag::Signature),
                Just(PacketTag::SecretKey),
                Just(PacketTag::PublicKey),
                Just(PacketTag::LiteralData),
                Just(PacketTag::UserId),
                Just(PacketTag::EncryptedData),
            ],
            body in prop::collection::vec(any::<u8>(), 0..10_000),
        ) {
            let packet = Packet::from_tag(tag, body);
            let encoded = encode_packet(&packet);
            let (decoded, consumed) = decode_packet(&encoded).unwrap();
            prop_assert_eq!(consumed, encoded.len());
            prop_assert_eq!(decoded, packet);
        }

        #[test]
        fn truncation_never_panics(
            body in prop::collection::vec(any::<u8>(), 0..300),
            cut in 0usize..300,
        ) {
            let encoded = encode_packet(&Packet::LiteralData(body));
            let cut = cut.min(encoded.len());
            // Must either parse a prefix or error, never panic.
            let _ = decode_packet(&encoded[..cut]);
        }
    }
}
