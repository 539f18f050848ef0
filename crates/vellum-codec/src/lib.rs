//! # Vellum Codec
//!
//! ASCII armor and packet framing for the Vellum OpenPGP engine.
//!
//! This crate contains no cryptography. It is pure, side-effect-free
//! translation between binary packet data and its two transport encodings:
//!
//! - **Armor**: base64 text delimited by BEGIN/END marker lines, with a
//!   CRC24 checksum line ([`armor`] module)
//! - **Packets**: tagged, length-prefixed binary records per RFC 4880
//!   new-format headers ([`packet`] module)
//!
//! Armor header lines (the `Comment:` metadata the UI layer customizes)
//! are handled structurally by [`MetadataPolicy`], never by post-hoc text
//! surgery on the armored output.

pub mod armor;
pub mod crc24;
pub mod error;
pub mod metadata;
pub mod packet;

pub use armor::{decode_armor, encode_armor, ArmorKind, ArmoredBlock};
pub use crc24::crc24;
pub use error::CodecError;
pub use metadata::{MetadataPolicy, DEFAULT_COMMENT};
pub use packet::{decode_packet, decode_packets, encode_packet, encode_packets, Packet, PacketTag};
