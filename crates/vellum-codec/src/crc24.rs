//! CRC24 checksum for armored blocks (RFC 4880 §6.1).
//!
//! This is a transport-corruption check, not a security mechanism. The
//! decoder always recomputes it and never trusts the embedded value.

const CRC24_INIT: u32 = 0x00B7_04CE;
const CRC24_POLY: u32 = 0x0186_4CFB;

/// Compute the 24-bit CRC of `data`.
///
/// Only the low 24 bits of the returned value are significant.
pub fn crc24(data: &[u8]) -> u32 {
    let mut crc = CRC24_INIT;
    for &byte in data {
        crc ^= (byte as u32) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}

/// Serialize a CRC24 value to its 3-byte big-endian form.
pub fn crc24_bytes(crc: u32) -> [u8; 3] {
    [(crc >> 16) as u8, (crc >> 8) as u8, crc as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc24_empty() {
        // CRC of no data is the init value.
        assert_eq!(crc24(&[]), 0x00B7_04CE);
    }

    #[test]
    fn test_crc24_check_value() {
        // The standard CRC-24/OPENPGP check value.
        assert_eq!(crc24(b"123456789"), 0x0021_CF02);
    }

    #[test]
    fn test_crc24_known_values() {
        assert_eq!(crc24(b"hello world"), 0x00B0_3CB7);
        let bytes: Vec<u8> = (0..16).collect();
        assert_eq!(crc24(&bytes), 0x001F_A032);
    }

    #[test]
    fn test_crc24_detects_flip() {
        let a = crc24(b"the quick brown fox");
        let b = crc24(b"the quick brown foy");
        assert_ne!(a, b);
    }

    #[test]
    fn test_crc24_bytes_layout() {
        let bytes = crc24_bytes(0x00AB_CDEF);
        assert_eq!(bytes, [0xAB, 0xCD, 0xEF]);
    }
}
