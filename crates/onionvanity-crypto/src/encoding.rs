//! Prefix encoding: base32 digits to raw bytes plus a partial-byte mask

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Invalid character at offset {0}")]
    InvalidCharacter(usize),
}

/// Raw bytes decoded from a textual prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPrefix {
    /// Every byte touched by a digit, unset bits zeroed
    pub bytes: Vec<u8>,
    /// Bits of the final byte actually set by digits (`0xFF` when whole)
    pub mask: u8,
}

/// Converts between prefix text and the raw key bytes it constrains.
///
/// Implementations are stateless; the filter engine calls them once per
/// inserted filter and once per printed record.
pub trait PrefixCodec: Send + Sync {
    /// Bits carried by one digit
    fn bits_per_digit(&self) -> usize;

    /// Character offset of the first digit outside the alphabet
    fn first_invalid(&self, text: &str) -> Option<usize>;

    /// Decode text into bytes and the mask of the final byte
    fn decode(&self, text: &str) -> Result<DecodedPrefix, EncodingError>;

    /// Encode bytes, padding the final digit with zero bits
    fn encode(&self, bytes: &[u8]) -> String;

    /// Bytes touched by `digits` digits
    fn decoded_len(&self, digits: usize) -> usize {
        (digits * self.bits_per_digit() + 7) / 8
    }

    /// Whole digits that fit into `bytes` bytes
    fn digits_in(&self, bytes: usize) -> usize {
        bytes * 8 / self.bits_per_digit()
    }
}

// Onion addresses use lowercase RFC 4648 base32
const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Onion-style base32 codec
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base32;

#[inline]
fn base32_digit(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a'),
        '2'..='7' => Some(c as u8 - b'2' + 26),
        _ => None,
    }
}

impl PrefixCodec for Base32 {
    fn bits_per_digit(&self) -> usize {
        5
    }

    fn first_invalid(&self, text: &str) -> Option<usize> {
        text.chars().position(|c| base32_digit(c).is_none())
    }

    fn decode(&self, text: &str) -> Result<DecodedPrefix, EncodingError> {
        let mut bytes = Vec::with_capacity(self.decoded_len(text.len()));
        let mut value = 0u32;
        let mut bits = 0u32;

        for (i, c) in text.chars().enumerate() {
            let digit = base32_digit(c).ok_or(EncodingError::InvalidCharacter(i))?;
            value = (value << 5) | digit as u32;
            bits += 5;
            if bits >= 8 {
                bits -= 8;
                bytes.push((value >> bits) as u8);
                value &= (1 << bits) - 1;
            }
        }

        let mask = if bits > 0 {
            bytes.push((value << (8 - bits)) as u8);
            0xFFu8 << (8 - bits)
        } else {
            0xFF
        };

        Ok(DecodedPrefix { bytes, mask })
    }

    fn encode(&self, data: &[u8]) -> String {
        let mut result = String::with_capacity((data.len() * 8 + 4) / 5);
        let mut bits = 0u32;
        let mut value = 0u32;

        for &byte in data {
            value = ((value << 8) | byte as u32) & 0xFFF;
            bits += 8;
            while bits >= 5 {
                bits -= 5;
                result.push(BASE32_ALPHABET[((value >> bits) & 0x1F) as usize] as char);
            }
        }

        if bits > 0 {
            result.push(BASE32_ALPHABET[((value << (5 - bits)) & 0x1F) as usize] as char);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_byte() {
        let decoded = Base32.decode("ab").unwrap();
        assert_eq!(decoded.bytes, vec![0x00, 0x40]);
        assert_eq!(decoded.mask, 0xC0);
    }

    #[test]
    fn test_decode_whole_bytes() {
        // "fooba" in RFC 4648 test vectors
        let decoded = Base32.decode("mzxw6ytb").unwrap();
        assert_eq!(decoded.bytes, b"fooba".to_vec());
        assert_eq!(decoded.mask, 0xFF);
    }

    #[test]
    fn test_decode_single_digit() {
        let decoded = Base32.decode("7").unwrap();
        assert_eq!(decoded.bytes, vec![0xF8]);
        assert_eq!(decoded.mask, 0xF8);
    }

    #[test]
    fn test_encode_vectors() {
        assert_eq!(Base32.encode(b"f"), "my");
        assert_eq!(Base32.encode(b"foobar"), "mzxw6ytboi");
        assert_eq!(Base32.encode(&[]), "");
    }

    #[test]
    fn test_first_invalid() {
        assert_eq!(Base32.first_invalid("abc1e"), Some(3));
        assert_eq!(Base32.first_invalid("ABC"), Some(0));
        assert_eq!(Base32.first_invalid("onion234567"), None);
        assert_eq!(
            Base32.decode("ab8"),
            Err(EncodingError::InvalidCharacter(2))
        );
    }

    #[test]
    fn test_lengths() {
        assert_eq!(Base32.decoded_len(0), 0);
        assert_eq!(Base32.decoded_len(1), 1);
        assert_eq!(Base32.decoded_len(2), 2);
        assert_eq!(Base32.decoded_len(8), 5);
        assert_eq!(Base32.decoded_len(13), 9);
        assert_eq!(Base32.digits_in(8), 12);
        assert_eq!(Base32.digits_in(32), 51);
    }
}
