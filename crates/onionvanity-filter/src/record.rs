//! Filter records: the normalized form of one accepted prefix

use std::cmp::Ordering;

use crate::packed::PackedInt;

/// Length of the keys candidates are matched on (ed25519 public key)
pub const KEY_LEN: usize = 32;

/// Longest prefix the byte-array layout can hold
pub const MAX_PREFIX_BYTES: usize = KEY_LEN;

/// Variable-length byte prefix with a mask on its final byte.
///
/// Bytes past `tail` are always zero and the final byte is pre-masked, so
/// derived equality agrees with [`Ord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteFilter {
    bytes: [u8; MAX_PREFIX_BYTES],
    /// Index of the final significant byte (significant byte count minus one)
    tail: usize,
    /// Bits of the final byte taking part in the comparison
    mask: u8,
}

impl ByteFilter {
    /// Build from `1..=MAX_PREFIX_BYTES` significant bytes.
    pub(crate) fn new(prefix: &[u8], mask: u8) -> Self {
        debug_assert!(!prefix.is_empty() && prefix.len() <= MAX_PREFIX_BYTES);
        let tail = prefix.len() - 1;
        let mut bytes = [0u8; MAX_PREFIX_BYTES];
        bytes[..=tail].copy_from_slice(prefix);
        bytes[tail] &= mask;
        Self { bytes, tail, mask }
    }

    /// Significant bytes, the last one masked
    pub fn prefix(&self) -> &[u8] {
        &self.bytes[..=self.tail]
    }

    /// Number of significant bytes
    pub fn significant_bytes(&self) -> usize {
        self.tail + 1
    }

    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Number of key bits this filter constrains
    pub fn bits(&self) -> u32 {
        self.tail as u32 * 8 + self.mask.leading_ones()
    }

    #[inline]
    pub fn matches(&self, key: &[u8; KEY_LEN]) -> bool {
        key[..self.tail] == self.bytes[..self.tail]
            && key[self.tail] & self.mask == self.bytes[self.tail]
    }

    /// Where `key` falls relative to the key range this filter accepts
    #[inline]
    pub fn probe(&self, key: &[u8; KEY_LEN]) -> Ordering {
        key[..self.tail]
            .cmp(&self.bytes[..self.tail])
            .then_with(|| (key[self.tail] & self.mask).cmp(&self.bytes[self.tail]))
    }

    /// True when every key accepted by `other` is accepted by `self`
    pub fn covers(&self, other: &ByteFilter) -> bool {
        if self.tail > other.tail {
            return false;
        }
        // equal length: other must be at least as precise on the last byte
        if self.tail == other.tail && other.mask & self.mask != self.mask {
            return false;
        }
        self.bytes[..self.tail] == other.bytes[..self.tail]
            && other.bytes[self.tail] & self.mask == self.bytes[self.tail]
    }
}

impl Ord for ByteFilter {
    /// Shared significant bytes first, then shorter before longer, then by mask
    fn cmp(&self, other: &Self) -> Ordering {
        let shared = self.tail.min(other.tail) + 1;
        self.bytes[..shared]
            .cmp(&other.bytes[..shared])
            .then(self.tail.cmp(&other.tail))
            .then(self.mask.cmp(&other.mask))
    }
}

impl PartialOrd for ByteFilter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Packed-integer prefix carrying its own mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskedFilter<I> {
    value: I,
    mask: I,
}

impl<I: PackedInt> MaskedFilter<I> {
    /// The value is stored pre-masked
    pub fn new(value: I, mask: I) -> Self {
        Self {
            value: value & mask,
            mask,
        }
    }

    pub fn value(&self) -> I {
        self.value
    }

    pub fn mask(&self) -> I {
        self.mask
    }

    pub fn bits(&self) -> u32 {
        self.mask.leading_ones()
    }

    #[inline]
    pub fn matches(&self, key: I) -> bool {
        key & self.mask == self.value
    }

    /// The key is masked with this record's own mask before comparing
    #[inline]
    pub fn probe(&self, key: I) -> Ordering {
        (key & self.mask).cmp(&self.value)
    }

    pub fn covers(&self, other: &MaskedFilter<I>) -> bool {
        other.mask & self.mask == self.mask && other.value & self.mask == self.value
    }
}

impl<I: PackedInt> Ord for MaskedFilter<I> {
    /// Value first, mask as tie-break; both big-endian significant
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then(self.mask.cmp(&other.mask))
    }
}

impl<I: PackedInt> PartialOrd for MaskedFilter<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_with(prefix: &[u8]) -> [u8; KEY_LEN] {
        let mut key = [0xFFu8; KEY_LEN];
        key[..prefix.len()].copy_from_slice(prefix);
        key
    }

    #[test]
    fn test_byte_filter_matches_partial_byte() {
        // 10 bits: 0x00 then top two bits 01
        let filter = ByteFilter::new(&[0x00, 0x7F], 0xC0);
        assert_eq!(filter.prefix(), &[0x00, 0x40]);
        assert_eq!(filter.bits(), 10);
        assert!(filter.matches(&key_with(&[0x00, 0x40])));
        assert!(filter.matches(&key_with(&[0x00, 0x7F])));
        assert!(!filter.matches(&key_with(&[0x00, 0x80])));
        assert!(!filter.matches(&key_with(&[0x01, 0x40])));
    }

    #[test]
    fn test_byte_filter_probe() {
        let filter = ByteFilter::new(&[0x10, 0x40], 0xC0);
        assert_eq!(filter.probe(&key_with(&[0x0F])), Ordering::Less);
        assert_eq!(filter.probe(&key_with(&[0x10, 0x00])), Ordering::Less);
        assert_eq!(filter.probe(&key_with(&[0x10, 0x55])), Ordering::Equal);
        assert_eq!(filter.probe(&key_with(&[0x10, 0x80])), Ordering::Greater);
    }

    #[test]
    fn test_byte_filter_order() {
        let short = ByteFilter::new(&[0x10], 0xF8);
        let long = ByteFilter::new(&[0x10, 0x00], 0xC0);
        let later = ByteFilter::new(&[0x18], 0xF8);
        assert!(short < long);
        assert!(long < later);
        assert!(ByteFilter::new(&[0x10], 0xC0) < short);
    }

    #[test]
    fn test_byte_filter_covers() {
        let short = ByteFilter::new(&[0x10], 0xF8);
        let long = ByteFilter::new(&[0x12, 0x00], 0xC0);
        let other = ByteFilter::new(&[0x18, 0x00], 0xC0);
        assert!(short.covers(&long));
        assert!(short.covers(&short));
        assert!(!long.covers(&short));
        assert!(!short.covers(&other));
    }

    #[test]
    fn test_masked_filter_premasks_value() {
        let filter = MaskedFilter::new(0xFFFF_FFFFu32, 0xFFC0_0000);
        assert_eq!(filter.value(), 0xFFC0_0000);
        assert_eq!(filter.bits(), 10);
        assert!(filter.matches(0xFFC1_2345));
        assert!(!filter.matches(0xFF80_0000));
    }

    #[test]
    fn test_masked_filter_order_and_probe() {
        let a = MaskedFilter::new(0x1000_0000u32, 0xFF00_0000);
        let b = MaskedFilter::new(0x1000_0000u32, 0xFFF0_0000);
        let c = MaskedFilter::new(0x1100_0000u32, 0xFF00_0000);
        assert!(a < b && b < c);
        assert!(a.covers(&b));
        assert!(!b.covers(&a));
        assert_eq!(c.probe(0x10FF_FFFF), Ordering::Less);
        assert_eq!(c.probe(0x11AB_CDEF), Ordering::Equal);
        assert_eq!(c.probe(0x1200_0000), Ordering::Greater);
    }
}
