//! Matching strategies
//!
//! Linear scan or binary search, over byte prefixes, per-record masks or a
//! shared mask. All of them give the same accept/reject answer for the same
//! filters; they differ only in cost.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::packed::PackedInt;
use crate::record::{ByteFilter, MaskedFilter, KEY_LEN};

/// How records are searched for a candidate key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchMode {
    /// Test every record in order
    Linear,
    /// Binary search over the sorted records
    #[default]
    Binary,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Linear => write!(f, "linear"),
            SearchMode::Binary => write!(f, "binary"),
        }
    }
}

/// Finds a filter accepting a candidate key.
///
/// Implementors are read-only after construction and may be shared by any
/// number of search workers.
pub trait PrefixMatch {
    /// Index of a record accepting `key`, or `None`
    fn find(&self, key: &[u8; KEY_LEN]) -> Option<usize>;

    #[inline]
    fn is_match(&self, key: &[u8; KEY_LEN]) -> bool {
        self.find(key).is_some()
    }
}

#[inline]
pub(crate) fn find_bytes(
    records: &[ByteFilter],
    key: &[u8; KEY_LEN],
    mode: SearchMode,
) -> Option<usize> {
    match mode {
        SearchMode::Linear => records.iter().position(|f| f.matches(key)),
        SearchMode::Binary => records.binary_search_by(|f| f.probe(key).reverse()).ok(),
    }
}

#[inline]
pub(crate) fn find_masked<I: PackedInt>(
    records: &[MaskedFilter<I>],
    key: I,
    mode: SearchMode,
) -> Option<usize> {
    match mode {
        SearchMode::Linear => records.iter().position(|f| f.matches(key)),
        SearchMode::Binary => records.binary_search_by(|f| f.probe(key).reverse()).ok(),
    }
}

/// The key is masked once; every probe is then a plain equality test
#[inline]
pub(crate) fn find_unified<I: PackedInt>(
    values: &[I],
    mask: I,
    key: I,
    mode: SearchMode,
) -> Option<usize> {
    let masked = key & mask;
    match mode {
        SearchMode::Linear => values.iter().position(|&v| v == masked),
        SearchMode::Binary => values.binary_search(&masked).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(prefix: &[u8]) -> [u8; KEY_LEN] {
        let mut key = [0xA5u8; KEY_LEN];
        key[..prefix.len()].copy_from_slice(prefix);
        key
    }

    #[test]
    fn test_search_mode_display() {
        assert_eq!(SearchMode::Linear.to_string(), "linear");
        assert_eq!(SearchMode::Binary.to_string(), "binary");
        assert_eq!(SearchMode::default(), SearchMode::Binary);
    }

    #[test]
    fn test_bytes_strategies_agree() {
        let mut records = vec![
            ByteFilter::new(&[0x20], 0xF8),
            ByteFilter::new(&[0x00, 0x40], 0xC0),
            ByteFilter::new(&[0x90, 0x12, 0x34], 0xFF),
        ];
        records.sort();

        for probe in [
            key(&[0x00, 0x7F]),
            key(&[0x21]),
            key(&[0x90, 0x12, 0x34]),
            key(&[0x90, 0x12, 0x35]),
            key(&[0x08]),
        ] {
            let linear = find_bytes(&records, &probe, SearchMode::Linear);
            let binary = find_bytes(&records, &probe, SearchMode::Binary);
            assert_eq!(linear, binary, "key {:02x?}", &probe[..3]);
        }
        assert!(find_bytes(&records, &key(&[0x08]), SearchMode::Binary).is_none());
        assert!(find_bytes(&records, &key(&[0x27]), SearchMode::Binary).is_some());
    }

    #[test]
    fn test_masked_binary_masks_with_probed_record() {
        let mut records = vec![
            MaskedFilter::new(0x1200_0000u32, 0xFF00_0000),
            MaskedFilter::new(0x1340_0000u32, 0xFFC0_0000),
            MaskedFilter::new(0xF000_0000u32, 0xF000_0000),
        ];
        records.sort();

        assert_eq!(find_masked(&records, 0x12FF_FFFF, SearchMode::Binary), Some(0));
        assert_eq!(find_masked(&records, 0x137F_0000, SearchMode::Binary), Some(1));
        assert_eq!(find_masked(&records, 0x1380_0000, SearchMode::Binary), None);
        assert_eq!(find_masked(&records, 0xFABC_DEF0, SearchMode::Binary), Some(2));
        assert_eq!(find_masked(&records, 0xFABC_DEF0, SearchMode::Linear), Some(2));
    }

    #[test]
    fn test_unified_masks_key_once() {
        let values = [0x0000_0000u32, 0x0040_0000, 0x0080_0000];
        let mask = 0xFFC0_0000;
        assert_eq!(find_unified(&values, mask, 0x007F_FFFF, SearchMode::Binary), Some(1));
        assert_eq!(find_unified(&values, mask, 0x007F_FFFF, SearchMode::Linear), Some(1));
        assert_eq!(find_unified(&values, mask, 0x00C0_0000, SearchMode::Binary), None);
    }
}
