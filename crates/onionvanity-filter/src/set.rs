//! Filter set lifecycle
//!
//! A [`FilterSet`] collects filters (from arguments or a file), then
//! [`FilterSet::prepare`] sorts it and hands back an immutable [`Filters`]
//! that search workers share for matching.

use std::fmt::{self, Write as _};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use onionvanity_crypto::{Base32, DecodedPrefix, PrefixCodec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::difficulty::expected_attempts;
use crate::error::FilterError;
use crate::matcher::{self, PrefixMatch, SearchMode};
use crate::packed::{prefix_mask, PackedInt};
use crate::record::{ByteFilter, MaskedFilter, KEY_LEN, MAX_PREFIX_BYTES};
use crate::unify::UnifiedFilters;

/// Records listed by [`Filters::describe`] before the rest is summarized
const PRINT_LIMIT: usize = 20;

/// Default cap on the number of records mask unification may create
pub const DEFAULT_EXPANSION_LIMIT: usize = 1 << 24;

/// Storage layout of the filter records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layout {
    /// Byte prefixes of any length up to a full key, each with its own mask
    Bytes,
    /// Packed integers, each with its own mask
    Masked,
    /// Packed integers sharing one mask
    #[default]
    Unified,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Bytes => write!(f, "bytes"),
            Layout::Masked => write!(f, "masked"),
            Layout::Unified => write!(f, "unified"),
        }
    }
}

/// Filter engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub layout: Layout,
    pub search: SearchMode,
    /// Suppress progress messages and the filter listing
    pub quiet: bool,
    /// Drop records already accepted by a less precise record
    pub dedup: bool,
    /// Most records unification may grow the set to
    pub expansion_limit: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            search: SearchMode::default(),
            quiet: false,
            dedup: false,
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}

impl FilterConfig {
    /// Whether `prepare` removes covered records.
    ///
    /// Binary search over per-record masks can step past a short prefix
    /// when a longer prefix it covers sits next to it, so those layouts
    /// always drop covered records.
    pub fn removes_covered(&self) -> bool {
        self.dedup || (self.search == SearchMode::Binary && self.layout != Layout::Unified)
    }
}

/// Result of adding one filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Added {
    /// Records added; more than one when the filter was expanded
    Records(usize),
    /// Filter decoded to no bytes and was ignored
    Empty,
}

/// Counts from loading several filters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub accepted: usize,
    pub ignored: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone)]
enum Records<I> {
    Bytes(Vec<ByteFilter>),
    Masked(Vec<MaskedFilter<I>>),
    Unified(UnifiedFilters<I>),
}

impl<I: PackedInt> Records<I> {
    fn new(layout: Layout) -> Self {
        match layout {
            Layout::Bytes => Records::Bytes(Vec::new()),
            Layout::Masked => Records::Masked(Vec::new()),
            Layout::Unified => Records::Unified(UnifiedFilters::new()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Records::Bytes(r) => r.len(),
            Records::Masked(r) => r.len(),
            Records::Unified(u) => u.len(),
        }
    }

    fn sort(&mut self) {
        match self {
            Records::Bytes(r) => r.sort_unstable(),
            Records::Masked(r) => r.sort_unstable(),
            Records::Unified(u) => u.values_mut().sort_unstable(),
        }
    }

    /// Drop records covered by an earlier kept one; expects sorted records
    fn remove_covered(&mut self) -> usize {
        match self {
            Records::Bytes(r) => retain_uncovered(r, ByteFilter::covers),
            Records::Masked(r) => retain_uncovered(r, MaskedFilter::covers),
            Records::Unified(u) => {
                let values = u.values_mut();
                let before = values.len();
                values.dedup();
                before - values.len()
            }
        }
    }

    /// Significant bytes of a record and the mask of its final byte
    fn raw(&self, index: usize) -> Option<(Vec<u8>, u8)> {
        match self {
            Records::Bytes(r) => r.get(index).map(|f| (f.prefix().to_vec(), f.mask())),
            Records::Masked(r) => r.get(index).map(|f| packed_raw(f.value(), f.mask())),
            Records::Unified(u) => u.values().get(index).map(|&v| packed_raw(v, u.mask())),
        }
    }

    #[cfg(test)]
    fn is_sorted(&self) -> bool {
        match self {
            Records::Bytes(r) => r.windows(2).all(|w| w[0] <= w[1]),
            Records::Masked(r) => r.windows(2).all(|w| w[0] <= w[1]),
            Records::Unified(u) => u.values().windows(2).all(|w| w[0] <= w[1]),
        }
    }

    fn bit_length(&self, index: usize) -> Option<u32> {
        match self {
            Records::Bytes(r) => r.get(index).map(ByteFilter::bits),
            Records::Masked(r) => r.get(index).map(MaskedFilter::bits),
            Records::Unified(u) => u.values().get(index).map(|_| u.mask().count_ones()),
        }
    }
}

/// Sorted sweep: a record is dropped when the last kept record covers it.
/// Covering records sort before what they cover, and anything sorted
/// between them is covered as well.
fn retain_uncovered<T: Copy>(records: &mut Vec<T>, covers: impl Fn(&T, &T) -> bool) -> usize {
    let before = records.len();
    let mut last: Option<T> = None;
    records.retain(|record| {
        if let Some(kept) = &last {
            if covers(kept, record) {
                return false;
            }
        }
        last = Some(*record);
        true
    });
    before - records.len()
}

fn packed_raw<I: PackedInt>(value: I, mask: I) -> (Vec<u8>, u8) {
    let mask_bytes = mask.to_be_vec();
    let len = mask_bytes.iter().take_while(|&&b| b != 0).count();
    let mut bytes = value.to_be_vec();
    bytes.truncate(len);
    let tail = if len == 0 { 0xFF } else { mask_bytes[len - 1] };
    (bytes, tail)
}

/// Longest text every key accepted by the record starts with
fn canonical_prefix<C: PrefixCodec>(codec: &C, bytes: &[u8], mask: u8) -> String {
    let low = codec.encode(bytes);
    let mut high_bytes = bytes.to_vec();
    if let Some(last) = high_bytes.last_mut() {
        *last |= !mask;
    }
    let high = codec.encode(&high_bytes);
    low.chars()
        .zip(high.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a)
        .collect()
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        "filter"
    } else {
        "filters"
    }
}

/// Filters being collected, before sorting
#[derive(Debug, Clone)]
pub struct FilterSet<I = u64, C = Base32> {
    config: FilterConfig,
    codec: C,
    records: Records<I>,
}

impl<I: PackedInt> FilterSet<I, Base32> {
    pub fn new(config: FilterConfig) -> Self {
        Self::with_codec(config, Base32)
    }
}

impl<I: PackedInt, C: PrefixCodec> FilterSet<I, C> {
    pub fn with_codec(config: FilterConfig, codec: C) -> Self {
        let records = Records::new(config.layout);
        Self {
            config,
            codec,
            records,
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Number of stored records, counting every expanded record
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    /// Whether unification had to expand any record so far
    pub fn is_flattened(&self) -> bool {
        matches!(&self.records, Records::Unified(u) if u.is_flattened())
    }

    /// Longest prefix in bytes the configured layout can store
    pub fn max_prefix_bytes(&self) -> usize {
        match self.config.layout {
            Layout::Bytes => MAX_PREFIX_BYTES,
            Layout::Masked | Layout::Unified => I::BYTES,
        }
    }

    /// Parse and store one filter.
    ///
    /// A leading `^` is accepted and ignored. An empty filter is not an
    /// error but adds nothing. When the shared-mask layout would grow past
    /// `expansion_limit` records, the set switches to the masked layout and
    /// the filter is stored with its own mask.
    pub fn add(&mut self, filter: &str) -> Result<Added, FilterError> {
        let text = filter.strip_prefix('^').unwrap_or(filter);

        if let Some(position) = self.codec.first_invalid(text) {
            return Err(FilterError::InvalidCharacter {
                filter: text.to_string(),
                position,
            });
        }

        let len = self.codec.decoded_len(text.chars().count());
        if len == 0 {
            return Ok(Added::Empty);
        }
        let max = self.max_prefix_bytes();
        if len > max {
            return Err(FilterError::TooLong {
                filter: text.to_string(),
                max_digits: self.codec.digits_in(max),
            });
        }

        let DecodedPrefix { bytes, mask } = self.codec.decode(text)?;
        let packed =
            || MaskedFilter::new(I::from_be_prefix(&bytes), prefix_mask(bytes.len(), mask));
        let inserted = match &mut self.records {
            Records::Bytes(records) => {
                records.push(ByteFilter::new(&bytes, mask));
                Ok(1)
            }
            Records::Masked(records) => {
                records.push(packed());
                Ok(1)
            }
            Records::Unified(unified) => {
                let record = packed();
                unified.insert(record.value(), record.mask(), self.config.expansion_limit)
            }
        };

        let added = match inserted {
            Ok(added) => added,
            Err(needed) => {
                self.switch_to_record_masks(text, needed);
                if let Records::Masked(records) = &mut self.records {
                    records.push(packed());
                }
                1
            }
        };

        debug!(filter = text, records = added, "filter added");
        Ok(Added::Records(added))
    }

    /// Move the shared-mask records to per-record masks once unifying
    /// would need more than `expansion_limit` records. Every stored value
    /// keeps the shared mask, so the set accepts the same keys as before.
    fn switch_to_record_masks(&mut self, filter: &str, needed: usize) {
        let Records::Unified(unified) = &self.records else {
            return;
        };
        let mask = unified.mask();
        let records: Vec<_> = unified
            .values()
            .iter()
            .map(|&value| MaskedFilter::new(value, mask))
            .collect();

        warn!(
            filter,
            needed,
            limit = self.config.expansion_limit,
            "shared mask needs too many records, using per-record masks"
        );
        self.records = Records::Masked(records);
        self.config.layout = Layout::Masked;
    }

    /// Add filters one by one; failures are reported on stderr and skipped
    pub fn add_all<'a>(&mut self, filters: impl IntoIterator<Item = &'a str>) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for filter in filters {
            self.add_reported(filter, &mut summary);
        }
        summary
    }

    fn add_reported(&mut self, filter: &str, summary: &mut LoadSummary) {
        match self.add(filter) {
            Ok(Added::Records(_)) => summary.accepted += 1,
            Ok(Added::Empty) => summary.ignored += 1,
            Err(err) => {
                eprintln!("{}", err.diagnostic());
                summary.rejected += 1;
            }
        }
    }

    /// One filter per line. Blank lines and lines starting with `#` or `//`
    /// are skipped; a bad filter is reported and loading continues.
    pub fn load_reader<R: BufRead>(&mut self, reader: R) -> std::io::Result<LoadSummary> {
        let mut summary = LoadSummary::default();
        for line in reader.lines() {
            let line = line?;
            let line = line.strip_suffix('\r').unwrap_or(&line);
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            self.add_reported(line, &mut summary);
        }
        Ok(summary)
    }

    /// Load a filter file. Failing to open or read it is fatal.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, FilterError> {
        let path = path.as_ref();
        let io_error = |source| FilterError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let summary = self.load_reader(BufReader::new(file)).map_err(io_error)?;

        if !self.config.quiet {
            info!(
                path = %path.display(),
                accepted = summary.accepted,
                ignored = summary.ignored,
                rejected = summary.rejected,
                "loaded filter file"
            );
        }
        Ok(summary)
    }

    /// Sort the records (and drop covered ones where configured) for matching
    pub fn prepare(self) -> Filters<I, C> {
        let FilterSet {
            config,
            codec,
            mut records,
        } = self;

        if !config.quiet {
            info!(records = records.len(), "sorting filters");
        }
        records.sort();

        if config.removes_covered() {
            let removed = records.remove_covered();
            if !config.quiet {
                info!(removed, remaining = records.len(), "removed duplicate filters");
            }
        }

        Filters {
            config,
            codec,
            records,
        }
    }
}

/// Sorted, read-only filters ready for matching
#[derive(Debug, Clone)]
pub struct Filters<I = u64, C = Base32> {
    config: FilterConfig,
    codec: C,
    records: Records<I>,
}

impl<I: PackedInt, C: PrefixCodec> Filters<I, C> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.len() == 0
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn layout(&self) -> Layout {
        self.config.layout
    }

    pub fn search_mode(&self) -> SearchMode {
        self.config.search
    }

    /// The shared mask, for the unified layout
    pub fn global_mask(&self) -> Option<I> {
        match &self.records {
            Records::Unified(u) if !u.is_empty() => Some(u.mask()),
            _ => None,
        }
    }

    pub fn is_flattened(&self) -> bool {
        matches!(&self.records, Records::Unified(u) if u.is_flattened())
    }

    #[cfg(test)]
    pub(crate) fn is_sorted(&self) -> bool {
        self.records.is_sorted()
    }

    /// Key bits constrained by record `index`
    pub fn bit_length(&self, index: usize) -> Option<u32> {
        self.records.bit_length(index)
    }

    /// Text form of record `index`; feeding it back yields the same record
    pub fn prefix(&self, index: usize) -> Option<String> {
        self.records
            .raw(index)
            .map(|(bytes, mask)| canonical_prefix(&self.codec, &bytes, mask))
    }

    /// Expected keys to generate per match
    pub fn expected_attempts(&self) -> f64 {
        expected_attempts((0..self.len()).filter_map(|i| self.bit_length(i)))
    }

    /// Listing of the first records and the total count
    pub fn describe(&self) -> String {
        let total = self.len();
        let mut out = String::new();

        if total > 0 {
            out.push_str("filters:\n");
        }
        for i in 0..total.min(PRINT_LIMIT) {
            let _ = writeln!(out, "\t{}", self.prefix(i).unwrap_or_default());
        }
        if total > PRINT_LIMIT {
            let hidden = total - PRINT_LIMIT;
            let _ = writeln!(out, "[another {} {} not shown]", hidden, plural(hidden));
        }
        let _ = writeln!(out, "in total, {} {}", total, plural(total));
        out
    }

    /// Write [`describe`](Self::describe) to stderr unless quiet
    pub fn print(&self) {
        if !self.config.quiet {
            eprint!("{}", self.describe());
        }
    }

    #[inline]
    pub fn find(&self, key: &[u8; KEY_LEN]) -> Option<usize> {
        let mode = self.config.search;
        match &self.records {
            Records::Bytes(r) => matcher::find_bytes(r, key, mode),
            Records::Masked(r) => matcher::find_masked(r, I::from_be_prefix(key), mode),
            Records::Unified(u) => {
                matcher::find_unified(u.values(), u.mask(), I::from_be_prefix(key), mode)
            }
        }
    }
}

impl<I: PackedInt, C: PrefixCodec> PrefixMatch for Filters<I, C> {
    #[inline]
    fn find(&self, key: &[u8; KEY_LEN]) -> Option<usize> {
        Filters::find(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config(layout: Layout, search: SearchMode) -> FilterConfig {
        FilterConfig {
            layout,
            search,
            quiet: true,
            ..FilterConfig::default()
        }
    }

    fn all_configs() -> Vec<FilterConfig> {
        let mut configs = Vec::new();
        for layout in [Layout::Bytes, Layout::Masked, Layout::Unified] {
            for search in [SearchMode::Linear, SearchMode::Binary] {
                configs.push(config(layout, search));
            }
        }
        configs
    }

    fn key_with(prefix: &[u8]) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        key[..prefix.len()].copy_from_slice(prefix);
        key
    }

    #[test]
    fn test_two_digit_filter_matches_ten_bits() {
        for cfg in all_configs() {
            let mut set = FilterSet::<u64>::new(cfg.clone());
            assert_eq!(set.add("aa").unwrap(), Added::Records(1));
            let filters = set.prepare();

            assert_eq!(filters.bit_length(0), Some(10));
            assert_eq!(filters.find(&key_with(&[0x00, 0x3F, 0xFF])), Some(0), "{:?}", cfg);
            assert!(!filters.is_match(&key_with(&[0x10])), "{:?}", cfg);
        }
    }

    #[test]
    fn test_coarse_filter_flattens_unified_set() {
        let mut set = FilterSet::<u64>::new(config(Layout::Unified, SearchMode::Binary));
        set.add("ab").unwrap();
        assert_eq!(set.add("a").unwrap(), Added::Records(32));
        assert!(set.is_flattened());

        let filters = set.prepare();
        assert_eq!(filters.len(), 33);
        assert_eq!(filters.global_mask(), Some(0xFFC0 << 48));
        assert!(filters.is_flattened());
        // any key starting with "a" matches, whatever its second digit
        assert!(filters.is_match(&key_with(&[0x07, 0xC0])));
        assert!(!filters.is_match(&key_with(&[0x08])));
    }

    #[test]
    fn test_dedup_removes_expanded_duplicate() {
        let mut cfg = config(Layout::Unified, SearchMode::Binary);
        cfg.dedup = true;
        let mut set = FilterSet::<u64>::new(cfg);
        set.add("ab").unwrap();
        set.add("a").unwrap();
        assert_eq!(set.prepare().len(), 32);
    }

    #[test]
    fn test_binary_per_record_masks_drop_covered() {
        for layout in [Layout::Bytes, Layout::Masked] {
            let mut set = FilterSet::<u64>::new(config(layout, SearchMode::Binary));
            set.add_all(["a", "ab", "aab", "b"]);
            let filters = set.prepare();
            assert_eq!(filters.len(), 2, "{:?}", layout);
            assert_eq!(filters.prefix(0).as_deref(), Some("a"));
            assert_eq!(filters.prefix(1).as_deref(), Some("b"));
            assert!(filters.is_match(&key_with(&[0x00, 0x00])));
        }
    }

    #[test]
    fn test_invalid_character_leaves_set_unchanged() {
        let mut set = FilterSet::<u64>::new(FilterConfig::default());
        set.add("ab").unwrap();

        let err = set.add("abc1e").unwrap_err();
        assert!(matches!(err, FilterError::InvalidCharacter { position: 3, .. }));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_too_long_for_width() {
        let mut set = FilterSet::<u64>::new(config(Layout::Masked, SearchMode::Binary));
        let err = set.add(&"a".repeat(13)).unwrap_err();
        assert!(matches!(err, FilterError::TooLong { max_digits: 12, .. }));
        assert_eq!(set.len(), 0);
        assert_eq!(set.add(&"a".repeat(12)).unwrap(), Added::Records(1));

        let mut bytes = FilterSet::<u64>::new(config(Layout::Bytes, SearchMode::Binary));
        assert!(bytes.add(&"a".repeat(51)).is_ok());
        let err = bytes.add(&"a".repeat(52)).unwrap_err();
        assert!(matches!(err, FilterError::TooLong { max_digits: 51, .. }));
    }

    #[test]
    fn test_anchor_and_empty() {
        let mut set = FilterSet::<u32>::new(FilterConfig::default());
        assert_eq!(set.add("^").unwrap(), Added::Empty);
        assert_eq!(set.add("").unwrap(), Added::Empty);
        assert_eq!(set.add("^xy").unwrap(), Added::Records(1));
        assert_eq!(set.prepare().prefix(0).as_deref(), Some("xy"));
    }

    #[test]
    fn test_expansion_limit_switches_to_record_masks() {
        let mut cfg = config(Layout::Unified, SearchMode::Binary);
        cfg.expansion_limit = 100;
        let mut set = FilterSet::<u64>::new(cfg);
        set.add("abcd").unwrap();
        assert_eq!(set.add("a").unwrap(), Added::Records(1));
        assert_eq!(set.config().layout, Layout::Masked);
        assert_eq!(set.len(), 2);

        let filters = set.prepare();
        assert_eq!(filters.layout(), Layout::Masked);
        assert_eq!(filters.global_mask(), None);
        assert_eq!(filters.prefix(0).as_deref(), Some("a"));
        assert!(filters.is_match(&key_with(&[0x07, 0xFF])));
        assert!(!filters.is_match(&key_with(&[0x08])));
    }

    #[test]
    fn test_default_config_keeps_far_apart_filters() {
        let mut set = FilterSet::<u64>::new(FilterConfig {
            quiet: true,
            ..FilterConfig::default()
        });
        let summary = set.add_all(["test", "onionsite"]);
        assert_eq!(
            summary,
            LoadSummary {
                accepted: 2,
                ignored: 0,
                rejected: 0
            }
        );
        let filters = set.prepare();

        let codec = Base32;
        for text in ["test", "onionsite"] {
            let padded = format!("{:a<52}", text);
            let bytes = codec.decode(&padded).unwrap().bytes;
            let key: [u8; KEY_LEN] = bytes[..KEY_LEN].try_into().unwrap();
            let index = filters.find(&key).unwrap();
            assert!(padded.starts_with(&filters.prefix(index).unwrap()));
        }
        assert!(!filters.is_match(&key_with(&[0xFF; 8])));
    }

    #[test]
    fn test_load_reader_skips_comments() {
        let input = "# header\n\nab\n// note\nzz\r\nab!\n^\n";
        let mut set = FilterSet::<u64>::new(config(Layout::Bytes, SearchMode::Linear));
        let summary = set.load_reader(Cursor::new(input)).unwrap();
        assert_eq!(
            summary,
            LoadSummary {
                accepted: 2,
                ignored: 1,
                rejected: 1
            }
        );
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_load_reader_keeps_inner_whitespace() {
        let input = "zz  \n yy\n";
        let mut set = FilterSet::<u64>::new(config(Layout::Bytes, SearchMode::Linear));
        let summary = set.load_reader(Cursor::new(input)).unwrap();
        assert_eq!(summary.rejected, 2);
        assert!(set.is_empty());
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let mut set = FilterSet::<u64>::new(FilterConfig::default());
        let err = set.load_file("/nonexistent/onionvanity/filters.txt").unwrap_err();
        assert!(matches!(err, FilterError::Io { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_print_round_trip() {
        for cfg in all_configs() {
            let mut set = FilterSet::<u64>::new(cfg);
            set.add("abcd").unwrap();
            let filters = set.prepare();
            assert_eq!(filters.describe(), "filters:\n\tabcd\nin total, 1 filter\n");
        }
    }

    #[test]
    fn test_describe_truncates() {
        let mut set = FilterSet::<u64>::new(config(Layout::Unified, SearchMode::Binary));
        set.add("ab").unwrap();
        set.add("a").unwrap();
        let text = set.prepare().describe();

        assert_eq!(text.lines().filter(|l| l.starts_with('\t')).count(), 20);
        assert!(text.contains("[another 13 filters not shown]\n"));
        assert!(text.ends_with("in total, 33 filters\n"));
    }

    #[test]
    fn test_describe_empty() {
        let filters = FilterSet::<u64>::new(FilterConfig::default()).prepare();
        assert_eq!(filters.describe(), "in total, 0 filters\n");
        assert!(filters.expected_attempts().is_infinite());
        assert!(!filters.is_match(&key_with(&[])));
    }

    #[test]
    fn test_expected_attempts() {
        let mut set = FilterSet::<u64>::new(config(Layout::Bytes, SearchMode::Linear));
        set.add_all(["ab", "cd"]);
        assert_eq!(set.prepare().expected_attempts(), 512.0);
    }

    #[test]
    fn test_layout_display() {
        assert_eq!(Layout::Bytes.to_string(), "bytes");
        assert_eq!(Layout::Masked.to_string(), "masked");
        assert_eq!(Layout::default(), Layout::Unified);
    }

    #[test]
    fn test_filters_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Filters<u64>>();
        assert_send_sync::<Filters<u128>>();
    }
}
