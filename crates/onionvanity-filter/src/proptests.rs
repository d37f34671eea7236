use super::*;

use onionvanity_crypto::{Base32, PrefixCodec};
use proptest::prelude::*;

fn filters_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z2-7]{1,3}", 1..6)
}

fn suffix_strategy() -> impl Strategy<Value = String> {
    "[a-z2-7]{52}"
}

/// Key whose base32 form starts with `text`
fn key_from_text(text: &str) -> [u8; KEY_LEN] {
    let decoded = Base32.decode(&text[..52]).unwrap();
    let mut key = [0u8; KEY_LEN];
    key.copy_from_slice(&decoded.bytes[..KEY_LEN]);
    key
}

fn oracle(filters: &[String], key: &[u8; KEY_LEN]) -> bool {
    let text = Base32.encode(key);
    filters.iter().any(|f| text.starts_with(f.as_str()))
}

fn all_configs() -> Vec<FilterConfig> {
    let mut configs = Vec::new();
    for layout in [Layout::Bytes, Layout::Masked, Layout::Unified] {
        for search in [SearchMode::Linear, SearchMode::Binary] {
            configs.push(FilterConfig {
                layout,
                search,
                quiet: true,
                ..FilterConfig::default()
            });
        }
    }
    configs
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_strategies_agree_with_text_match(
        filters in filters_strategy(),
        picks in prop::collection::vec((any::<prop::sample::Index>(), suffix_strategy()), 1..8),
        random_keys in prop::collection::vec(any::<[u8; KEY_LEN]>(), 1..8),
    ) {
        let mut keys = random_keys;
        for (pick, suffix) in &picks {
            let filter = pick.get(&filters);
            keys.push(key_from_text(&format!("{}{}", filter, suffix)));
        }

        for config in all_configs() {
            let mut set = FilterSet::<u64>::new(config.clone());
            let summary = set.add_all(filters.iter().map(String::as_str));
            prop_assert_eq!(summary.accepted, filters.len());
            let prepared = set.prepare();
            prop_assert!(prepared.is_sorted());

            for key in &keys {
                let expected = oracle(&filters, key);
                let found = prepared.find(key);
                prop_assert_eq!(found.is_some(), expected, "{:?} key {:02x?}", config, &key[..3]);
                if let Some(index) = found {
                    let prefix = prepared.prefix(index).unwrap();
                    prop_assert!(Base32.encode(key).starts_with(&prefix));
                }
            }
        }
    }

    #[test]
    fn prop_printed_prefixes_reproduce_filters(filters in filters_strategy()) {
        let config = FilterConfig {
            layout: Layout::Bytes,
            search: SearchMode::Linear,
            quiet: true,
            ..FilterConfig::default()
        };
        let mut set = FilterSet::<u64>::new(config);
        set.add_all(filters.iter().map(String::as_str));
        let prepared = set.prepare();

        let mut printed: Vec<String> =
            (0..prepared.len()).filter_map(|i| prepared.prefix(i)).collect();
        let mut expected = filters.clone();
        printed.sort();
        expected.sort();
        prop_assert_eq!(printed, expected);
    }

    #[test]
    fn prop_unify_preserves_accepted_keys(
        filters in prop::collection::vec((any::<u32>(), any::<u32>()), 1..5),
        keys in prop::collection::vec(any::<u32>(), 1..32),
        low_bits in any::<u32>(),
    ) {
        // keep the free bits few enough to enumerate
        let filters: Vec<(u32, u32)> = filters
            .into_iter()
            .map(|(value, mask)| (value & mask & 0xFFF0_0000, mask & 0xFFF0_0000))
            .collect();

        let mut unified = UnifiedFilters::new();
        for &(value, mask) in &filters {
            prop_assert!(unified.insert(value, mask, usize::MAX).is_ok());
        }
        let mask = unified.mask();
        prop_assert_eq!(mask, filters.iter().fold(0, |acc, &(_, m)| acc | m));

        let mut probes = keys;
        probes.extend(filters.iter().map(|&(value, _)| value | (low_bits & 0x000F_FFFF)));
        for key in probes {
            let expected = filters.iter().any(|&(value, m)| key & m == value);
            prop_assert_eq!(unified.values().contains(&(key & mask)), expected);
        }
    }

    #[test]
    fn prop_prepared_binary_matches_linear(
        filters in prop::collection::vec("[a-z2-7]{1,6}", 1..12),
        keys in prop::collection::vec(any::<[u8; KEY_LEN]>(), 1..16),
    ) {
        for layout in [Layout::Bytes, Layout::Masked] {
            let build = |search| {
                let mut set = FilterSet::<u64>::new(FilterConfig {
                    layout,
                    search,
                    quiet: true,
                    ..FilterConfig::default()
                });
                set.add_all(filters.iter().map(String::as_str));
                set.prepare()
            };
            let linear = build(SearchMode::Linear);
            let binary = build(SearchMode::Binary);
            for key in &keys {
                prop_assert_eq!(linear.is_match(key), binary.is_match(key));
            }
        }
    }
}
