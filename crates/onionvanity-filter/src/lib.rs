//! OnionVanity Filter Engine
//!
//! Prefix filters over ed25519 public keys. Filters are parsed from base32
//! text into bytes plus a partial-byte mask, stored in one of three layouts,
//! sorted, and then matched against every candidate key the search produces.

mod difficulty;
mod error;
mod matcher;
mod packed;
mod record;
mod set;
mod unify;

pub use difficulty::{estimate_time_50pct, expected_attempts, format_difficulty, format_duration};
pub use error::FilterError;
pub use matcher::{PrefixMatch, SearchMode};
pub use packed::{prefix_mask, PackedInt};
pub use record::{ByteFilter, MaskedFilter, KEY_LEN, MAX_PREFIX_BYTES};
pub use set::{
    Added, FilterConfig, FilterSet, Filters, Layout, LoadSummary, DEFAULT_EXPANSION_LIMIT,
};
pub use unify::UnifiedFilters;

#[cfg(test)]
mod proptests;
