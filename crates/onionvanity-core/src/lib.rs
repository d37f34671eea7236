//! OnionVanity Core Engine
//!
//! Multi-threaded search for ed25519 keys whose onion hostname starts with
//! one of a set of prepared prefix filters, and the key documents found
//! keys are written as.

mod keys;
mod search;
mod stats;

pub use keys::{parse_documents, KeyDocument, KeyDocumentError};
pub use search::{SearchConfig, SearchError, SearchResult, VanitySearch};
pub use stats::SearchStats;

// Re-exports for convenience
pub use onionvanity_crypto::{onion_hostname, Ed25519Keypair};
pub use onionvanity_filter::{
    estimate_time_50pct, format_difficulty, format_duration, FilterConfig, FilterError, FilterSet,
    Filters, Layout, LoadSummary, PackedInt, PrefixMatch, SearchMode, DEFAULT_EXPANSION_LIMIT,
};
