//! OnionVanity Crypto Primitives
//!
//! Key generation, onion hostname derivation, Tor key files and the
//! prefix codec used by the filter engine.

pub mod ed25519;
pub mod encoding;
pub mod hash;
pub mod onion;
pub mod tor;

pub use self::ed25519::Ed25519Keypair;
pub use self::encoding::{Base32, DecodedPrefix, EncodingError, PrefixCodec};
pub use self::onion::onion_hostname;
pub use self::tor::KeyFileError;

// Re-export dependencies for use by other crates
pub use hex;
