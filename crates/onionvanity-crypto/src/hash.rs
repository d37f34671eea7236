//! Hash functions for onion hostname derivation

use sha3::{Digest, Sha3_256};

/// SHA3-256 over several parts without concatenating them first
pub fn sha3_256_parts(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
