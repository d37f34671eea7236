//! Tor v3 onion hostnames
//!
//! hostname = base32(pubkey || checksum[..2] || version) + ".onion"

use crate::encoding::{Base32, PrefixCodec};
use crate::hash::sha3_256_parts;

/// Onion service version byte
pub const ONION_VERSION: u8 = 0x03;

const CHECKSUM_PREFIX: &[u8] = b".onion checksum";

/// Two-byte checksum embedded in the hostname
pub fn onion_checksum(public_key: &[u8; 32]) -> [u8; 2] {
    let version = [ONION_VERSION];
    let parts: [&[u8]; 3] = [CHECKSUM_PREFIX, public_key, &version];
    let hash = sha3_256_parts(&parts);
    [hash[0], hash[1]]
}

/// Derive the `.onion` hostname for an ed25519 public key
pub fn onion_hostname(public_key: &[u8; 32]) -> String {
    let checksum = onion_checksum(public_key);

    let mut data = [0u8; 35];
    data[..32].copy_from_slice(public_key);
    data[32..34].copy_from_slice(&checksum);
    data[34] = ONION_VERSION;

    let mut hostname = Base32.encode(&data);
    hostname.push_str(".onion");
    hostname
}
