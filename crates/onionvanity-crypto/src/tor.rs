//! Tor hidden service key files
//!
//! Tor stores an onion service key as two small binary files: a 32-byte
//! header followed by the expanded ed25519 secret key, and the same kind
//! of header followed by the public key.

use curve25519_dalek::constants::ED25519_BASEPOINT_POINT;
use curve25519_dalek::scalar::Scalar;
use sha2::{Digest, Sha512};
use thiserror::Error;

/// Header of `hs_ed25519_secret_key`
pub const SECRET_KEY_HEADER: &[u8; 32] = b"== ed25519v1-secret: type0 ==\0\0\0";

/// Header of `hs_ed25519_public_key`
pub const PUBLIC_KEY_HEADER: &[u8; 32] = b"== ed25519v1-public: type0 ==\0\0\0";

pub const SECRET_KEY_FILE_LEN: usize = 96;
pub const PUBLIC_KEY_FILE_LEN: usize = 64;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyFileError {
    #[error("key file is {actual} bytes, expected {expected}")]
    Length { expected: usize, actual: usize },

    #[error("key file header does not match")]
    Header,
}

/// SHA-512 of the seed with the scalar half clamped, as Tor stores it
pub fn expand_secret_key(seed: &[u8; 32]) -> [u8; 64] {
    let hash = Sha512::digest(seed);
    let mut expanded = [0u8; 64];
    expanded.copy_from_slice(&hash);
    expanded[0] &= 248;
    expanded[31] &= 127;
    expanded[31] |= 64;
    expanded
}

/// Public key belonging to an expanded secret key
pub fn public_key_from_expanded(expanded: &[u8; 64]) -> [u8; 32] {
    let mut scalar = [0u8; 32];
    scalar.copy_from_slice(&expanded[..32]);
    let point = ED25519_BASEPOINT_POINT * Scalar::from_bytes_mod_order(scalar);
    point.compress().to_bytes()
}

pub fn secret_key_file(expanded: &[u8; 64]) -> [u8; SECRET_KEY_FILE_LEN] {
    let mut file = [0u8; SECRET_KEY_FILE_LEN];
    file[..32].copy_from_slice(SECRET_KEY_HEADER);
    file[32..].copy_from_slice(expanded);
    file
}

pub fn public_key_file(public_key: &[u8; 32]) -> [u8; PUBLIC_KEY_FILE_LEN] {
    let mut file = [0u8; PUBLIC_KEY_FILE_LEN];
    file[..32].copy_from_slice(PUBLIC_KEY_HEADER);
    file[32..].copy_from_slice(public_key);
    file
}

fn strip_header<'a>(
    file: &'a [u8],
    header: &[u8; 32],
    expected: usize,
) -> Result<&'a [u8], KeyFileError> {
    if file.len() != expected {
        return Err(KeyFileError::Length {
            expected,
            actual: file.len(),
        });
    }
    let (head, body) = file.split_at(header.len());
    if head != header {
        return Err(KeyFileError::Header);
    }
    Ok(body)
}

/// Expanded secret key stored in an `hs_ed25519_secret_key` file
pub fn parse_secret_key_file(file: &[u8]) -> Result<[u8; 64], KeyFileError> {
    let body = strip_header(file, SECRET_KEY_HEADER, SECRET_KEY_FILE_LEN)?;
    let mut expanded = [0u8; 64];
    expanded.copy_from_slice(body);
    Ok(expanded)
}

/// Public key stored in an `hs_ed25519_public_key` file
pub fn parse_public_key_file(file: &[u8]) -> Result<[u8; 32], KeyFileError> {
    let body = strip_header(file, PUBLIC_KEY_HEADER, PUBLIC_KEY_FILE_LEN)?;
    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(body);
    Ok(public_key)
}
