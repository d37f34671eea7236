//! Key documents
//!
//! Found keys are written as small YAML documents carrying everything Tor
//! needs to host the service:
//!
//! ```text
//! ---
//! hostname: <56 digits>.onion
//! hs_ed25519_public_key: <base64 of the hs_ed25519_public_key file>
//! hs_ed25519_secret_key: <base64 of the hs_ed25519_secret_key file>
//! time: 2018-07-04 21:31:20 Z
//! ```
//!
//! [`parse_documents`] reads such a stream back and
//! [`KeyDocument::write_dir`] turns one document into a Tor key directory.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use onionvanity_crypto::tor::{self, PUBLIC_KEY_FILE_LEN, SECRET_KEY_FILE_LEN};
use onionvanity_crypto::{onion_hostname, Base32, Ed25519Keypair, KeyFileError, PrefixCodec};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S Z";

/// 56 base32 digits plus `.onion`
const HOSTNAME_LEN: usize = 62;

#[derive(Error, Debug)]
pub enum KeyDocumentError {
    #[error("line {line}: expected `key: value`")]
    Syntax { line: usize },

    #[error("line {line}: invalid hostname")]
    Hostname { line: usize },

    #[error("line {line}: invalid public key")]
    PublicKey { line: usize },

    #[error("line {line}: invalid secret key")]
    SecretKey { line: usize },

    #[error("line {line}: document ends before hostname and both keys are given")]
    Incomplete { line: usize },

    #[error("secret key belongs to {derived}, not {hostname}")]
    Mismatch { hostname: String, derived: String },

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    KeyFile(#[from] KeyFileError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Hostname and Tor key files of one onion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDocument {
    pub hostname: String,
    /// Base64 of the `hs_ed25519_public_key` file
    pub hs_ed25519_public_key: String,
    /// Base64 of the `hs_ed25519_secret_key` file
    pub hs_ed25519_secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl KeyDocument {
    pub fn new(keypair: &Ed25519Keypair, time: DateTime<Utc>) -> Self {
        Self {
            hostname: keypair.onion_hostname(),
            hs_ed25519_public_key: STANDARD.encode(keypair.tor_public_key_file()),
            hs_ed25519_secret_key: STANDARD.encode(keypair.tor_secret_key_file()),
            time: Some(time),
        }
    }

    /// The document as YAML, starting with `---`
    pub fn to_yaml(&self) -> String {
        let mut out = String::from("---\n");
        let _ = writeln!(out, "hostname: {}", self.hostname);
        let _ = writeln!(out, "hs_ed25519_public_key: {}", self.hs_ed25519_public_key);
        let _ = writeln!(out, "hs_ed25519_secret_key: {}", self.hs_ed25519_secret_key);
        if let Some(time) = self.time {
            let _ = writeln!(out, "time: {}", time.format(TIME_FORMAT));
        }
        out
    }

    /// Contents of `hs_ed25519_secret_key`
    pub fn secret_key_file(&self) -> Result<Vec<u8>, KeyDocumentError> {
        let file = STANDARD.decode(&self.hs_ed25519_secret_key)?;
        tor::parse_secret_key_file(&file)?;
        Ok(file)
    }

    /// Contents of `hs_ed25519_public_key`
    pub fn public_key_file(&self) -> Result<Vec<u8>, KeyDocumentError> {
        let file = STANDARD.decode(&self.hs_ed25519_public_key)?;
        tor::parse_public_key_file(&file)?;
        Ok(file)
    }

    /// Hostname the secret key belongs to
    pub fn derived_hostname(&self) -> Result<String, KeyDocumentError> {
        let expanded = tor::parse_secret_key_file(&self.secret_key_file()?)?;
        Ok(onion_hostname(&tor::public_key_from_expanded(&expanded)))
    }

    /// Check that both key files belong to the hostname
    pub fn verify(&self) -> Result<(), KeyDocumentError> {
        let public = tor::parse_public_key_file(&self.public_key_file()?)?;
        for derived in [self.derived_hostname()?, onion_hostname(&public)] {
            if derived != self.hostname {
                return Err(KeyDocumentError::Mismatch {
                    hostname: self.hostname.clone(),
                    derived,
                });
            }
        }
        Ok(())
    }

    /// Write `hostname`, `hs_ed25519_public_key` and `hs_ed25519_secret_key`
    /// into `<root>/<hostname>/` and return that directory
    pub fn write_dir(&self, root: &Path) -> Result<PathBuf, KeyDocumentError> {
        self.verify()?;

        let dir = root.join(&self.hostname);
        create_private_dir(&dir)?;
        write_secret(&dir.join("hs_ed25519_secret_key"), &self.secret_key_file()?)?;
        fs::write(dir.join("hs_ed25519_public_key"), self.public_key_file()?)?;
        fs::write(dir.join("hostname"), format!("{}\n", self.hostname))?;
        Ok(dir)
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_secret(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_secret(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

#[derive(Default)]
struct PartialDocument {
    hostname: Option<String>,
    public_key: Option<String>,
    secret_key: Option<String>,
}

impl PartialDocument {
    fn is_empty(&self) -> bool {
        self.hostname.is_none() && self.public_key.is_none() && self.secret_key.is_none()
    }

    fn finish(&self) -> Option<KeyDocument> {
        Some(KeyDocument {
            hostname: self.hostname.clone()?,
            hs_ed25519_public_key: self.public_key.clone()?,
            hs_ed25519_secret_key: self.secret_key.clone()?,
            time: None,
        })
    }
}

fn is_hostname(value: &str) -> bool {
    value.len() == HOSTNAME_LEN
        && value
            .strip_suffix(".onion")
            .is_some_and(|digits| Base32.first_invalid(digits).is_none())
}

fn is_key_file(value: &str, len: usize) -> bool {
    STANDARD.decode(value).is_ok_and(|file| file.len() == len)
}

/// Drop a leading `!tag` from a value
fn strip_tag(value: &str) -> &str {
    match value.strip_prefix('!') {
        Some(rest) => rest
            .split_once(' ')
            .map_or("", |(_, value)| value.trim_start_matches(' ')),
        None => value,
    }
}

/// Read every complete key document from `reader`.
///
/// Documents are separated by `---` and hold `key: value` lines. Only the
/// hostname and the two key files are read; other keys (`time` included)
/// and a `!tag` before a value are skipped. Once a document has all three,
/// the rest of it is ignored. A document that ends with only some of them
/// is an error.
pub fn parse_documents<R: BufRead>(reader: R) -> Result<Vec<KeyDocument>, KeyDocumentError> {
    let mut documents = Vec::new();
    let mut partial = PartialDocument::default();
    let mut done = false;

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line?;
        let line = line.trim_end_matches(|c: char| c == ' ' || c == '\r');
        if line.is_empty() {
            continue;
        }

        if line.starts_with("---") {
            if !done && !partial.is_empty() {
                return Err(KeyDocumentError::Incomplete { line: number });
            }
            partial = PartialDocument::default();
            done = false;
            continue;
        }
        if done {
            continue;
        }

        let (key, value) = line
            .trim_start_matches(' ')
            .split_once(':')
            .ok_or(KeyDocumentError::Syntax { line: number })?;
        let value = strip_tag(value.trim_start_matches(' '));

        match key {
            "hostname" if is_hostname(value) => partial.hostname = Some(value.to_string()),
            "hostname" => return Err(KeyDocumentError::Hostname { line: number }),
            "hs_ed25519_public_key" if is_key_file(value, PUBLIC_KEY_FILE_LEN) => {
                partial.public_key = Some(value.to_string())
            }
            "hs_ed25519_public_key" => return Err(KeyDocumentError::PublicKey { line: number }),
            "hs_ed25519_secret_key" if is_key_file(value, SECRET_KEY_FILE_LEN) => {
                partial.secret_key = Some(value.to_string())
            }
            "hs_ed25519_secret_key" => return Err(KeyDocumentError::SecretKey { line: number }),
            _ => continue,
        }

        if let Some(document) = partial.finish() {
            documents.push(document);
            done = true;
        }
    }

    Ok(documents)
}
