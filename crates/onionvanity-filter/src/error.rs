//! Filter loading errors

use std::path::PathBuf;

use onionvanity_crypto::EncodingError;
use thiserror::Error;

/// Width of `filter "` in diagnostics, so the caret lines up with the text
const MARKER_INDENT: usize = 8;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("filter \"{filter}\" is invalid")]
    InvalidCharacter { filter: String, position: usize },

    #[error("filter \"{filter}\" is too long")]
    TooLong { filter: String, max_digits: usize },

    #[error("failed to read filter file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl FilterError {
    /// Offset of the offending digit within the filter text
    pub fn position(&self) -> Option<usize> {
        match self {
            FilterError::InvalidCharacter { position, .. } => Some(*position),
            FilterError::TooLong { max_digits, .. } => Some(*max_digits),
            _ => None,
        }
    }

    /// Whether loading can skip this filter and carry on
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FilterError::Io { .. })
    }

    /// Error line, plus a caret under the offending digit when there is one
    pub fn diagnostic(&self) -> String {
        match self.position() {
            Some(position) => format!("{}\n{}^", self, " ".repeat(MARKER_INDENT + position)),
            None => self.to_string(),
        }
    }
}
