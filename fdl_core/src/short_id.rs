//! Issues short, collision-free id tokens derived from record content.

use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use sha1::{Digest, Sha1};

/// Length of the base candidate token.
pub const SHORT_ID_LENGTH: usize = 3;

/// The whole digest encoding of the content is already taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("short id space exhausted for content {content:?}")]
pub struct ShortIdExhausted {
    pub content: String,
}

/// Registry of every id issued during one run.
///
/// The base candidate is the first [`SHORT_ID_LENGTH`] characters of the
/// URL-safe base64 encoding of the content's SHA-1 digest, so it is
/// deterministic for a given content. A taken candidate grows by one
/// character at a time until a free prefix is found.
///
/// Processing is strictly sequential within a run; the registry is not
/// synchronized.
#[derive(Debug, Default)]
pub struct ShortIdRegistry {
    issued: HashSet<String>,
}

impl ShortIdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a token from the content and record it as issued.
    pub fn assign(&mut self, content: &str) -> Result<String, ShortIdExhausted> {
        let digest = Sha1::digest(content.as_bytes());
        let encoded = URL_SAFE.encode(digest);
        for length in SHORT_ID_LENGTH..=encoded.len() {
            let candidate = &encoded[..length];
            if !self.issued.contains(candidate) {
                self.issued.insert(candidate.to_string());
                return Ok(candidate.to_string());
            }
        }
        Err(ShortIdExhausted {
            content: content.to_string(),
        })
    }

    /// Number of ids issued so far.
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}
