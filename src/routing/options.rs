//! Matching options shared by templates and request paths.

use serde::{Deserialize, Serialize};

/// Options controlling how templates and request paths are compared.
///
/// The defaults follow express: case-insensitive static segments, a single
/// trailing slash ignored, percent-escapes decoded per segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Compare static segments byte-for-byte instead of case-folded.
    pub case_sensitive: bool,

    /// Treat a trailing slash as significant (`/users/` differs from `/users`).
    pub trailing_slash_strict: bool,

    /// Decode `%XX` escapes in each request segment after splitting on `/`.
    pub percent_decode: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            trailing_slash_strict: false,
            percent_decode: true,
        }
    }
}

impl RouterOptions {
    /// Normalize static segment text into the key used by the tree.
    pub(crate) fn static_key(&self, text: &str) -> String {
        if self.case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        }
    }
}
