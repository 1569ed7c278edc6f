//! Request path splitting.
//!
//! # Responsibilities
//! - Split an inbound path on `/`, collapsing empty interior segments
//! - Apply the trailing-slash policy the same way templates do
//! - Percent-decode each segment *after* splitting, so `%2F` stays inside
//!   its segment instead of creating a new one
//! - Precompute the case-folded lookup key for static children

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

use crate::routing::RouterOptions;

/// A single request segment: the captured value and its static lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathSegment<'p> {
    pub value: Cow<'p, str>,
    pub key: Cow<'p, str>,
}

impl<'p> PathSegment<'p> {
    fn new(value: Cow<'p, str>, options: &RouterOptions) -> Self {
        let folded = options.case_sensitive
            || (value.is_ascii() && !value.bytes().any(|b| b.is_ascii_uppercase()));
        let key = if folded {
            value.clone()
        } else {
            Cow::Owned(options.static_key(&value))
        };
        Self { value, key }
    }
}

/// Split `path` into segments according to `options`.
pub(crate) fn split_path<'p>(path: &'p str, options: &RouterOptions) -> Vec<PathSegment<'p>> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (trimmed, trailing) = match trimmed.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (trimmed, false),
    };

    let mut segments: Vec<PathSegment<'p>> = trimmed
        .split('/')
        .filter(|raw| !raw.is_empty())
        .map(|raw| PathSegment::new(decode_segment(raw, options), options))
        .collect();

    if trailing && options.trailing_slash_strict {
        segments.push(PathSegment::new(Cow::Borrowed(""), options));
    }
    segments
}

/// Decode `%XX` escapes. Escapes that do not form valid UTF-8 leave the
/// segment untouched so it can still match a literal template.
///
/// Static template text goes through the same function, so a template and
/// the request path it was written for always produce the same key.
pub(crate) fn decode_segment<'p>(raw: &'p str, options: &RouterOptions) -> Cow<'p, str> {
    if !options.percent_decode || !raw.contains('%') {
        return Cow::Borrowed(raw);
    }
    percent_decode_str(raw)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(raw))
}
