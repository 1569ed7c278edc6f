//! Route template parsing.
//!
//! # Syntax
//! ```text
//! /users/:id/files/*path
//!  ^^^^^ ^^^ ^^^^^ ^^^^^
//!  static param static wildcard (terminal only)
//! ```
//!
//! # Design Decisions
//! - Templates are parsed and fully validated before anything touches the tree
//! - `:` and `*` are only special as the first character of a segment;
//!   anywhere else they are rejected rather than silently treated as text
//! - Under strict trailing-slash handling a trailing `/` becomes a final
//!   empty static segment, mirroring how request paths are split
//! - Static text is percent-decoded exactly like request segments, so
//!   `/a%20b` is reached by `/a%20b` and `/a b` alike

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::routing::path::decode_segment;
use crate::routing::RouterOptions;

/// One `/`-delimited component of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment (case-folded unless case-sensitive).
    /// Holds the decoded text when percent decoding is enabled.
    Static(String),
    /// Captures exactly one non-empty request segment.
    Param(String),
    /// Captures all remaining request segments, joined by `/`.
    Wildcard(String),
}

impl Segment {
    /// Name of the capture, if this segment captures anything.
    pub fn name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param(name) | Segment::Wildcard(name) => Some(name),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(text) => f.write_str(text),
            Segment::Param(name) => write!(f, ":{}", name),
            Segment::Wildcard(name) => write!(f, "*{}", name),
        }
    }
}

/// Ways a template string can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("template must start with '/'")]
    MissingLeadingSlash,

    #[error("empty segment at position {0}")]
    EmptySegment(usize),

    #[error("segment `{0}` declares a parameter without a name")]
    MissingName(String),

    #[error("invalid parameter name `{0}` (expected [A-Za-z0-9_])")]
    InvalidName(String),

    #[error("unterminated parameter syntax in segment `{0}`")]
    Unterminated(String),

    #[error("segment `{0}` mixes literal text with ':' or '*'")]
    MixedSegment(String),

    #[error("wildcard `*{0}` must be the last segment")]
    WildcardNotLast(String),

    #[error("duplicate parameter name `{0}`")]
    DuplicateName(String),
}

/// A parsed, validated route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse `source` using the trailing-slash policy from `options`.
    pub fn parse(source: &str, options: &RouterOptions) -> Result<Self, TemplateError> {
        if source.is_empty() {
            return Err(TemplateError::Empty);
        }
        let Some(body) = source.strip_prefix('/') else {
            return Err(TemplateError::MissingLeadingSlash);
        };

        let (body, trailing) = match body.strip_suffix('/') {
            Some(rest) if !rest.is_empty() => (rest, true),
            _ => (body, false),
        };

        let mut segments = Vec::new();
        if !body.is_empty() {
            for (position, raw) in body.split('/').enumerate() {
                segments.push(parse_segment(raw, position, options)?);
            }
        }
        if trailing && options.trailing_slash_strict {
            segments.push(Segment::Static(String::new()));
        }

        validate(&segments)?;

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template exactly as it was registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Capture names in declaration order (wildcard last, if any).
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::name)
    }

    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard(_)))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segment(raw: &str, position: usize, options: &RouterOptions) -> Result<Segment, TemplateError> {
    if raw.is_empty() {
        return Err(TemplateError::EmptySegment(position));
    }

    if let Some(name) = raw.strip_prefix(':') {
        parse_name(raw, name).map(Segment::Param)
    } else if let Some(name) = raw.strip_prefix('*') {
        parse_name(raw, name).map(Segment::Wildcard)
    } else if raw.contains([':', '*']) {
        Err(TemplateError::MixedSegment(raw.to_string()))
    } else {
        Ok(Segment::Static(decode_segment(raw, options).into_owned()))
    }
}

fn parse_name(raw: &str, name: &str) -> Result<String, TemplateError> {
    if name.is_empty() {
        return Err(TemplateError::MissingName(raw.to_string()));
    }
    if name.contains('(') && !name.ends_with(')') {
        return Err(TemplateError::Unterminated(raw.to_string()));
    }
    if !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(TemplateError::InvalidName(name.to_string()));
    }
    Ok(name.to_string())
}

fn validate(segments: &[Segment]) -> Result<(), TemplateError> {
    let mut seen = HashSet::new();
    let last = segments.len().saturating_sub(1);

    for (index, segment) in segments.iter().enumerate() {
        if let Segment::Wildcard(name) = segment {
            if index != last {
                return Err(TemplateError::WildcardNotLast(name.clone()));
            }
        }
        if let Some(name) = segment.name() {
            if !seen.insert(name) {
                return Err(TemplateError::DuplicateName(name.to_string()));
            }
        }
    }
    Ok(())
}
