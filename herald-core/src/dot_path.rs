//! Dot-path addressing into nested JSON values.
//!
//! A dot path such as `a.b[0].c[2]` is split on `.`; each piece is then
//! tokenised into maximal runs of non-bracket characters (mapping keys) and
//! bracketed non-negative integers (sequence indices). Characters that fit
//! neither form, such as a stray `[` or `]`, are skipped. There is no quoting,
//! no negative index and no wildcard: `a[-1]` reads the key `-1`, which then
//! fails to resolve against a sequence.

use std::{fmt, str::FromStr};

use serde_json::Value;
use thiserror::Error;

/// One step of a parsed [`DotPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Descend into a mapping by key.
    Key(String),
    /// Descend into a sequence by position.
    Index(usize),
}

/// Errors raised while parsing or resolving a dot path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A key segment was applied to something other than a mapping.
    #[error("not a mapping before key '{key}'")]
    NotAMapping {
        /// Key that could not be applied.
        key: String,
    },
    /// The mapping has no entry for the key.
    #[error("key '{key}' not found")]
    KeyNotFound {
        /// Missing key.
        key: String,
    },
    /// An index segment was applied to something other than a sequence.
    #[error("not a sequence before index {index}")]
    NotASequence {
        /// Index that could not be applied.
        index: usize,
    },
    /// The index lies beyond the end of the sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Length of the sequence.
        len: usize,
    },
    /// The bracketed digits do not fit in `usize`.
    #[error("index [{raw}] is too large")]
    IndexOverflow {
        /// Digits as written in the path.
        raw: String,
    },
}

/// A parsed dot path.
///
/// # Examples
///
/// ```
/// use herald_core::{DotPath, Segment};
/// use serde_json::json;
///
/// # fn main() -> Result<(), herald_core::PathError> {
/// let path = DotPath::parse("a.b[0].c")?;
/// assert_eq!(path.segments().len(), 4);
/// assert_eq!(path.segments().get(2), Some(&Segment::Index(0)));
///
/// let mut doc = json!({"a": {"b": [{"c": {"x": 1}}]}});
/// let target = path.resolve_mut(&mut doc)?;
/// assert_eq!(target, &json!({"x": 1}));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotPath {
    raw: String,
    segments: Vec<Segment>,
}

impl DotPath {
    /// Tokenise `raw` into segments.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        for piece in raw.split('.') {
            tokenise_piece(piece, &mut segments)?;
        }
        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// Parsed segments in traversal order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Path text as supplied to [`DotPath::parse`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk `root` segment by segment and return the addressed value.
    ///
    /// A path without segments resolves to `root` itself.
    pub fn resolve_mut<'v>(&self, root: &'v mut Value) -> Result<&'v mut Value, PathError> {
        self.segments
            .iter()
            .try_fold(root, |current, segment| segment.descend(current))
    }
}

impl Segment {
    fn descend<'v>(&self, current: &'v mut Value) -> Result<&'v mut Value, PathError> {
        match self {
            Self::Key(key) => match current {
                Value::Object(map) => map
                    .get_mut(key)
                    .ok_or_else(|| PathError::KeyNotFound { key: key.clone() }),
                _ => Err(PathError::NotAMapping { key: key.clone() }),
            },
            Self::Index(index) => match current {
                Value::Array(items) => {
                    let len = items.len();
                    items
                        .get_mut(*index)
                        .ok_or(PathError::IndexOutOfRange { index: *index, len })
                }
                _ => Err(PathError::NotASequence { index: *index }),
            },
        }
    }
}

impl FromStr for DotPath {
    type Err = PathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn tokenise_piece(piece: &str, segments: &mut Vec<Segment>) -> Result<(), PathError> {
    let mut rest = piece;
    while let Some(first) = rest.chars().next() {
        if first == '[' {
            if let Some((digits, tail)) = bracketed_digits(rest) {
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| PathError::IndexOverflow {
                        raw: digits.to_owned(),
                    })?;
                segments.push(Segment::Index(index));
                rest = tail;
                continue;
            }
        }
        if first == '[' || first == ']' {
            let mut chars = rest.chars();
            chars.next();
            rest = chars.as_str();
            continue;
        }
        let end = rest.find(['[', ']']).unwrap_or(rest.len());
        let (key, tail) = rest.split_at(end);
        segments.push(Segment::Key(key.to_owned()));
        rest = tail;
    }
    Ok(())
}

/// Split `[123]rest` into `("123", "rest")`.
fn bracketed_digits(input: &str) -> Option<(&str, &str)> {
    let inner = input.strip_prefix('[')?;
    let digits_end = inner
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(inner.len());
    let (digits, tail) = inner.split_at(digits_end);
    if digits.is_empty() {
        return None;
    }
    let after = tail.strip_prefix(']')?;
    Some((digits, after))
}
