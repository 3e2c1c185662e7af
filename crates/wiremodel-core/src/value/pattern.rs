//! Regular-expression runtime value.

use regex::{Regex, RegexBuilder};
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

/// Accepted flags, in canonical order.
const FLAG_ORDER: &str = "dgimsuvy";

/// Reasons a pattern cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A flag character outside `dgimsuvy`
    #[error("unknown flag '{0}'")]
    UnknownFlag(char),
    /// The same flag given twice
    #[error("duplicate flag '{0}'")]
    DuplicateFlag(char),
    /// `u` and `v` cannot be combined
    #[error("flags 'u' and 'v' are mutually exclusive")]
    ConflictingFlags,
    /// The source does not compile
    #[error("invalid pattern: {0}")]
    Syntax(String),
}

/// A compiled regular expression that remembers its source text and flags.
///
/// Flags `i`, `m` and `s` change how the pattern matches. `d`, `g`, `u`, `v`
/// and `y` are kept so they survive a round trip.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` with `flags`.
    ///
    /// Flags are stored in canonical order, so `"ig"` and `"gi"` produce the
    /// same pattern.
    pub fn new(source: &str, flags: &str) -> Result<Self, PatternError> {
        let flags = normalize_flags(flags)?;
        let regex = RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .build()
            .map_err(|e| PatternError::Syntax(e.to_string()))?;

        Ok(Self {
            source: source.to_string(),
            flags,
            regex,
        })
    }

    /// Split a `/source/flags` literal into its parts.
    ///
    /// Returns `None` when the text is not a literal, in which case callers
    /// treat the whole text as a bare pattern source.
    pub fn split_literal(text: &str) -> Option<(&str, &str)> {
        let rest = text.strip_prefix('/')?;
        let close = rest.rfind('/')?;
        let (source, flags) = (&rest[..close], &rest[close + 1..]);
        if flags.chars().all(|c| FLAG_ORDER.contains(c)) {
            Some((source, flags))
        } else {
            None
        }
    }

    /// Parse `/source/flags` or a bare source string.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        match Self::split_literal(text) {
            Some((source, flags)) => Self::new(source, flags),
            None => Self::new(text, ""),
        }
    }

    /// Pattern source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Flags in canonical order.
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// The compiled regex.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Whether the pattern matches anywhere in `haystack`.
    pub fn test(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    /// Whether the `g` flag is set.
    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }

    /// `/source/flags` literal form.
    pub fn to_literal(&self) -> String {
        format!("/{}/{}", self.source, self.flags)
    }

    /// Tagged wire object.
    pub fn to_wire(&self) -> Value {
        json!({
            "__type": "RegExp",
            "source": self.source,
            "flags": self.flags,
        })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

fn normalize_flags(flags: &str) -> Result<String, PatternError> {
    let mut seen = [false; FLAG_ORDER.len()];
    for c in flags.chars() {
        let idx = FLAG_ORDER.find(c).ok_or(PatternError::UnknownFlag(c))?;
        if seen[idx] {
            return Err(PatternError::DuplicateFlag(c));
        }
        seen[idx] = true;
    }

    let normalized: String = FLAG_ORDER
        .chars()
        .zip(seen)
        .filter_map(|(c, on)| on.then_some(c))
        .collect();

    if normalized.contains('u') && normalized.contains('v') {
        return Err(PatternError::ConflictingFlags);
    }
    Ok(normalized)
}
