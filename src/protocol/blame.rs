//! Blame annotations: why a buffer was flagged.
//!
//! Raw blame output alternates between header lines naming a buffer and
//! indented body lines giving one reason each:
//!
//! ```text
//! buf main.c:10
//!   - Addition [main.c:14]
//!   - Length constraint []
//! ```
//!
//! Reasons are indexed under the buffer name, and additionally under the
//! instruction location embedded in brackets at the end of the body, when
//! there is one. The two keyspaces are stored separately so a location
//! string can never shadow a buffer name.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::ProtocolError;

/// Identifier used to look up blame reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlameKey<'a> {
    Name(&'a str),
    Location(&'a str),
}

/// Blame reasons keyed by buffer name and by instruction location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlameIndex {
    by_name: HashMap<String, Vec<String>>,
    by_location: HashMap<String, Vec<String>>,
}

/// Accumulator threaded through the blame fold.
#[derive(Default)]
struct BlameFold {
    index: BlameIndex,
    current: Option<String>,
}

fn instruction_location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[([^\[\]\s]+)\]\s*$").expect("instruction location pattern is valid")
    })
}

/// Extract the trailing `[file:line]` from a body line, if any.
pub fn embedded_location(body: &str) -> Option<&str> {
    instruction_location_pattern()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

impl BlameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from raw blame-zone lines.
    ///
    /// Each item is `(line_number, text)`, line numbers being 1-based
    /// positions in the diagnostic stream. Blank lines are skipped. A body
    /// line before any header is a protocol error.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, ProtocolError>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let fold = lines
            .into_iter()
            .try_fold(BlameFold::default(), |state, (line, text)| {
                state.apply(line, text)
            })?;
        Ok(fold.index)
    }

    /// Record a header: the buffer is known even if no reason follows.
    pub fn insert_buffer(&mut self, name: &str) {
        self.by_name.entry(name.to_string()).or_default();
    }

    /// Record one reason for `name`, and for `location` when present.
    pub fn insert(&mut self, name: &str, location: Option<&str>, reason: &str) {
        self.by_name
            .entry(name.to_string())
            .or_default()
            .push(reason.to_string());
        if let Some(loc) = location {
            self.by_location
                .entry(loc.to_string())
                .or_default()
                .push(reason.to_string());
        }
    }

    /// Reasons recorded for `key`, in insertion order.
    pub fn reasons(&self, key: BlameKey<'_>) -> Option<&[String]> {
        match key {
            BlameKey::Name(name) => self.by_name.get(name),
            BlameKey::Location(loc) => self.by_location.get(loc),
        }
        .map(Vec::as_slice)
    }

    /// True iff some reason recorded under `key` contains `needle`.
    ///
    /// Returns `None` when `key` is unknown.
    pub fn mentions(&self, key: BlameKey<'_>, needle: &str) -> Option<bool> {
        self.reasons(key)
            .map(|reasons| reasons.iter().any(|r| r.contains(needle)))
    }

    pub fn buffer_count(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_location.is_empty()
    }
}

impl BlameFold {
    fn apply(mut self, line: usize, text: &str) -> Result<Self, ProtocolError> {
        if text.trim().is_empty() {
            return Ok(self);
        }

        if text.starts_with(char::is_whitespace) {
            let Some(name) = self.current.as_deref() else {
                return Err(ProtocolError::OrphanBlameLine {
                    line,
                    text: text.to_string(),
                });
            };
            let body = text.trim();
            let reason = body.strip_prefix("- ").unwrap_or(body);
            self.index.insert(name, embedded_location(reason), reason);
            return Ok(self);
        }

        let mut fields = text.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some(name), Some(_location)) => {
                self.index.insert_buffer(name);
                self.current = Some(name.to_string());
                Ok(self)
            }
            _ => Err(ProtocolError::MalformedBlameHeader {
                line,
                text: text.to_string(),
            }),
        }
    }
}
