//! Line parser for assertion files.

use std::iter::Enumerate;
use std::str::Lines;

use super::{Assertion, AssertionError, BlameTarget, Check, MatchMode, Target};

/// Split off the next whitespace-delimited token.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// Parse one line of an assertion file.
///
/// Returns `Ok(None)` for blank and comment lines. `file` and `line` only
/// feed error messages.
pub fn parse_line(
    file: &str,
    line: usize,
    text: &str,
) -> Result<Option<Assertion>, AssertionError> {
    let Some((kind, rest)) = next_token(text) else {
        return Ok(None);
    };
    if kind.starts_with('#') {
        return Ok(None);
    }

    let missing = |expected: &'static str| AssertionError::MissingArgument {
        file: file.to_string(),
        line,
        expected,
    };

    if !matches!(kind, "HAS" | "NOT" | "BLAME") {
        return Err(AssertionError::UnknownKind {
            file: file.to_string(),
            line,
            token: kind.to_string(),
        });
    }

    let (mode_token, rest) = next_token(rest).ok_or_else(|| missing("match mode"))?;
    let mode = MatchMode::from_token(mode_token).ok_or_else(|| AssertionError::UnknownMatchMode {
        file: file.to_string(),
        line,
        token: mode_token.to_string(),
    })?;
    let (first, rest) = next_token(rest).ok_or_else(|| missing("target"))?;

    let check = if kind == "BLAME" {
        let target = match mode {
            MatchMode::ByName => BlameTarget::Name(first.to_string()),
            MatchMode::ByLocation => BlameTarget::Location(first.to_string()),
            MatchMode::ByBoth => {
                return Err(AssertionError::BlameByBoth {
                    file: file.to_string(),
                    line,
                })
            }
        };
        let needle = rest.trim();
        if needle.is_empty() {
            return Err(missing("blame text"));
        }
        Check::Blame {
            target,
            needle: needle.to_string(),
        }
    } else {
        let target = match mode {
            MatchMode::ByName => Target::Name(first.to_string()),
            MatchMode::ByLocation => Target::Location(first.to_string()),
            MatchMode::ByBoth => {
                let (location, _) = next_token(rest).ok_or_else(|| missing("buffer location"))?;
                Target::Both {
                    name: first.to_string(),
                    location: location.to_string(),
                }
            }
        };
        if kind == "HAS" {
            Check::Has(target)
        } else {
            Check::Not(target)
        }
    };

    Ok(Some(Assertion {
        line,
        text: text.trim_end().to_string(),
        check,
    }))
}

/// Lazily parsed assertions of one file, in file order.
///
/// Stops being useful after the first `Err`; callers are expected to abort.
pub struct Assertions<'a> {
    file: &'a str,
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Assertions<'a> {
    pub fn new(file: &'a str, text: &'a str) -> Self {
        Self {
            file,
            lines: text.lines().enumerate(),
        }
    }
}

impl Iterator for Assertions<'_> {
    type Item = Result<Assertion, AssertionError>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, text) in self.lines.by_ref() {
            match parse_line(self.file, idx + 1, text) {
                Ok(None) => continue,
                Ok(Some(assertion)) => return Some(Ok(assertion)),
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Parse a whole assertion file up front.
pub fn parse_assertions(file: &str, text: &str) -> Result<Vec<Assertion>, AssertionError> {
    Assertions::new(file, text).collect()
}
