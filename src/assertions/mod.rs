// Copyright 2024-2026 boa-harness Contributors
// SPDX-License-Identifier: Apache-2.0

//! Declarative expectations over analyzer output.
//!
//! An assertion file holds one expectation per line:
//!
//! ```text
//! # comment
//! HAS ByName buffer
//! NOT ByLocation file.c:82
//! HAS ByBoth mychars_ chartest.c:15
//! BLAME ByName buffer Addition
//! BLAME ByLocation file.c:90 unknown function call
//! ```
//!
//! Lines are independent. Malformed lines are fatal and stop evaluation at
//! once; unmet expectations are reported and evaluation carries on.

mod evaluator;
mod parser;

pub use evaluator::{
    display_name, evaluate_file, read_assertion_file, AssertionFailure, EvaluationReport,
    Evaluator, Outcome,
};
pub use parser::{parse_assertions, parse_line, Assertions};

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// How an assertion target is matched against findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    ByName,
    ByLocation,
    ByBoth,
}

impl MatchMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "ByName" => Some(Self::ByName),
            "ByLocation" => Some(Self::ByLocation),
            "ByBoth" => Some(Self::ByBoth),
            _ => None,
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ByName => "ByName",
            Self::ByLocation => "ByLocation",
            Self::ByBoth => "ByBoth",
        };
        f.write_str(s)
    }
}

/// What a presence check looks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name(String),
    Location(String),
    Both { name: String, location: String },
}

/// Blame lookups key on a name or a location, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlameTarget {
    Name(String),
    Location(String),
}

/// The expectation carried by one assertion line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// `HAS`: the target must appear among the findings.
    Has(Target),
    /// `NOT`: the target must not appear among the findings.
    Not(Target),
    /// `BLAME`: some reason recorded for the target contains `needle`.
    Blame { target: BlameTarget, needle: String },
}

/// One parsed assertion line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    /// 1-based line number in the assertion file.
    pub line: usize,
    /// The line as written, for failure reports.
    pub text: String,
    pub check: Check,
}

/// Fatal problems with an assertion file.
///
/// These abort evaluation; an unmet expectation is not an error.
#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("Unable to open {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid assertion in {file}:{line}: unknown kind {token:?}")]
    UnknownKind {
        file: String,
        line: usize,
        token: String,
    },

    #[error("Invalid assertion type {token:?} in {file}:{line}")]
    UnknownMatchMode {
        file: String,
        line: usize,
        token: String,
    },

    #[error("Invalid assertion in {file}:{line}: BLAME cannot match ByBoth")]
    BlameByBoth { file: String, line: usize },

    #[error("Invalid assertion in {file}:{line}: missing {expected}")]
    MissingArgument {
        file: String,
        line: usize,
        expected: &'static str,
    },
}

impl AssertionError {
    /// True for problems with the file's contents, as opposed to its
    /// availability.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, Self::Unreadable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_mode_tokens_are_case_sensitive() {
        assert_eq!(MatchMode::from_token("ByName"), Some(MatchMode::ByName));
        assert_eq!(MatchMode::from_token("byname"), None);
        assert_eq!(MatchMode::from_token("ByBoth").unwrap().to_string(), "ByBoth");
    }

    #[test]
    fn test_error_messages_name_file_and_line() {
        let err = AssertionError::UnknownKind {
            file: "array.asserts".into(),
            line: 4,
            token: "HAVE".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("array.asserts:4"));
        assert!(msg.contains("HAVE"));
        assert!(err.is_malformed());
    }

    #[test]
    fn test_unreadable_is_not_malformed() {
        let err = AssertionError::Unreadable {
            path: PathBuf::from("missing.asserts"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!err.is_malformed());
        assert!(err.to_string().contains("missing.asserts"));
    }
}
