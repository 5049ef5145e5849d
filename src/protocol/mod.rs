//! Decoding of the analyzer's diagnostic stream.
//!
//! The analyzer writes everything of interest to stderr. Two encodings are
//! understood:
//!
//! - **Legacy**: zones delimited by literal `---` separator lines. Zone
//!   membership is positional, so the blame-mode flag decides how many zones
//!   precede the findings.
//! - **Json**: one tagged JSON record per line. Lines that are not records
//!   are ignored, so free-form chatter can be interleaved safely.
//!
//! Both produce the same [`AnalyzerOutput`].

mod blame;
mod legacy;
mod structured;

pub use blame::{BlameIndex, BlameKey};
pub use legacy::SEPARATOR;
pub use structured::Record;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A buffer the analyzer reported as a possible overrun.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Readable buffer name.
    pub name: String,
    /// Declaration site, formatted `file:line`.
    pub location: String,
}

impl Finding {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

/// Everything decoded from a single analyzer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyzerOutput {
    /// Findings in report order. Duplicates are kept.
    pub findings: Vec<Finding>,
    /// Blame annotations; `None` when the run was not in blame mode.
    pub blame: Option<BlameIndex>,
}

impl AnalyzerOutput {
    pub fn has_name(&self, name: &str) -> bool {
        self.findings.iter().any(|f| f.name == name)
    }

    pub fn has_location(&self, location: &str) -> bool {
        self.findings.iter().any(|f| f.location == location)
    }

    pub fn has_finding(&self, name: &str, location: &str) -> bool {
        self.findings
            .iter()
            .any(|f| f.name == name && f.location == location)
    }

    pub fn is_blame_mode(&self) -> bool {
        self.blame.is_some()
    }
}

/// Encoding of the diagnostic stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolMode {
    /// `---`-delimited zones.
    #[default]
    Legacy,
    /// Tagged JSON Lines.
    Json,
}

impl std::str::FromStr for ProtocolMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" | "text" => Ok(Self::Legacy),
            "json" | "jsonl" => Ok(Self::Json),
            other => Err(format!("unknown protocol mode: {}", other)),
        }
    }
}

/// Errors raised while decoding the diagnostic stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("blame line {line} has no preceding buffer header: {text:?}")]
    OrphanBlameLine { line: usize, text: String },

    #[error("blame header on line {line} is missing a location: {text:?}")]
    MalformedBlameHeader { line: usize, text: String },

    #[error("finding on line {line} needs a name and a location: {text:?}")]
    MalformedFinding { line: usize, text: String },

    #[error("invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

/// Decode a captured diagnostic stream.
///
/// `blame_mode` must match the flag the analyzer was invoked with; the
/// legacy encoding has no other way to tell the zones apart.
pub fn parse_diagnostics(
    text: &str,
    mode: ProtocolMode,
    blame_mode: bool,
) -> Result<AnalyzerOutput, ProtocolError> {
    match mode {
        ProtocolMode::Legacy => legacy::parse(text, blame_mode),
        ProtocolMode::Json => structured::parse(text, blame_mode),
    }
}

/// Split a finding line into its name and location.
///
/// Fields past the second are ignored. `line` is the 1-based line number in
/// the stream, used for error reporting.
pub(crate) fn parse_finding(line: usize, text: &str) -> Result<Finding, ProtocolError> {
    let mut fields = text.split_whitespace();
    match (fields.next(), fields.next()) {
        (Some(name), Some(location)) => Ok(Finding::new(name, location)),
        _ => Err(ProtocolError::MalformedFinding {
            line,
            text: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalyzerOutput {
        AnalyzerOutput {
            findings: vec![
                Finding::new("alpha", "beta.c:3"),
                Finding::new("gamma", "beta.c:9"),
            ],
            blame: None,
        }
    }

    #[test]
    fn test_lookup_by_name_and_location() {
        let out = sample();
        assert!(out.has_name("alpha"));
        assert!(!out.has_name("beta.c:3"));
        assert!(out.has_location("beta.c:9"));
        assert!(!out.has_location("gamma"));
    }

    #[test]
    fn test_lookup_by_both_requires_same_finding() {
        let out = sample();
        assert!(out.has_finding("alpha", "beta.c:3"));
        assert!(!out.has_finding("alpha", "beta.c:9"));
    }

    #[test]
    fn test_parse_finding_ignores_extra_fields() {
        let f = parse_finding(4, "buf  main.c:12  extra words").unwrap();
        assert_eq!(f, Finding::new("buf", "main.c:12"));
    }

    #[test]
    fn test_parse_finding_rejects_single_field() {
        let err = parse_finding(7, "lonely").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MalformedFinding {
                line: 7,
                text: "lonely".to_string()
            }
        );
    }

    #[test]
    fn test_protocol_mode_from_str() {
        assert_eq!("legacy".parse::<ProtocolMode>(), Ok(ProtocolMode::Legacy));
        assert_eq!("JSON".parse::<ProtocolMode>(), Ok(ProtocolMode::Json));
        assert!("xml".parse::<ProtocolMode>().is_err());
    }
}
