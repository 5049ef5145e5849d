//! Separator-delimited text protocol.
//!
//! ```text
//! <free-form output>        ignored
//! ---
//! <raw blame lines>         blame mode only
//! ---
//! <name> <file:line>        one finding per line
//! ---
//! <anything>                ignored
//! ```
//!
//! Without blame mode the blame zone and its closing separator are absent.

use super::{parse_finding, AnalyzerOutput, BlameIndex, ProtocolError};

/// Literal line that delimits zones.
pub const SEPARATOR: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Preamble,
    Blame,
    Findings,
    Trailer,
}

impl Zone {
    fn after_separator(self, blame_mode: bool) -> Self {
        match self {
            Zone::Preamble if blame_mode => Zone::Blame,
            Zone::Preamble | Zone::Blame => Zone::Findings,
            Zone::Findings | Zone::Trailer => Zone::Trailer,
        }
    }
}

pub(super) fn parse(text: &str, blame_mode: bool) -> Result<AnalyzerOutput, ProtocolError> {
    let mut zone = Zone::Preamble;
    let mut blame_lines = Vec::new();
    let mut findings = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;

        if raw == SEPARATOR {
            zone = zone.after_separator(blame_mode);
            if zone == Zone::Trailer {
                break;
            }
            continue;
        }

        match zone {
            Zone::Preamble => {}
            Zone::Blame => blame_lines.push((line, raw)),
            Zone::Findings => {
                if !raw.trim().is_empty() {
                    findings.push(parse_finding(line, raw)?);
                }
            }
            Zone::Trailer => break,
        }
    }

    tracing::debug!(
        findings = findings.len(),
        blame_lines = blame_lines.len(),
        final_zone = ?zone,
        "decoded legacy diagnostic stream"
    );

    let blame = if blame_mode {
        Some(BlameIndex::from_lines(blame_lines)?)
    } else {
        None
    };

    Ok(AnalyzerOutput { findings, blame })
}
