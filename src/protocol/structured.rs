//! Tagged JSON Lines protocol.
//!
//! Each record names its own kind, so nothing depends on counting
//! separators:
//!
//! ```text
//! {"kind":"finding","name":"buf","location":"a.c:3"}
//! {"kind":"blame","name":"buf","reason":"Addition [a.c:5]","instruction":"a.c:5"}
//! {"kind":"end"}
//! ```
//!
//! Lines that are not JSON objects are free-form output and are skipped. An
//! object that is not a valid record is a protocol error.

use serde::{Deserialize, Serialize};

use super::blame::embedded_location;
use super::{AnalyzerOutput, BlameIndex, Finding, ProtocolError};

/// One structured line of analyzer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Finding {
        name: String,
        location: String,
    },
    Blame {
        name: String,
        reason: String,
        /// Offending instruction; falls back to a trailing `[file:line]`
        /// in `reason` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        instruction: Option<String>,
    },
    End,
}

pub(super) fn parse(text: &str, blame_mode: bool) -> Result<AnalyzerOutput, ProtocolError> {
    let mut findings = Vec::new();
    let mut blame = blame_mode.then(BlameIndex::new);

    for (idx, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if !trimmed.starts_with('{') {
            continue;
        }
        // Compiler output echoes source lines, so a leading brace alone does
        // not make a record.
        let value: serde_json::Value = match serde_json::from_str(trimmed) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(line = idx + 1, error = %e, "skipping non-JSON line");
                continue;
            }
        };
        let record: Record =
            serde_json::from_value(value).map_err(|e| ProtocolError::InvalidRecord {
                line: idx + 1,
                reason: e.to_string(),
            })?;

        match record {
            Record::Finding { name, location } => findings.push(Finding { name, location }),
            Record::Blame {
                name,
                reason,
                instruction,
            } => {
                if let Some(index) = blame.as_mut() {
                    let location = instruction
                        .as_deref()
                        .or_else(|| embedded_location(&reason));
                    index.insert(&name, location, &reason);
                }
            }
            Record::End => break,
        }
    }

    Ok(AnalyzerOutput { findings, blame })
}
