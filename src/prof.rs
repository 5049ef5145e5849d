//! Profiling log aggregation.
//!
//! Input is tab-separated, one record per line:
//!
//! ```text
//! <index>\t<timestamp>\t<method>\t<comment>
//! ```
//!
//! The comment runs to the end of the line, so tabs inside it are kept.
//! Lines with fewer than four fields are skipped.
//!
//! Records are grouped by method. Groups come out in the order their method
//! was first seen; records within a group keep input order.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

/// One timing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub timestamp: String,
    pub comment: String,
}

/// Records grouped by method name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    order: Vec<String>,
    by_method: HashMap<String, Vec<ProfileEntry>>,
    skipped: usize,
}

impl ProfileSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one raw line. Lines with fewer than four fields are counted as
    /// skipped. Returns whether the line was used.
    pub fn push_line(&mut self, line: &str) -> bool {
        let mut fields = line.splitn(4, '\t');
        let (Some(_index), Some(timestamp), Some(method), Some(comment)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            self.skipped += 1;
            return false;
        };

        let entry = ProfileEntry {
            timestamp: timestamp.to_string(),
            comment: comment.trim_end_matches(['\r', '\n']).to_string(),
        };
        match self.by_method.get_mut(method) {
            Some(entries) => entries.push(entry),
            None => {
                self.order.push(method.to_string());
                self.by_method.insert(method.to_string(), vec![entry]);
            }
        }
        true
    }

    /// Methods in first-seen order, with their records.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[ProfileEntry])> {
        self.order.iter().map(move |m| {
            let entries = self.by_method.get(m).map(Vec::as_slice).unwrap_or_default();
            (m.as_str(), entries)
        })
    }

    pub fn method_count(&self) -> usize {
        self.order.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Print each method followed by `<timestamp> <comment>` per record.
    pub fn render<W: Write>(&self, mut out: W) -> io::Result<()> {
        for (method, entries) in self.groups() {
            writeln!(out, "{}", method)?;
            for entry in entries {
                writeln!(out, "{} {}", entry.timestamp, entry.comment)?;
            }
        }
        Ok(())
    }
}

/// Read all records from `input`.
pub fn aggregate<R: BufRead>(input: R) -> io::Result<ProfileSummary> {
    let mut summary = ProfileSummary::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        if !summary.push_line(&line) {
            tracing::warn!(line = idx + 1, "skipping profiling record with fewer than four fields");
        }
    }
    Ok(summary)
}
