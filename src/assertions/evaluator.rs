//! Evaluation of assertions against decoded analyzer output.

use std::fmt;
use std::io::Write;
use std::path::Path;

use super::{Assertion, AssertionError, Assertions, BlameTarget, Check, Target};
use crate::protocol::{AnalyzerOutput, BlameKey};

/// Result of checking a single assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    /// Expectation not met. `detail` explains non-obvious causes.
    Failed { detail: Option<String> },
    /// BLAME assertion in a run without blame data.
    Skipped,
}

/// A reported assertion failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub line: usize,
    pub text: String,
    pub detail: Option<String>,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FAILED({}): {}", self.line, self.text)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Tally of one assertion file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    pub passed: usize,
    pub skipped: usize,
    pub failures: Vec<AssertionFailure>,
}

impl EvaluationReport {
    /// Logical AND of every evaluated assertion. Vacuously true.
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn evaluated(&self) -> usize {
        self.passed + self.failures.len()
    }
}

/// Checks assertions against one run's output, writing a line per failure
/// to `diagnostics` as it goes.
pub struct Evaluator<'a, W: Write> {
    output: &'a AnalyzerOutput,
    diagnostics: W,
}

impl<'a, W: Write> Evaluator<'a, W> {
    pub fn new(output: &'a AnalyzerOutput, diagnostics: W) -> Self {
        Self {
            output,
            diagnostics,
        }
    }

    /// Check one assertion.
    pub fn check(&self, assertion: &Assertion) -> Outcome {
        match &assertion.check {
            Check::Has(target) => pass_if(self.matches(target)),
            Check::Not(target) => pass_if(!self.matches(target)),
            Check::Blame { target, needle } => self.check_blame(target, needle),
        }
    }

    fn matches(&self, target: &Target) -> bool {
        match target {
            Target::Name(name) => self.output.has_name(name),
            Target::Location(loc) => self.output.has_location(loc),
            Target::Both { name, location } => self.output.has_finding(name, location),
        }
    }

    fn check_blame(&self, target: &BlameTarget, needle: &str) -> Outcome {
        let Some(blame) = &self.output.blame else {
            return Outcome::Skipped;
        };
        let (key, missing) = match target {
            BlameTarget::Name(name) => (
                BlameKey::Name(name),
                format!("no blame recorded for buffer name '{}'", name),
            ),
            BlameTarget::Location(loc) => (
                BlameKey::Location(loc),
                format!("no blame recorded for location '{}'", loc),
            ),
        };
        match blame.mentions(key, needle) {
            None => Outcome::Failed {
                detail: Some(missing),
            },
            Some(found) => pass_if(found),
        }
    }

    /// Evaluate every assertion in `text`.
    ///
    /// Unmet expectations are written to the diagnostic channel and
    /// evaluation continues. A malformed line aborts immediately; failures
    /// already written stay written.
    pub fn evaluate_str(
        &mut self,
        file: &str,
        text: &str,
    ) -> Result<EvaluationReport, AssertionError> {
        let mut report = EvaluationReport::default();

        for assertion in Assertions::new(file, text) {
            let assertion = assertion?;
            match self.check(&assertion) {
                Outcome::Passed => report.passed += 1,
                Outcome::Skipped => {
                    tracing::debug!(
                        line = assertion.line,
                        "blame assertion skipped outside blame mode"
                    );
                    report.skipped += 1;
                }
                Outcome::Failed { detail } => {
                    let failure = AssertionFailure {
                        line: assertion.line,
                        text: assertion.text,
                        detail,
                    };
                    // Diagnostics are best effort; the report carries the truth.
                    let _ = writeln!(self.diagnostics, "{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        tracing::debug!(
            file,
            passed = report.passed,
            failed = report.failures.len(),
            skipped = report.skipped,
            "assertion file evaluated"
        );
        Ok(report)
    }
}

fn pass_if(ok: bool) -> Outcome {
    if ok {
        Outcome::Passed
    } else {
        Outcome::Failed { detail: None }
    }
}

/// Read an assertion file into memory.
pub fn read_assertion_file(path: &Path) -> Result<String, AssertionError> {
    std::fs::read_to_string(path).map_err(|source| AssertionError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Name used for `path` in error messages.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read and evaluate an assertion file.
pub fn evaluate_file<W: Write>(
    path: &Path,
    output: &AnalyzerOutput,
    diagnostics: W,
) -> Result<EvaluationReport, AssertionError> {
    let text = read_assertion_file(path)?;
    Evaluator::new(output, diagnostics).evaluate_str(&display_name(path), &text)
}
