//! Test-case orchestration: analyze, decode, evaluate.

use std::io::Write;

use tracing::Instrument;

use crate::assertions::{display_name, read_assertion_file, EvaluationReport, Evaluator};
use crate::config::HarnessConfig;
use crate::error::{ExitClass, HarnessError};
use crate::runner::{AnalyzerCommand, TestCase, BLAME_FLAG};
use crate::telemetry::{RunSpan, SpanExt};

/// Runs test cases with one configuration and one set of analyzer flags.
#[derive(Debug, Clone)]
pub struct Harness {
    config: HarnessConfig,
    flags: Vec<String>,
}

impl Harness {
    pub fn new(config: HarnessConfig, flags: Vec<String>) -> Self {
        Self { config, flags }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn blame_mode(&self) -> bool {
        self.config
            .flags
            .iter()
            .chain(&self.flags)
            .any(|f| f == BLAME_FLAG)
    }

    /// Run one test case.
    ///
    /// The assertion file is read before the analyzer is started, so a
    /// missing file fails fast. Assertion failures are written to
    /// `diagnostics` and tallied in the report.
    pub async fn run_test<W: Write>(
        &self,
        name: &str,
        diagnostics: W,
    ) -> Result<EvaluationReport, HarnessError> {
        let case = TestCase::resolve(name, &self.config);
        let span = RunSpan::new(name, self.blame_mode());

        let result = self.run_case(&case, diagnostics).instrument(span.clone()).await;
        span.record_result(&result);
        if let Ok(report) = &result {
            span.record("failures", report.failures.len());
        }
        result
    }

    async fn run_case<W: Write>(
        &self,
        case: &TestCase,
        diagnostics: W,
    ) -> Result<EvaluationReport, HarnessError> {
        let text = read_assertion_file(&case.asserts)?;

        let command = AnalyzerCommand::for_case(case, &self.config, &self.flags);
        let output = command.run().await?;
        tracing::Span::current().record("findings", output.findings.len());
        tracing::info!(
            findings = output.findings.len(),
            blame = output.is_blame_mode(),
            "analyzer output decoded"
        );

        let report = Evaluator::new(&output, diagnostics)
            .evaluate_str(&display_name(&case.asserts), &text)?;
        Ok(report)
    }

    /// Run every test case in order and return the most severe outcome.
    ///
    /// Fatal errors are reported on `diagnostics` and do not stop later
    /// test cases from running.
    pub async fn run_all<W: Write>(&self, names: &[String], mut diagnostics: W) -> ExitClass {
        let mut worst = ExitClass::Success;

        for name in names {
            let class = match self.run_test(name, &mut diagnostics).await {
                Ok(report) if report.all_passed() => ExitClass::Success,
                Ok(_) => ExitClass::AssertionFailed,
                Err(e) => {
                    let _ = writeln!(diagnostics, "ERROR: {}: {}", name, e);
                    e.exit_class()
                }
            };
            if names.len() > 1 {
                let verdict = if class == ExitClass::Success { "PASS" } else { "FAIL" };
                let _ = writeln!(diagnostics, "{} {}", verdict, name);
            }
            worst = worst.max(class);
        }

        worst
    }
}
