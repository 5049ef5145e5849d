//! Span utilities and extension traits for harness tracing.

use tracing::{info_span, Span};

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for per-test-case spans.
pub struct RunSpan;

impl RunSpan {
    /// Create a span for one test case.
    ///
    /// `status`, `error.message`, `findings` and `failures` start empty and
    /// are filled in as the run progresses.
    pub fn new(test_name: &str, blame_mode: bool) -> Span {
        info_span!(
            "test_run",
            test = %test_name,
            blame_mode,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
            findings = tracing::field::Empty,
            failures = tracing::field::Empty,
        )
    }
}
