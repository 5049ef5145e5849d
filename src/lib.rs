//! boa-harness
//!
//! Drives the external boa buffer overrun analyzer from the outside: runs it
//! on a C test case, decodes the findings and blame annotations it prints on
//! stderr, and checks them against a hand-written assertion file.
//!
//! # Flow
//!
//! 1. [`runner`] spawns `<analyzer> [flags...] <test>.c` and drains stderr.
//! 2. [`protocol`] decodes the stream into an [`protocol::AnalyzerOutput`].
//! 3. [`assertions`] evaluates `<test>.asserts` against it.
//! 4. The process exit code reflects the worst [`error::ExitClass`] seen.
//!
//! [`prof`] is an unrelated helper that groups profiling log records by
//! method.

pub mod assertions;
pub mod cli;
pub mod config;
pub mod error;
pub mod harness;
pub mod prof;
pub mod protocol;
pub mod runner;
pub mod telemetry;

pub use assertions::{Assertion, AssertionError, EvaluationReport};
pub use config::HarnessConfig;
pub use error::{ExitClass, HarnessError};
pub use harness::Harness;
pub use protocol::{AnalyzerOutput, BlameIndex, Finding, ProtocolMode};
pub use runner::{AnalyzerCommand, TestCase};
