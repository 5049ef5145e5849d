// Copyright 2024-2026 boa-harness Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command-line handling for `boa-test`.
//!
//! ## Usage
//!
//! ```bash
//! boa-test tests/testcases/array             # run one test case
//! boa-test -blame -mem2reg tests/testcases/a # pass flags to the analyzer
//! boa-test --show-config                     # print effective config
//! ```
//!
//! Single-dash arguments are analyzer flags and are passed through
//! unchanged. Double-dash arguments belong to the harness.

pub mod config_cmd;
pub mod run_cmd;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::HarnessError;
use crate::protocol::ProtocolMode;

/// Harness-level options and the test cases to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Analyzer flags, in command-line order.
    pub flags: Vec<String>,
    /// Test names, without suffix.
    pub tests: Vec<String>,
    pub config_file: Option<PathBuf>,
    pub analyzer: Option<PathBuf>,
    pub protocol: Option<ProtocolMode>,
    pub timeout: Option<Duration>,
}

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Run(RunArgs),
    ShowConfig(RunArgs),
    Help,
    Version,
}

fn usage_error(msg: impl Into<String>) -> HarnessError {
    HarnessError::Usage(msg.into())
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<CliCommand, HarnessError> {
    let mut run = RunArgs::default();
    let mut show_config = false;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |opt: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| usage_error(format!("Missing value for {}", opt)))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "-V" | "--version" => return Ok(CliCommand::Version),
            "--show-config" => show_config = true,
            "--config" => run.config_file = Some(PathBuf::from(value("--config")?)),
            "--analyzer" => run.analyzer = Some(PathBuf::from(value("--analyzer")?)),
            "--protocol" => {
                let raw = value("--protocol")?;
                run.protocol = Some(raw.parse().map_err(usage_error)?);
            }
            "--json-protocol" => run.protocol = Some(ProtocolMode::Json),
            "--timeout" => {
                let raw = value("--timeout")?;
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| usage_error(format!("Invalid --timeout value: {}", raw)))?;
                run.timeout = Some(Duration::from_secs(secs.max(1)));
            }
            other if other.starts_with("--") => {
                return Err(usage_error(format!("Unknown option: {}", other)));
            }
            other if other.starts_with('-') && other.len() > 1 => run.flags.push(other.to_string()),
            other => run.tests.push(other.to_string()),
        }
    }

    if show_config {
        return Ok(CliCommand::ShowConfig(run));
    }
    if run.tests.is_empty() {
        return Err(usage_error("No test name given"));
    }
    Ok(CliCommand::Run(run))
}

/// Print usage to stderr.
pub fn print_usage(program: &str) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "boa-test v{version} - run the boa analyzer against test cases and check assertions

USAGE:
    {program} [OPTIONS] [-blame] [-mem2reg] <testName>...

    For each test case, runs the analyzer on <testName>.c and checks the
    assertions in <testName>.asserts.

ANALYZER FLAGS:
    -blame           Request blame output and enable BLAME assertions
    -<flag>          Any other single-dash flag is passed through unchanged

OPTIONS:
    --config FILE    Load configuration from a TOML file
    --analyzer PATH  Analyzer executable (default: ./boa)
    --protocol MODE  Diagnostic encoding: legacy (default) or json
    --json-protocol  Same as --protocol json
    --timeout SECS   Kill the analyzer after SECS seconds (default: 120)
    --show-config    Print the effective configuration and exit
    -h, --help       Show this help message
    -V, --version    Show version information

ASSERTIONS:
    HAS   <ByName|ByLocation|ByBoth> <target> [<location>]
    NOT   <ByName|ByLocation|ByBoth> <target> [<location>]
    BLAME <ByName|ByLocation> <target> <text...>
    # comment

ENVIRONMENT:
    BOA_EXECUTABLE, BOA_SOURCE_SUFFIX, BOA_ASSERTS_SUFFIX, BOA_TIMEOUT_SECS,
    BOA_PROTOCOL, BOA_LOG, BOA_LOG_FORMAT, BOA_LOG_FILE

EXIT CODES:
    0  All assertions passed
    1  One or more assertions failed
    2  Usage or configuration error
    3  Malformed assertion file
    4  Environment error (missing file, analyzer failed to start or timed out)
    5  Malformed analyzer output"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_test_name() {
        let cmd = parse_args(&args(&["array"])).unwrap();
        assert_eq!(
            cmd,
            CliCommand::Run(RunArgs {
                tests: vec!["array".into()],
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_analyzer_flags_pass_through_in_order() {
        let cmd = parse_args(&args(&["-mem2reg", "array", "-blame"])).unwrap();
        let CliCommand::Run(run) = cmd else {
            panic!("expected run command");
        };
        assert_eq!(run.flags, vec!["-mem2reg".to_string(), "-blame".to_string()]);
        assert_eq!(run.tests, vec!["array".to_string()]);
    }

    #[test]
    fn test_harness_options() {
        let cmd = parse_args(&args(&[
            "--config",
            "h.toml",
            "--analyzer",
            "/bin/boa",
            "--protocol",
            "json",
            "--timeout",
            "0",
            "a",
            "b",
        ]))
        .unwrap();
        let CliCommand::Run(run) = cmd else {
            panic!("expected run command");
        };
        assert_eq!(run.config_file, Some(PathBuf::from("h.toml")));
        assert_eq!(run.analyzer, Some(PathBuf::from("/bin/boa")));
        assert_eq!(run.protocol, Some(ProtocolMode::Json));
        assert_eq!(run.timeout, Some(Duration::from_secs(1)));
        assert_eq!(run.tests.len(), 2);
    }

    #[test]
    fn test_usage_errors() {
        for bad in [
            vec![],
            vec!["-blame"],
            vec!["--config"],
            vec!["--timeout", "soon", "a"],
            vec!["--protocol", "xml", "a"],
            vec!["--frobnicate", "a"],
        ] {
            let err = parse_args(&args(&bad)).unwrap_err();
            assert!(matches!(err, HarnessError::Usage(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_help_and_version_win() {
        assert_eq!(parse_args(&args(&["a", "--help"])).unwrap(), CliCommand::Help);
        assert_eq!(parse_args(&args(&["-V"])).unwrap(), CliCommand::Version);
    }

    #[test]
    fn test_show_config_needs_no_test() {
        let cmd = parse_args(&args(&["--show-config", "--analyzer", "x"])).unwrap();
        assert!(matches!(cmd, CliCommand::ShowConfig(ref run) if run.tests.is_empty()));
    }

    #[test]
    fn test_lone_dash_is_a_test_name() {
        let CliCommand::Run(run) = parse_args(&args(&["-"])).unwrap() else {
            panic!("expected run command");
        };
        assert_eq!(run.tests, vec!["-".to_string()]);
    }
}
