//! Analyzer invocation.
//!
//! Runs `<analyzer> [flags...] <source>` to completion, drains stderr and
//! hands it to the protocol decoder. Nothing is parsed until the process
//! has exited.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::config::HarnessConfig;
use crate::protocol::{self, AnalyzerOutput, ProtocolError, ProtocolMode};

/// Analyzer flag that turns on blame output.
pub const BLAME_FLAG: &str = "-blame";

/// Errors from running the analyzer.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start analyzer {executable}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for analyzer: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Analyzer timeout after {0}s")]
    Timeout(u64),

    #[error("Analyzer output is malformed: {0}")]
    Protocol(#[from] ProtocolError),
}

impl RunnerError {
    /// True when the analyzer ran but its output could not be decoded.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

/// A test case: a source file to analyze and the assertions to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub source: PathBuf,
    pub asserts: PathBuf,
}

impl TestCase {
    /// Resolve `name` to `<name><source_suffix>` and `<name><asserts_suffix>`.
    pub fn resolve(name: &str, config: &HarnessConfig) -> Self {
        Self {
            name: name.to_string(),
            source: PathBuf::from(format!("{}{}", name, config.source_suffix)),
            asserts: PathBuf::from(format!("{}{}", name, config.asserts_suffix)),
        }
    }
}

/// One analyzer invocation.
#[derive(Debug, Clone)]
pub struct AnalyzerCommand {
    pub executable: PathBuf,
    /// Passed through unchanged, in order, before the source file.
    pub flags: Vec<String>,
    pub source: PathBuf,
    pub timeout: Duration,
    pub protocol: ProtocolMode,
}

impl AnalyzerCommand {
    pub fn new(executable: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            flags: Vec::new(),
            source: source.into(),
            timeout: Duration::from_secs(120),
            protocol: ProtocolMode::Legacy,
        }
    }

    /// Build the invocation for `case`: config flags first, then `flags`.
    pub fn for_case(case: &TestCase, config: &HarnessConfig, flags: &[String]) -> Self {
        Self {
            executable: config.analyzer.clone(),
            flags: config.flags.iter().chain(flags).cloned().collect(),
            source: case.source.clone(),
            timeout: config.timeout,
            protocol: config.protocol,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_protocol(mut self, protocol: ProtocolMode) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn blame_mode(&self) -> bool {
        self.flags.iter().any(|f| f == BLAME_FLAG)
    }

    /// Full argument vector, for logging.
    pub fn args(&self) -> Vec<&str> {
        self.flags
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(path_str(&self.source)))
            .collect()
    }

    /// Run the analyzer and return its stderr.
    ///
    /// The exit status is logged but not interpreted; the analyzer exits
    /// non-zero whenever it reports overruns. A run exceeding the timeout
    /// is killed.
    pub async fn capture(&self) -> Result<String, RunnerError> {
        tracing::debug!(
            executable = %self.executable.display(),
            args = ?self.args(),
            "starting analyzer"
        );

        let child = Command::new(&self.executable)
            .args(&self.flags)
            .arg(&self.source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(RunnerError::Wait)?,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "analyzer timed out, killed");
                return Err(RunnerError::Timeout(self.timeout.as_secs()));
            }
        };

        tracing::debug!(
            status = ?output.status.code(),
            stderr_bytes = output.stderr.len(),
            "analyzer exited"
        );
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }

    /// Run the analyzer and decode its diagnostic stream.
    pub async fn run(&self) -> Result<AnalyzerOutput, RunnerError> {
        let stderr = self.capture().await?;
        let output = protocol::parse_diagnostics(&stderr, self.protocol, self.blame_mode())?;
        Ok(output)
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap_or("<non-utf8 path>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_suffixes() {
        let config = HarnessConfig {
            source_suffix: ".i".into(),
            ..Default::default()
        };
        let case = TestCase::resolve("tests/testcases/array", &config);
        assert_eq!(case.source, PathBuf::from("tests/testcases/array.i"));
        assert_eq!(case.asserts, PathBuf::from("tests/testcases/array.asserts"));
    }

    #[test]
    fn test_for_case_orders_flags() {
        let config = HarnessConfig {
            flags: vec!["-mem2reg".into()],
            timeout: Duration::from_secs(9),
            ..Default::default()
        };
        let case = TestCase::resolve("t", &config);
        let cmd = AnalyzerCommand::for_case(&case, &config, &[BLAME_FLAG.to_string()]);
        assert_eq!(cmd.args(), vec!["-mem2reg", "-blame", "t.c"]);
        assert_eq!(cmd.timeout, Duration::from_secs(9));
        assert!(cmd.blame_mode());
    }

    #[test]
    fn test_blame_mode_requires_exact_flag() {
        let cmd = AnalyzerCommand::new("./boa", "t.c").with_flag("-blamex");
        assert!(!cmd.blame_mode());
    }

    #[test]
    fn test_spawn_failure_is_reported() {
        let cmd = AnalyzerCommand::new("/nonexistent/boa", "t.c");
        let err = tokio_test::block_on(cmd.capture()).unwrap_err();
        assert!(matches!(err, RunnerError::Spawn { .. }));
        assert!(err.to_string().contains("/nonexistent/boa"));
    }

    #[cfg(unix)]
    fn stub(dir: &tempfile::TempDir, script: &str) -> String {
        let path = dir.path().join("stub.sh");
        std::fs::write(&path, script).unwrap();
        path.display().to_string()
    }

    #[cfg(unix)]
    #[test]
    fn test_run_decodes_with_selected_protocol() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub(
            &dir,
            "echo '{\"kind\":\"finding\",\"name\":\"buf\",\"location\":\"a.c:1\"}' >&2\n",
        );
        let cmd = AnalyzerCommand::new("/bin/sh", "a.c")
            .with_flag(script)
            .with_protocol(ProtocolMode::Json)
            .with_timeout(Duration::from_secs(10));

        let output = tokio_test::block_on(cmd.run()).unwrap();
        assert!(output.has_finding("buf", "a.c:1"));
        assert!(!output.is_blame_mode());
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_analyzer() {
        let dir = tempfile::tempdir().unwrap();
        let script = stub(&dir, "sleep 30\n");
        let cmd = AnalyzerCommand::new("/bin/sh", "a.c")
            .with_flag(script)
            .with_timeout(Duration::from_secs(1));

        let err = tokio_test::block_on(cmd.capture()).unwrap_err();
        assert!(matches!(err, RunnerError::Timeout(1)));
    }
}
