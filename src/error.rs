//! Harness error taxonomy and exit codes.
//!
//! Unmet expectations are not errors; they are reported by the evaluator and
//! surface as [`ExitClass::AssertionFailed`]. Everything here aborts a run.

use thiserror::Error;

use crate::assertions::AssertionError;
use crate::config::ConfigError;
use crate::runner::RunnerError;
use crate::telemetry::LogError;

/// Process exit status classes, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExitClass {
    Success,
    AssertionFailed,
    Usage,
    MalformedAssertions,
    Environment,
    Protocol,
}

impl ExitClass {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::AssertionFailed => 1,
            Self::Usage => 2,
            Self::MalformedAssertions => 3,
            Self::Environment => 4,
            Self::Protocol => 5,
        }
    }
}

/// Any error that aborts a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LogError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Assertions(#[from] AssertionError),
}

impl HarnessError {
    pub fn exit_class(&self) -> ExitClass {
        match self {
            Self::Usage(_) | Self::Config(_) | Self::Logging(_) => ExitClass::Usage,
            Self::Runner(e) if e.is_protocol() => ExitClass::Protocol,
            Self::Runner(_) => ExitClass::Environment,
            Self::Assertions(e) if e.is_malformed() => ExitClass::MalformedAssertions,
            Self::Assertions(_) => ExitClass::Environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ProtocolError;

    #[test]
    fn test_exit_codes_are_distinct() {
        let classes = [
            ExitClass::Success,
            ExitClass::AssertionFailed,
            ExitClass::Usage,
            ExitClass::MalformedAssertions,
            ExitClass::Environment,
            ExitClass::Protocol,
        ];
        let mut codes: Vec<u8> = classes.iter().map(|c| c.code()).collect();
        codes.dedup();
        assert_eq!(codes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_severity_order() {
        assert!(ExitClass::Success < ExitClass::AssertionFailed);
        assert!(ExitClass::AssertionFailed < ExitClass::MalformedAssertions);
        assert_eq!(
            ExitClass::AssertionFailed.max(ExitClass::Environment),
            ExitClass::Environment
        );
    }

    #[test]
    fn test_classification() {
        let malformed = HarnessError::from(AssertionError::BlameByBoth {
            file: "t.asserts".into(),
            line: 1,
        });
        assert_eq!(malformed.exit_class(), ExitClass::MalformedAssertions);

        let unreadable = HarnessError::from(AssertionError::Unreadable {
            path: "t.asserts".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(unreadable.exit_class(), ExitClass::Environment);

        let desync = HarnessError::from(RunnerError::from(ProtocolError::OrphanBlameLine {
            line: 3,
            text: "  - x".into(),
        }));
        assert_eq!(desync.exit_class(), ExitClass::Protocol);

        let timeout = HarnessError::from(RunnerError::Timeout(5));
        assert_eq!(timeout.exit_class(), ExitClass::Environment);

        assert_eq!(
            HarnessError::Usage("no test".into()).exit_class(),
            ExitClass::Usage
        );
    }
}
