// Copyright 2024-2026 boa-harness Contributors
// SPDX-License-Identifier: Apache-2.0

//! `--show-config`: print the effective configuration as `KEY=value` lines.

use std::io::{self, Write};

use crate::config::HarnessConfig;
use crate::protocol::ProtocolMode;
use crate::telemetry::LogFormat;

/// Print effective config to stdout.
pub fn run_show(cfg: &HarnessConfig) -> io::Result<()> {
    write_config(cfg, io::stdout().lock())
}

pub fn write_config<W: Write>(cfg: &HarnessConfig, mut out: W) -> io::Result<()> {
    let protocol = match cfg.protocol {
        ProtocolMode::Legacy => "legacy",
        ProtocolMode::Json => "json",
    };
    let log_format = match cfg.log.format {
        LogFormat::Json => "json",
        LogFormat::Pretty => "pretty",
    };
    writeln!(out, "BOA_EXECUTABLE={}", cfg.analyzer.display())?;
    writeln!(out, "BOA_FLAGS={}", cfg.flags.join(" "))?;
    writeln!(out, "BOA_SOURCE_SUFFIX={}", cfg.source_suffix)?;
    writeln!(out, "BOA_ASSERTS_SUFFIX={}", cfg.asserts_suffix)?;
    writeln!(out, "BOA_TIMEOUT_SECS={}", cfg.timeout.as_secs())?;
    writeln!(out, "BOA_PROTOCOL={}", protocol)?;
    writeln!(out, "BOA_LOG={}", cfg.log.level)?;
    writeln!(out, "BOA_LOG_FORMAT={}", log_format)?;
    let log_file = cfg.log.output_path.as_deref().map(|p| p.display().to_string());
    writeln!(out, "BOA_LOG_FILE={}", log_file.unwrap_or_default())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_config_includes_all_fields() {
        let cfg = HarnessConfig {
            flags: vec!["-mem2reg".into(), "-blame".into()],
            ..Default::default()
        };
        let mut out = Vec::new();
        write_config(&cfg, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "BOA_EXECUTABLE=./boa\n\
             BOA_FLAGS=-mem2reg -blame\n\
             BOA_SOURCE_SUFFIX=.c\n\
             BOA_ASSERTS_SUFFIX=.asserts\n\
             BOA_TIMEOUT_SECS=120\n\
             BOA_PROTOCOL=legacy\n\
             BOA_LOG=warn\n\
             BOA_LOG_FORMAT=pretty\n\
             BOA_LOG_FILE=\n"
        );
    }

    #[test]
    fn test_write_config_shows_log_file() {
        let mut cfg = HarnessConfig::default();
        cfg.log.output_path = Some("/var/log/boa-test.log".into());
        let mut out = Vec::new();
        write_config(&cfg, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("BOA_LOG_FILE=/var/log/boa-test.log\n"));
    }
}
