// Copyright 2024-2026 boa-harness Contributors
// SPDX-License-Identifier: Apache-2.0

//! Running test cases from the command line.

use std::io;

use crate::cli::{config_cmd, RunArgs};
use crate::config::{self, HarnessConfig};
use crate::error::{ExitClass, HarnessError};
use crate::harness::Harness;
use crate::telemetry::init_logging;

/// Resolve configuration: defaults, file, environment, then command line.
pub fn resolve_config(args: &RunArgs) -> Result<HarnessConfig, HarnessError> {
    let mut cfg = config::load(args.config_file.as_deref())?;
    if let Some(analyzer) = &args.analyzer {
        cfg.analyzer = analyzer.clone();
    }
    if let Some(protocol) = args.protocol {
        cfg.protocol = protocol;
    }
    if let Some(timeout) = args.timeout {
        cfg.timeout = timeout;
    }
    Ok(cfg)
}

/// Run every requested test case. Diagnostics go to stderr.
pub async fn run(args: RunArgs) -> ExitClass {
    let cfg = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return e.exit_class();
        }
    };
    if let Err(e) = init_logging(&cfg.log) {
        let e = HarnessError::from(e);
        eprintln!("ERROR: {}", e);
        return e.exit_class();
    }

    tracing::debug!(
        analyzer = %cfg.analyzer.display(),
        tests = args.tests.len(),
        protocol = ?cfg.protocol,
        "running test cases"
    );
    let harness = Harness::new(cfg, args.flags);
    harness.run_all(&args.tests, io::stderr()).await
}

/// Print the configuration `run` would use.
pub fn show(args: &RunArgs) -> ExitClass {
    match resolve_config(args) {
        Ok(cfg) => match config_cmd::run_show(&cfg) {
            Ok(()) => ExitClass::Success,
            Err(e) => {
                eprintln!("ERROR: {}", e);
                ExitClass::Environment
            }
        },
        Err(e) => {
            eprintln!("ERROR: {}", e);
            e.exit_class()
        }
    }
}
