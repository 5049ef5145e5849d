//! `boa-prof`: group profiling records from stdin by method name.
//!
//! ```bash
//! boa-prof < prof.tsv
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use boa_harness::config;
use boa_harness::prof;
use boa_harness::telemetry::init_logging;

fn main() -> ExitCode {
    if let Ok(cfg) = config::load(None) {
        // Logging is optional here; a bad filter must not block the report.
        let _ = init_logging(&cfg.log);
    }

    let summary = match prof::aggregate(io::stdin().lock()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Failed to read profiling records: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut out = io::stdout().lock();
    if let Err(e) = summary.render(&mut out).and_then(|_| out.flush()) {
        eprintln!("Failed to write summary: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::debug!(
        methods = summary.method_count(),
        skipped = summary.skipped(),
        "profiling summary written"
    );
    ExitCode::SUCCESS
}
