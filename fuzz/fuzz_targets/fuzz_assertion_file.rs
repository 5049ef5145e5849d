//! Fuzz target for assertion file parsing and evaluation.

#![no_main]

use boa_harness::assertions::Evaluator;
use boa_harness::{AnalyzerOutput, BlameIndex, Finding};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    let mut blame = BlameIndex::new();
    blame.insert("buf", Some("a.c:1"), "Addition [a.c:2]");
    let output = AnalyzerOutput {
        findings: vec![Finding::new("buf", "a.c:1")],
        blame: Some(blame),
    };
    let _ = Evaluator::new(&output, std::io::sink()).evaluate_str("fuzz.asserts", text);
});
