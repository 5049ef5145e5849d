//! Fuzz target for structured diagnostic records.

#![no_main]

use boa_harness::protocol::{parse_diagnostics, ProtocolMode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let _ = parse_diagnostics(&text, ProtocolMode::Json, true);
});
