//! Fuzz target for legacy diagnostic stream decoding.
//!
//! Arbitrary analyzer output must decode to a result or a protocol error,
//! never a panic.

#![no_main]

use arbitrary::Arbitrary;
use boa_harness::protocol::{parse_diagnostics, ProtocolMode};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    blame_mode: bool,
    stream: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let _ = parse_diagnostics(input.stream, ProtocolMode::Legacy, input.blame_mode);
});
