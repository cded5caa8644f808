#![no_main]

use libfuzzer_sys::fuzz_target;
use visitorgen_syntax::SyntaxTree;

fuzz_target!(|data: &[u8]| {
    // Limit input size to avoid OOM on pathological inputs
    if data.len() > 16 * 1024 {
        return;
    }
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse errors are expected; panics are not
        let _ = SyntaxTree::parse("fuzz.cs", s);
    }
});
