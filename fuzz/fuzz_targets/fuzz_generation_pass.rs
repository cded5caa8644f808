#![no_main]

use libfuzzer_sys::fuzz_target;
use tokio_util::sync::CancellationToken;
use visitorgen::marker::MARKER_SOURCE;
use visitorgen::{Generator, GeneratorOutput};
use visitorgen_syntax::{Compilation, SyntaxTree};

fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let (Ok(marker), Ok(tree)) = (
        SyntaxTree::parse("VisitorNodeAttribute.g.cs", MARKER_SOURCE),
        SyntaxTree::parse("fuzz.cs", s),
    ) else {
        return;
    };
    let compilation = Compilation::new(vec![marker, tree]);
    let mut output = GeneratorOutput::new();
    let report = Generator::default().run(&compilation, &CancellationToken::new(), &mut output);

    // Every artifact the report names reached the sink, each name once
    assert_eq!(report.artifacts_emitted.len(), output.len());
    let mut names: Vec<_> = output.names().map(str::to_ascii_lowercase).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), output.len());
});
