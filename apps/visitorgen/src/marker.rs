use visitorgen::marker::MARKER_SOURCE;

/// Prints the `[VisitorNode]` attribute declaration the generator injects.
pub fn run() {
    print!("{MARKER_SOURCE}");
}
