//! Generated artifacts, the sink receiving them, and per-pass name reservation.

use std::collections::HashSet;

use serde::Serialize;

/// One unit of generated source handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    /// File name, e.g. `Circle.g.cs`.
    pub name: String,
    pub text: String,
}

impl GeneratedArtifact {
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Receives finished artifacts. Artifacts already added stay added, even if
/// the pass is cancelled afterwards.
pub trait ArtifactSink {
    fn add_source(&mut self, artifact: GeneratedArtifact);
}

impl ArtifactSink for Vec<GeneratedArtifact> {
    fn add_source(&mut self, artifact: GeneratedArtifact) {
        self.push(artifact);
    }
}

/// Artifacts in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOutput {
    artifacts: Vec<GeneratedArtifact>,
}

impl GeneratorOutput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|a| a.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeneratedArtifact> {
        self.artifacts.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<GeneratedArtifact> {
        self.artifacts
    }
}

impl ArtifactSink for GeneratorOutput {
    fn add_source(&mut self, artifact: GeneratedArtifact) {
        self.artifacts.push(artifact);
    }
}

impl<'a> IntoIterator for &'a GeneratorOutput {
    type Item = &'a GeneratedArtifact;
    type IntoIter = std::slice::Iter<'a, GeneratedArtifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}

/// Reserves artifact names for one pass.
///
/// Names compare case-insensitively since generated files usually land on
/// case-insensitive file systems. A claimant offers base names from most to
/// least preferred and gets the first one still free; when all are taken the
/// last one is suffixed with `.2`, `.3`, ...
#[derive(Debug, Clone)]
pub struct HintNames {
    extension: String,
    taken: HashSet<String>,
}

impl HintNames {
    #[must_use]
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            taken: HashSet::new(),
        }
    }

    #[must_use]
    pub fn file_name(&self, base: &str) -> String {
        format!("{base}.g.{}", self.extension)
    }

    /// Takes `base` if free. Returns whether it was.
    pub fn reserve(&mut self, base: &str) -> bool {
        let key = self.file_name(base).to_lowercase();
        self.taken.insert(key)
    }

    /// First free candidate as a file name.
    pub fn claim(&mut self, candidates: &[String]) -> String {
        if let Some(base) = candidates.iter().find(|c| self.reserve(c)) {
            return self.file_name(base);
        }
        let last = candidates.last().map_or("artifact", String::as_str);
        let mut n = 2usize;
        loop {
            let base = format!("{last}.{n}");
            if self.reserve(&base) {
                return self.file_name(&base);
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn claims_fall_back_through_candidates() {
        let mut names = HintNames::new("cs");
        let candidates = strings(&["Circle", "A.Circle", "A.Circle.IShape"]);
        assert_eq!(names.claim(&candidates), "Circle.g.cs");
        assert_eq!(names.claim(&candidates), "A.Circle.g.cs");
        assert_eq!(names.claim(&candidates), "A.Circle.IShape.g.cs");
        assert_eq!(names.claim(&candidates), "A.Circle.IShape.2.g.cs");
        assert_eq!(names.claim(&candidates), "A.Circle.IShape.3.g.cs");
    }

    #[test]
    fn reservation_is_case_insensitive() {
        let mut names = HintNames::new("cs");
        assert!(names.reserve("VisitorNodeAttribute"));
        assert_eq!(
            names.claim(&strings(&["visitornodeattribute", "Ns.VisitorNodeAttribute"])),
            "Ns.VisitorNodeAttribute.g.cs"
        );
    }

    #[test]
    fn output_keeps_insertion_order() {
        let mut out = GeneratorOutput::new();
        out.add_source(GeneratedArtifact::new("b.g.cs", "b"));
        out.add_source(GeneratedArtifact::new("a.g.cs", "a"));
        assert_eq!(out.names().collect::<Vec<_>>(), vec!["b.g.cs", "a.g.cs"]);
        assert_eq!(out.get("a.g.cs").unwrap().text, "a");
        assert!(out.get("c.g.cs").is_none());
    }
}
