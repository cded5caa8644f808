//! Source file discovery.

use std::path::{Component, Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "cs";

/// Directory names skipped while walking.
const SKIP_DIRS: &[&str] = &["bin", "obj", ".git", "target", "node_modules"];

fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

fn in_skip_dir(path: &Path) -> bool {
    path.components().any(|component| {
        matches!(component, Component::Normal(name)
            if SKIP_DIRS.iter().any(|skip| name.to_string_lossy() == *skip))
    })
}

/// `*.cs`, but not previously generated `*.g.cs` files.
fn is_source_file(path: &Path) -> bool {
    let is_cs = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION));
    let generated = path
        .file_stem()
        .and_then(|stem| Path::new(stem).extension())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("g"));
    is_cs && !generated
}

/// Source files under `paths`, sorted so tree order is reproducible.
///
/// Explicitly listed files are taken as long as they are sources and not
/// excluded. Directories are walked, skipping build output directories and
/// anything under `output_dir`.
///
/// # Errors
/// Returns an error for an invalid exclude pattern or a missing path.
pub fn find_sources(
    paths: &[PathBuf],
    exclude: &[String],
    output_dir: &Path,
) -> anyhow::Result<Vec<PathBuf>> {
    let exclude_patterns = exclude
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| anyhow::anyhow!("invalid exclude pattern '{p}': {e}")))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let output_dir = output_dir.canonicalize().ok();
    let in_output_dir = |path: &Path| {
        output_dir.as_ref().is_some_and(|out| {
            path.canonicalize()
                .is_ok_and(|canonical| canonical.starts_with(out))
        })
    };

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            if is_source_file(path) && !matches_exclude(path, &exclude_patterns) {
                files.push(path.clone());
            }
            continue;
        }
        if !path.is_dir() {
            anyhow::bail!("path does not exist: {}", path.display());
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
        {
            let file_path = entry.path();
            let relative = file_path.strip_prefix(path).unwrap_or(file_path);
            if !file_path.is_file() || !is_source_file(file_path) || in_skip_dir(relative) {
                continue;
            }
            if matches_exclude(file_path, &exclude_patterns) {
                tracing::debug!(path = %file_path.display(), "excluded by pattern");
                continue;
            }
            if in_output_dir(file_path) {
                tracing::trace!(path = %file_path.display(), "skipping output directory");
                continue;
            }
            files.push(file_path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!(count = files.len(), "discovered source files");
    Ok(files)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class A {}").unwrap();
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_finds_sources_and_skips_generated_and_build_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/B.cs");
        touch(root, "src/A.cs");
        touch(root, "src/A.g.cs");
        touch(root, "src/notes.txt");
        touch(root, "obj/Debug/Gen.cs");
        touch(root, "bin/X.cs");
        touch(root, "generated/Old.cs");

        let files = find_sources(&[root.to_path_buf()], &[], &root.join("generated")).unwrap();
        assert_eq!(relative(root, &files), vec!["src/A.cs", "src/B.cs"]);
    }

    #[test]
    fn test_exclude_patterns_match_paths_and_names() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/Keep.cs");
        touch(root, "src/Legacy/Old.cs");
        touch(root, "src/Skip.cs");

        let exclude = vec!["*/Legacy/*".to_owned(), "Skip.cs".to_owned()];
        let files = find_sources(&[root.to_path_buf()], &exclude, &root.join("out")).unwrap();
        assert_eq!(relative(root, &files), vec!["src/Keep.cs"]);
    }

    #[test]
    fn test_invalid_pattern_and_missing_path_are_errors() {
        let dir = TempDir::new().unwrap();
        assert!(find_sources(&[dir.path().to_path_buf()], &["[".to_owned()], dir.path()).is_err());
        assert!(find_sources(&[dir.path().join("missing")], &[], dir.path()).is_err());
    }
}
