//! Golden test utilities for manifest text.
//!
//! Golden files live in `docs/test_vectors/` at the workspace root. Set
//! `UPDATE_GOLDEN=1` to rewrite them from the actual output.

use std::fs;
use std::path::{Path, PathBuf};

/// A golden test that compares manifest text against expected files.
pub struct GoldenTest {
    name: String,
    golden_dir: PathBuf,
    update_mode: bool,
}

impl GoldenTest {
    /// Creates a new golden test reading files from `golden_dir`.
    pub fn new(name: impl Into<String>, golden_dir: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            golden_dir: golden_dir.as_ref().to_path_buf(),
            update_mode: std::env::var("UPDATE_GOLDEN").is_ok(),
        }
    }

    /// Creates a golden test using the workspace test vectors directory.
    pub fn with_default_dir(name: impl Into<String>) -> Self {
        Self::new(name, default_golden_dir())
    }

    /// Asserts that `actual` matches the golden file `<name>_<suffix>.golden`.
    ///
    /// Manifest lines are compared one by one so a failure names the first
    /// differing stream.
    pub fn assert_manifest(&self, suffix: &str, actual: &str) {
        let path = self.file_path(suffix);

        if self.update_mode {
            update_golden_file(&path, actual);
            return;
        }

        let expected = fs::read_to_string(&path).unwrap_or_else(|_| {
            panic!(
                "Golden file not found: {}\n\
                 Run with UPDATE_GOLDEN=1 to create it.\n\
                 Actual:\n{actual}",
                path.display()
            )
        });

        for (line_no, (want, got)) in expected.lines().zip(actual.lines()).enumerate() {
            assert_eq!(
                want,
                got,
                "Golden test '{}' ({suffix}) differs at line {}",
                self.name,
                line_no + 1
            );
        }
        assert_eq!(
            expected, actual,
            "Golden test '{}' ({suffix}) failed. Run with UPDATE_GOLDEN=1 to update.",
            self.name
        );
    }

    fn file_path(&self, suffix: &str) -> PathBuf {
        let filename = if suffix.is_empty() {
            format!("{}.golden", self.name)
        } else {
            format!("{}_{}.golden", self.name, suffix)
        };
        self.golden_dir.join(filename)
    }
}

/// Returns `docs/test_vectors` under the workspace root.
#[must_use]
pub fn default_golden_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.join("docs").join("test_vectors"))
        .unwrap_or_else(|| PathBuf::from("test_vectors"))
}

fn update_golden_file(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create golden directory");
    }
    fs::write(path, text).expect("Failed to write golden file");
    println!("Updated golden file: {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_match_passes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample_root.golden"), ". x\n").unwrap();
        let golden = GoldenTest::new("sample", dir.path());
        if !golden.update_mode {
            golden.assert_manifest("root", ". x\n");
        }
    }

    #[test]
    #[should_panic(expected = "differs at line 2")]
    fn golden_mismatch_names_line() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.golden"), "a\nb\n").unwrap();
        let mut golden = GoldenTest::new("sample", dir.path());
        golden.update_mode = false;
        golden.assert_manifest("", "a\nc\n");
    }
}
