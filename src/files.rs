//! Filesystem side of a release: version files and the history file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::bump::replace_version;
use crate::domain::history::prepend_block;
use crate::error::{ReleaseError, Result};

/// Rewrites the version identifier in every file to `new_version`.
///
/// Files are processed in order; the first missing file or file without a
/// version identifier aborts with an error naming it. Files already written
/// before the failure are left as they are.
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Paths that were modified
pub fn bump_version_files(paths: &[PathBuf], new_version: &str) -> Result<Vec<PathBuf>> {
    let mut modified = Vec::with_capacity(paths.len());

    for path in paths {
        let contents = fs::read_to_string(path).map_err(|e| {
            ReleaseError::version_file(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        let updated = replace_version(&contents, new_version).ok_or_else(|| {
            ReleaseError::version_file(format!(
                "No version identifier found in '{}'",
                path.display()
            ))
        })?;

        fs::write(path, updated)?;
        log::debug!("Bumped {} to {}", path.display(), new_version);
        modified.push(path.clone());
    }

    Ok(modified)
}

/// Prepends a rendered history block to `path`, creating the file if needed.
pub fn prepend_to_history_file(path: &Path, block: &str) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    fs::write(path, prepend_block(&existing, block))?;
    log::debug!("Prepended {} bytes to {}", block.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bump_version_files() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("package.json");
        let toml = dir.path().join("Cargo.toml");
        fs::write(&json, "{\n  \"version\": \"1.0.0\"\n}\n").unwrap();
        fs::write(&toml, "[package]\nversion = \"1.0.0\"\n").unwrap();

        let modified = bump_version_files(&[json.clone(), toml.clone()], "1.1.0").unwrap();

        assert_eq!(modified, vec![json.clone(), toml.clone()]);
        assert!(fs::read_to_string(&json).unwrap().contains("\"version\": \"1.1.0\""));
        assert!(fs::read_to_string(&toml).unwrap().contains("version = \"1.1.0\""));
    }

    #[test]
    fn test_bump_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = bump_version_files(&[dir.path().join("nope.json")], "1.0.0").unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn test_bump_file_without_version() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bower.json");
        fs::write(&path, "{\"name\": \"x\"}").unwrap();

        let err = bump_version_files(&[path], "1.0.0").unwrap_err();
        assert!(matches!(err, ReleaseError::VersionFile(_)));
    }

    #[test]
    fn test_prepend_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History.md");

        prepend_to_history_file(&path, "### 0.1.0 / today\n\n* first").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "### 0.1.0 / today\n\n* first\n"
        );
    }

    #[test]
    fn test_prepend_keeps_existing_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("History.md");
        fs::write(&path, "### 0.1.0 / before\n\n* first\n").unwrap();

        prepend_to_history_file(&path, "### 0.2.0 / now\n\n* second").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "### 0.2.0 / now\n\n* second\n\n### 0.1.0 / before\n\n* first\n"
        );
    }
}
