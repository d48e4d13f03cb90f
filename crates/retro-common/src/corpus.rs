use std::path::{Path, PathBuf};

use crate::error::CommonError;

/// Resolve a CLI path argument into the list of submission files to process.
///
/// A file is returned as-is regardless of extension, so that an unsupported file given
/// explicitly is reported by the reader instead of being silently ignored. A directory
/// yields its direct children whose extension matches one of `extensions`
/// (case-insensitive), sorted by path.
pub fn discover(path: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, CommonError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(CommonError::InvalidPath(path.to_path_buf()));
    }

    let entries = std::fs::read_dir(path).map_err(|source| CommonError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CommonError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let candidate = entry.path();
        if candidate.is_file() && has_extension(&candidate, extensions) {
            files.push(candidate);
        }
    }
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.iter().any(|wanted| *wanted == ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "x").unwrap();
        assert_eq!(discover(&file, &["docx"]).unwrap(), vec![file]);
    }

    #[test]
    fn test_discover_directory_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.DOCX", "c.txt", "d.docx"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.docx")).unwrap();

        let files = discover(dir.path(), &["docx", "pdf"]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.DOCX", "b.pdf", "d.docx"]);
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), &["json"]).unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = discover(&dir.path().join("nope"), &["json"]).unwrap_err();
        assert!(matches!(err, CommonError::InvalidPath(_)));
    }
}
