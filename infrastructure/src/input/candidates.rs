//! Candidate pool loading
//!
//! The pipeline itself never touches the filesystem; this loader is the
//! CLI-facing stand-in for whatever produced the papers upstream.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use triage_domain::{Candidate, CandidateSet, CandidateSetError};

/// Errors raised while loading a candidate file
#[derive(Debug, Error)]
pub enum CandidateLoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid candidate pool: {0}")]
    Invalid(#[from] CandidateSetError),
}

/// Load a candidate pool from a JSON array of `{id, title, abstract}`
pub fn load_candidates(path: &Path) -> Result<CandidateSet, CandidateLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CandidateLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let candidates: Vec<Candidate> =
        serde_json::from_str(&raw).map_err(|source| CandidateLoadError::Json {
            path: path.display().to_string(),
            source,
        })?;

    let pool = CandidateSet::new(candidates)?;
    info!(candidates = pool.len(), path = %path.display(), "loaded candidate pool");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("papers.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_valid_pool() {
        let (_dir, path) = write_file(
            r#"[
                {"id": "2401.0001", "title": "First", "abstract": "About first."},
                {"id": "2401.0002", "title": "Second", "abstract": "About second."}
            ]"#,
        );
        let pool = load_candidates(&path).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool[0].id, "2401.0001");
        assert_eq!(pool[1].title, "Second");
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let (_dir, path) = write_file(
            r#"[
                {"id": "x", "title": "A", "abstract": "a"},
                {"id": "x", "title": "B", "abstract": "b"}
            ]"#,
        );
        let err = load_candidates(&path).unwrap_err();
        assert!(matches!(
            err,
            CandidateLoadError::Invalid(CandidateSetError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let (_dir, path) = write_file("not json at all");
        let err = load_candidates(&path).unwrap_err();
        assert!(matches!(err, CandidateLoadError::Json { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_candidates(Path::new("/nonexistent/papers.json")).unwrap_err();
        assert!(matches!(err, CandidateLoadError::Io { .. }));
    }
}
