//! Compiled contract loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors reading the contract module.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read contract module {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("contract module {0} is empty")]
    Empty(String),
}

/// A compiled contract module read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl Artifact {
    /// Read the whole file. Content is not inspected; the node validates it.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(ArtifactError::Empty(path.display().to_string()));
        }

        tracing::debug!(path = %path.display(), size = bytes.len(), "Contract module loaded");
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.wasm");
        let content: Vec<u8> = (0..=255u8).cycle().take(4_321).collect();
        std::fs::write(&path, &content).unwrap();

        let artifact = Artifact::load(&path).unwrap();
        assert_eq!(artifact.len(), 4_321);
        assert_eq!(artifact.bytes(), content.as_slice());
        assert_eq!(artifact.path(), path.as_path());
    }

    #[test]
    fn test_missing_file() {
        let err = Artifact::load(Path::new("/nonexistent/YieldOptimizer.wasm")).unwrap_err();
        assert!(matches!(err, ArtifactError::Read { .. }));
        assert!(err.to_string().contains("YieldOptimizer.wasm"));
    }

    #[test]
    fn test_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = Artifact::load(file.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Empty(_)));
    }
}
