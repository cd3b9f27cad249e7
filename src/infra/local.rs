//! Local-directory fetcher
//!
//! Treats the repository identifier as a path on the local filesystem and
//! "clones" by copying. Useful for trying lazyrepo against a checkout that
//! already exists, and as the fetcher in offline tests.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FetchError;
use crate::infra::filesystem;
use crate::infra::source::RepoSource;
use crate::infra::RemoteFetcher;

/// Fetches repositories by copying a local directory
#[derive(Debug)]
pub struct LocalFetcher {
    repos_dir: PathBuf,
}

impl LocalFetcher {
    /// Create a fetcher copying into `repos_dir`
    pub fn new(repos_dir: PathBuf) -> Self {
        Self { repos_dir }
    }

    fn origin(source: &RepoSource) -> PathBuf {
        PathBuf::from(source.identifier())
    }
}

impl RemoteFetcher for LocalFetcher {
    fn local_dir(&self, source: &RepoSource) -> PathBuf {
        self.repos_dir.join(source.name())
    }

    fn clone_repo(&self, source: &RepoSource, _branch: &str) -> Result<PathBuf, FetchError> {
        let origin = Self::origin(source);
        if !origin.exists() {
            return Err(FetchError::CloneFailed {
                url: source.identifier().to_string(),
                error: "source directory does not exist".to_string(),
            });
        }

        let dest = self.local_dir(source);
        debug!(origin = %origin.display(), dest = %dest.display(), "copying repository");

        filesystem::remove_dir_all(&dest).map_err(|e| FetchError::IoError {
            path: dest.clone(),
            error: e.to_string(),
        })?;
        filesystem::copy_dir_all(&origin, &dest).map_err(|e| FetchError::IoError {
            path: dest.clone(),
            error: e.to_string(),
        })?;
        Ok(dest)
    }

    fn update_repo(
        &self,
        local_path: &Path,
        source: &RepoSource,
        branch: &str,
    ) -> Result<(), FetchError> {
        let origin = Self::origin(source);
        if !origin.exists() {
            return Err(FetchError::UpdateFailed {
                path: local_path.to_path_buf(),
                branch: branch.to_string(),
                error: "source directory does not exist".to_string(),
            });
        }

        filesystem::remove_dir_all(local_path).map_err(|e| FetchError::IoError {
            path: local_path.to_path_buf(),
            error: e.to_string(),
        })?;
        filesystem::copy_dir_all(&origin, local_path).map_err(|e| FetchError::IoError {
            path: local_path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clone_copies_tree() {
        let origin = TempDir::new().unwrap();
        std::fs::write(origin.path().join("utils.lzy"), "let x = 1;").unwrap();

        let repos = TempDir::new().unwrap();
        let fetcher = LocalFetcher::new(repos.path().to_path_buf());
        let source = RepoSource::parse(origin.path().to_str().unwrap());

        let dest = fetcher.clone_repo(&source, "main").unwrap();
        assert!(dest.join("utils.lzy").exists());
    }

    #[test]
    fn test_clone_missing_origin() {
        let repos = TempDir::new().unwrap();
        let fetcher = LocalFetcher::new(repos.path().to_path_buf());
        let source = RepoSource::parse("/nonexistent/origin");

        let err = fetcher.clone_repo(&source, "main").unwrap_err();
        assert!(matches!(err, FetchError::CloneFailed { .. }));
    }

    #[test]
    fn test_update_reflects_origin_changes() {
        let origin = TempDir::new().unwrap();
        std::fs::write(origin.path().join("a.lzy"), "let x = 1;").unwrap();

        let repos = TempDir::new().unwrap();
        let fetcher = LocalFetcher::new(repos.path().to_path_buf());
        let source = RepoSource::parse(origin.path().to_str().unwrap());
        let dest = fetcher.clone_repo(&source, "main").unwrap();

        std::fs::write(origin.path().join("b.lzy"), "let y = 2;").unwrap();
        std::fs::remove_file(origin.path().join("a.lzy")).unwrap();

        fetcher.update_repo(&dest, &source, "main").unwrap();
        assert!(dest.join("b.lzy").exists());
        assert!(!dest.join("a.lzy").exists());
    }
}
