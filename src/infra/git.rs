//! Git fetcher
//!
//! Clones repositories with the gix crate. Updates are implemented as a
//! fresh shallow clone into a staging directory that is swapped into place:
//! gix exposes no porcelain pull/merge, and the refresh contract only
//! requires that the local copy end up at the branch tip.

use gix::remote::fetch::Shallow;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FetchError;
use crate::infra::source::RepoSource;
use crate::infra::RemoteFetcher;

/// Suffix for the staging directory used during updates
const STAGING_SUFFIX: &str = ".staging";

/// Fetches repositories over git
#[derive(Debug)]
pub struct GitFetcher {
    /// Directory clones are placed in, one subdirectory per repository
    repos_dir: PathBuf,
    /// Optional authentication token spliced into clone URLs
    token: Option<String>,
}

impl GitFetcher {
    /// Create a fetcher cloning into `repos_dir`
    pub fn new(repos_dir: PathBuf, token: Option<String>) -> Self {
        Self { repos_dir, token }
    }

    /// Shallow-clone `source` at `branch` into `dest`
    ///
    /// Error messages carry the credential-free URL only.
    fn clone_into(
        &self,
        source: &RepoSource,
        branch: &str,
        dest: &Path,
    ) -> Result<(), FetchError> {
        let url = source.authenticated_url(self.token.as_deref());
        // gix errors may echo the URL it was given, so scrub the token
        let clone_failed = |e: String| FetchError::CloneFailed {
            url: source.url().to_string(),
            error: redact(&e, self.token.as_deref()),
        };

        debug!(url = source.url(), branch, dest = %dest.display(), "cloning repository");

        let prepare = gix::prepare_clone(url.as_str(), dest)
            .map_err(|e| clone_failed(e.to_string()))?
            .with_shallow(Shallow::DepthAtRemote(1.try_into().unwrap()));

        // Fetch only the requested branch
        let mut prepare = prepare
            .with_ref_name(Some(branch))
            .map_err(|e| clone_failed(e.to_string()))?;

        let (mut checkout, _outcome) = prepare
            .fetch_then_checkout(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
            .map_err(|e| clone_failed(e.to_string()))?;

        let (_repo, _outcome) = checkout
            .main_worktree(gix::progress::Discard, &gix::interrupt::IS_INTERRUPTED)
            .map_err(|e| clone_failed(e.to_string()))?;

        Ok(())
    }
}

impl RemoteFetcher for GitFetcher {
    fn local_dir(&self, source: &RepoSource) -> PathBuf {
        self.repos_dir.join(source.name())
    }

    fn clone_repo(&self, source: &RepoSource, branch: &str) -> Result<PathBuf, FetchError> {
        let dest = self.local_dir(source);

        // Replace any stale copy
        if dest.exists() {
            std::fs::remove_dir_all(&dest).map_err(|e| FetchError::IoError {
                path: dest.clone(),
                error: e.to_string(),
            })?;
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FetchError::IoError {
                path: parent.to_path_buf(),
                error: e.to_string(),
            })?;
        }

        self.clone_into(source, branch, &dest)?;
        Ok(dest)
    }

    fn update_repo(
        &self,
        local_path: &Path,
        source: &RepoSource,
        branch: &str,
    ) -> Result<(), FetchError> {
        // Refuse to update something that is not a repository
        gix::open(local_path).map_err(|e| FetchError::InvalidRepository {
            path: local_path.to_path_buf(),
            error: e.to_string(),
        })?;

        let staging = staging_dir(local_path);
        if staging.exists() {
            std::fs::remove_dir_all(&staging).map_err(|e| FetchError::IoError {
                path: staging.clone(),
                error: e.to_string(),
            })?;
        }

        // Clone the branch tip into staging, then swap it into place
        if let Err(e) = self.clone_into(source, branch, &staging) {
            let _ = std::fs::remove_dir_all(&staging);
            return Err(FetchError::UpdateFailed {
                path: local_path.to_path_buf(),
                branch: branch.to_string(),
                error: e.to_string(),
            });
        }

        std::fs::remove_dir_all(local_path).map_err(|e| FetchError::IoError {
            path: local_path.to_path_buf(),
            error: e.to_string(),
        })?;
        std::fs::rename(&staging, local_path).map_err(|e| FetchError::IoError {
            path: local_path.to_path_buf(),
            error: e.to_string(),
        })?;

        debug!(path = %local_path.display(), branch, "repository updated");
        Ok(())
    }
}

/// Remove the token from a message destined for logs or errors
fn redact(message: &str, token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => message.replace(token, "***"),
        _ => message.to_string(),
    }
}

/// Staging directory placed next to the repository being updated
fn staging_dir(local_path: &Path) -> PathBuf {
    let mut name = local_path
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    name.push_str(STAGING_SUFFIX);
    local_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_dir_uses_repo_name() {
        let temp = TempDir::new().unwrap();
        let fetcher = GitFetcher::new(temp.path().to_path_buf(), None);
        let source = RepoSource::parse("octocat/hello-world");
        assert_eq!(fetcher.local_dir(&source), temp.path().join("hello-world"));
    }

    #[test]
    fn test_staging_dir_is_sibling() {
        let staging = staging_dir(Path::new("/repos/hello-world"));
        assert_eq!(staging, Path::new("/repos/hello-world.staging"));
    }

    #[test]
    fn test_clone_repo_invalid_url() {
        let temp = TempDir::new().unwrap();
        let fetcher = GitFetcher::new(temp.path().to_path_buf(), None);
        let source =
            RepoSource::parse("https://invalid-url-that-does-not-exist.example.com/repo.git");

        let result = fetcher.clone_repo(&source, "main");
        assert!(result.is_err());
        match result.unwrap_err() {
            FetchError::CloneFailed { url, .. } => {
                assert!(url.contains("invalid-url"));
            }
            e => panic!("Expected CloneFailed error, got: {e:?}"),
        }
    }

    #[test]
    fn test_clone_error_hides_token() {
        let temp = TempDir::new().unwrap();
        let fetcher = GitFetcher::new(temp.path().to_path_buf(), Some("sekrit".to_string()));
        let source =
            RepoSource::parse("https://invalid-url-that-does-not-exist.example.com/repo.git");

        let err = fetcher.clone_repo(&source, "main").unwrap_err();
        assert!(!err.to_string().contains("sekrit"));
    }

    #[test]
    fn test_update_repo_rejects_non_repository() {
        let temp = TempDir::new().unwrap();
        let plain_dir = temp.path().join("not-a-repo");
        std::fs::create_dir(&plain_dir).unwrap();

        let fetcher = GitFetcher::new(temp.path().to_path_buf(), None);
        let source = RepoSource::parse("octocat/not-a-repo");

        let err = fetcher.update_repo(&plain_dir, &source, "main").unwrap_err();
        assert!(matches!(err, FetchError::InvalidRepository { .. }));
    }

    #[test]
    #[ignore = "requires network access - run with --ignored"]
    fn test_clone_repo_with_branch() {
        let temp = TempDir::new().unwrap();
        let fetcher = GitFetcher::new(temp.path().to_path_buf(), None);
        let source = RepoSource::parse("https://github.com/octocat/Hello-World.git");

        let result = fetcher.clone_repo(&source, "master");
        assert!(result.is_ok(), "Clone should succeed: {result:?}");
        assert!(result.unwrap().join(".git").exists());
    }
}
