//! Infrastructure layer
//!
//! Network, filesystem, and credential plumbing around the core namespace
//! mechanism.

pub mod auth;
pub mod dirs;
pub mod filesystem;
pub mod git;
pub mod local;
pub mod source;

use std::path::{Path, PathBuf};

use crate::error::FetchError;
use source::RepoSource;

/// Materializes repositories on the local filesystem
///
/// The remote fetcher collaborator: opaque, blocking, retry-free. The core
/// treats every failure the same way and never inspects partial progress.
pub trait RemoteFetcher: Send + Sync {
    /// The local directory this fetcher uses for a repository
    fn local_dir(&self, source: &RepoSource) -> PathBuf;

    /// Materialize a fresh local copy, replacing any stale copy at the
    /// destination; returns the local path
    fn clone_repo(&self, source: &RepoSource, branch: &str) -> Result<PathBuf, FetchError>;

    /// Update an existing local copy in place
    fn update_repo(
        &self,
        local_path: &Path,
        source: &RepoSource,
        branch: &str,
    ) -> Result<(), FetchError>;
}
