//! Repository manager
//!
//! Ties the fetcher, the scanner, and the cache together. All caching
//! decisions live here: fetchers only move bytes, the scanner only builds
//! trees, and the cache only stores what it is given.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::cache::{RepoCache, RepoEntry, RepoKey};
use crate::core::node::LazyNode;
use crate::core::scanner::Scanner;
use crate::error::LazyrepoError;
use crate::infra::source::RepoSource;
use crate::infra::RemoteFetcher;

/// Imports repositories and keeps them cached for the life of the process
pub struct RepoManager {
    fetcher: Box<dyn RemoteFetcher>,
    scanner: Scanner,
    cache: RepoCache,
}

impl RepoManager {
    /// Create a manager with an empty cache
    pub fn new(fetcher: Box<dyn RemoteFetcher>, scanner: Scanner) -> Self {
        Self {
            fetcher,
            scanner,
            cache: RepoCache::new(),
        }
    }

    /// Import a repository, returning the root of its lazy namespace
    ///
    /// A cache hit returns the existing tree without touching the network or
    /// the filesystem, so already-resolved modules stay resolved. On a miss
    /// the repository is cloned fresh (replacing any stale local copy),
    /// scanned, and cached.
    pub fn import_repository(
        &mut self,
        identifier: &str,
        branch: &str,
    ) -> Result<Arc<LazyNode>, LazyrepoError> {
        let key = RepoKey::new(identifier, branch);
        if let Some(entry) = self.cache.get(&key) {
            debug!(%key, "repository cache hit");
            return Ok(Arc::clone(&entry.root));
        }

        let source = RepoSource::parse(identifier);
        info!(url = source.url(), branch, "fetching repository");
        let local_path = self.fetcher.clone_repo(&source, branch)?;

        let root = self.scanner.scan(source.name(), &local_path)?;
        self.cache.insert(
            key,
            RepoEntry {
                root: Arc::clone(&root),
                local_path,
            },
        );
        Ok(root)
    }

    /// Refresh a repository to the branch tip and rebuild its namespace
    ///
    /// The cache entry is dropped before any fetching starts, so a refresh
    /// failure never leaves a stale tree behind. An in-place update is
    /// attempted first; if it fails the local copy is deleted and cloned
    /// fresh. The returned tree is new and fully unresolved.
    pub fn update_repository(
        &mut self,
        identifier: &str,
        branch: &str,
    ) -> Result<Arc<LazyNode>, LazyrepoError> {
        let key = RepoKey::new(identifier, branch);
        let cached_path = self.cache.invalidate(&key).map(|e| e.local_path);

        let source = RepoSource::parse(identifier);
        let local_path = cached_path.unwrap_or_else(|| self.fetcher.local_dir(&source));

        if !local_path.exists() {
            debug!(%key, "no local copy to update, importing instead");
            return self.import_repository(identifier, branch);
        }

        if let Err(e) = self.fetcher.update_repo(&local_path, &source, branch) {
            warn!(%key, error = %e, "in-place update failed, re-cloning");
            crate::infra::filesystem::remove_dir_all(&local_path)?;
            self.fetcher.clone_repo(&source, branch)?;
        }
        info!(%key, "repository refreshed");

        let root = self.scanner.scan(source.name(), &local_path)?;
        self.cache.insert(
            key,
            RepoEntry {
                root: Arc::clone(&root),
                local_path,
            },
        );
        Ok(root)
    }

    /// Drop a cache entry; the local clone is left on disk
    ///
    /// Returns true if an entry existed. Trees already handed out keep
    /// working; the next import builds a fresh one.
    pub fn invalidate(&mut self, identifier: &str, branch: &str) -> bool {
        self.cache
            .invalidate(&RepoKey::new(identifier, branch))
            .is_some()
    }

    /// The local path of a cached repository
    pub fn local_path(&self, identifier: &str, branch: &str) -> Option<PathBuf> {
        self.cache
            .get(&RepoKey::new(identifier, branch))
            .map(|e| e.local_path.clone())
    }

    /// The cache, for inspection
    pub fn cache(&self) -> &RepoCache {
        &self.cache
    }
}
