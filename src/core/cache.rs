//! Repository cache
//!
//! Process-lifetime mapping from (repository identifier, branch) to the
//! imported root node and its local path. An explicit object rather than
//! global state: the process entry point constructs one (via
//! [`crate::core::manager::RepoManager`]) and passes it where needed, which
//! also keeps tests isolated.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::node::LazyNode;

/// Cache key: repository identifier plus branch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoKey {
    repo: String,
    branch: String,
}

impl RepoKey {
    /// Create a key
    pub fn new(repo: &str, branch: &str) -> Self {
        Self {
            repo: repo.to_string(),
            branch: branch.to_string(),
        }
    }

    /// Repository identifier as given by the caller
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Branch name
    pub fn branch(&self) -> &str {
        &self.branch
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repo, self.branch)
    }
}

/// One imported repository
#[derive(Debug, Clone)]
pub struct RepoEntry {
    /// Root of the lazy node tree
    pub root: Arc<LazyNode>,
    /// Local path the tree was scanned from
    pub local_path: PathBuf,
}

/// The repository cache
///
/// Entries are created on first successful import, removed on explicit
/// invalidation, and never expire otherwise.
#[derive(Debug, Default)]
pub struct RepoCache {
    entries: HashMap<RepoKey, RepoEntry>,
}

impl RepoCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entry
    pub fn get(&self, key: &RepoKey) -> Option<&RepoEntry> {
        self.entries.get(key)
    }

    /// Store an entry, replacing any previous one for the same key
    pub fn insert(&mut self, key: RepoKey, entry: RepoEntry) {
        self.entries.insert(key, entry);
    }

    /// Remove an entry; the local filesystem copy is left untouched
    pub fn invalidate(&mut self, key: &RepoKey) -> Option<RepoEntry> {
        self.entries.remove(key)
    }

    /// True if the key is cached
    pub fn contains(&self, key: &RepoKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of cached repositories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
