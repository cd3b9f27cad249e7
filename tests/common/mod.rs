//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use lazyrepo::core::manager::RepoManager;
use lazyrepo::core::scanner::{ScanOptions, Scanner};
use lazyrepo::eval::ScriptEngine;
use lazyrepo::infra::local::LocalFetcher;

/// An origin repository on the local filesystem plus a manager that
/// imports from it
pub struct TestRepo {
    /// The origin directory imports are fetched from
    pub origin: TempDir,
    /// Directory clones land in
    repos: TempDir,
}

impl TestRepo {
    /// Create an empty origin repository
    pub fn new() -> Self {
        Self {
            origin: TempDir::new().expect("Failed to create temp directory"),
            repos: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// The identifier to import this repository under
    pub fn identifier(&self) -> String {
        self.origin.path().to_string_lossy().into_owned()
    }

    /// Create a file in the origin
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.origin.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Remove a file from the origin
    pub fn remove_file(&self, name: &str) {
        std::fs::remove_file(self.origin.path().join(name)).expect("Failed to remove file");
    }

    /// Path clones of this repository land at
    pub fn clone_dir(&self) -> PathBuf {
        self.repos.path().to_path_buf()
    }

    /// Build a manager fetching from the local origin
    pub fn manager(&self) -> RepoManager {
        let fetcher = LocalFetcher::new(self.clone_dir());
        let scanner = Scanner::new(Arc::new(ScriptEngine::new()), ScanOptions::default());
        RepoManager::new(Box::new(fetcher), scanner)
    }
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}
