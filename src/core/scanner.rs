//! Structure scanner
//!
//! Walks a local directory tree once and builds the placeholder node tree:
//! recursively-scanned nodes for directories, unresolved references for
//! source files. No file content is parsed or executed during scanning.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::defaults::SOURCE_EXTENSION;
use crate::core::node::LazyNode;
use crate::error::ScanError;
use crate::eval::SourceEngine;

/// Scanning options
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extension (without dot) classifying files as source modules
    pub source_extension: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            source_extension: SOURCE_EXTENSION.to_string(),
        }
    }
}

/// Builds lazy node trees from local directories
pub struct Scanner {
    engine: Arc<dyn SourceEngine>,
    options: ScanOptions,
}

impl Scanner {
    /// Create a scanner that attaches `engine` to every node it builds
    pub fn new(engine: Arc<dyn SourceEngine>, options: ScanOptions) -> Self {
        Self { engine, options }
    }

    /// Scan `root`, producing the root node named `name`
    ///
    /// Fails if the root does not exist or any directory cannot be
    /// enumerated; a failed scan produces no partial tree.
    pub fn scan(&self, name: &str, root: &Path) -> Result<Arc<LazyNode>, ScanError> {
        if !root.exists() {
            return Err(ScanError::NotFound {
                path: root.to_path_buf(),
            });
        }

        if root.is_file() {
            return Ok(Arc::new(LazyNode::file(
                name.to_string(),
                root.to_path_buf(),
                Arc::clone(&self.engine),
            )));
        }

        debug!(name, root = %root.display(), "scanning repository structure");
        self.scan_dir(name, root).map(Arc::new)
    }

    fn scan_dir(&self, name: &str, path: &Path) -> Result<LazyNode, ScanError> {
        let mut children: BTreeMap<String, Arc<LazyNode>> = BTreeMap::new();
        let mut file_refs: BTreeMap<String, PathBuf> = BTreeMap::new();

        let entries = std::fs::read_dir(path).map_err(|e| ScanError::ReadDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ScanError::ReadDir {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
            let Some(entry_name) = entry.file_name().to_str().map(str::to_string) else {
                // Non-UTF-8 names cannot become attribute names
                continue;
            };

            if is_excluded(&entry_name) {
                continue;
            }

            let entry_path = entry.path();
            if entry_path.is_dir() {
                let child_name = format!("{name}.{entry_name}");
                let child = self.scan_dir(&child_name, &entry_path)?;
                children.insert(entry_name, Arc::new(child));
            } else if entry_path
                .extension()
                .is_some_and(|ext| ext == self.options.source_extension.as_str())
            {
                let stem = entry_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or(&entry_name)
                    .to_string();
                file_refs.insert(stem, entry_path);
            }
            // Other files are not part of the namespace
        }

        Ok(LazyNode::directory(
            name.to_string(),
            path.to_path_buf(),
            Arc::clone(&self.engine),
            children,
            file_refs,
        ))
    }
}

/// Entries hidden from the namespace: dotfiles and dunder bookkeeping
/// directories such as `__pycache__`
pub fn is_excluded(name: &str) -> bool {
    name.starts_with('.') || (name.starts_with("__") && name.ends_with("__"))
}
