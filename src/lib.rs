//! Lazyrepo - Lazily evaluated namespaces over remote repositories
//!
//! Import a repository and browse its directory tree as a namespace of
//! modules. Nothing executes at import time: a file's source runs the first
//! time one of its attributes is accessed, and at most once per file.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Namespace machinery (no network I/O)
//! - [`eval`] - Source evaluation engine
//! - [`infra`] - Infrastructure layer (network, filesystem, credentials)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod eval;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
