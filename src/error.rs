//! Error types for lazyrepo
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::eval::EvalError;

/// Remote fetch errors
///
/// Raised by the fetcher collaborators; propagated to callers unwrapped.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to clone repository
    #[error("Failed to clone '{url}': {error}")]
    CloneFailed { url: String, error: String },

    /// Failed to update an existing local copy
    #[error("Failed to update '{path}' (branch '{branch}'): {error}")]
    UpdateFailed {
        path: PathBuf,
        branch: String,
        error: String,
    },

    /// Local copy is not a valid repository
    #[error("Invalid repository at '{path}': {error}")]
    InvalidRepository { path: PathBuf, error: String },

    /// Branch not found in repository
    #[error("Branch '{branch}' not found in repository '{repo}'")]
    BranchNotFound { repo: String, branch: String },

    /// IO error during fetch
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Structure scanning errors
///
/// Any scan error aborts the whole import; no partial tree is cached.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Root path does not exist
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to enumerate a directory
    #[error("Failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },
}

/// Lazy node resolution errors
///
/// These are local to one node; siblings remain independently resolvable.
#[derive(Error, Debug)]
pub enum NodeError {
    /// Unknown child or namespace name
    #[error("Module '{module}' has no attribute '{name}'")]
    AttributeNotFound { module: String, name: String },

    /// File content failed to execute
    #[error("Failed to execute module '{module}': {source}")]
    Execution {
        module: String,
        #[source]
        source: EvalError,
    },

    /// Failed to read file content
    #[error("Failed to read '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Resolution was requested on a directory node
    #[error("Module '{module}' is a package; it has no source to execute")]
    NotAFile { module: String },

    /// Name does not refer to a callable value
    #[error("'{name}' in module '{module}' is not a function")]
    NotCallable { module: String, name: String },

    /// A host-initiated call into a resolved module failed
    #[error("Call to '{name}' in module '{module}' failed: {source}")]
    Call {
        module: String,
        name: String,
        #[source]
        source: EvalError,
    },
}

/// Credential storage errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No token has been stored
    #[error("No authentication token configured. Run 'lazyrepo auth <token>' first.")]
    TokenNotFound,

    /// Failed to read or write the token file
    #[error("Failed to access token file '{path}': {error}")]
    IoError { path: PathBuf, error: String },

    /// Token file is malformed
    #[error("Failed to parse token file '{path}': {error}")]
    ParseError { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Top-level lazyrepo error type
#[derive(Error, Debug)]
pub enum LazyrepoError {
    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Scan error
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Node resolution error
    #[error(transparent)]
    Node(#[from] NodeError),

    /// Credential error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Filesystem error
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// IO error
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
