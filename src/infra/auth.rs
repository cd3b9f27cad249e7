//! Credential storage
//!
//! Stores the access token for private repositories in a TOML file under the
//! config directory. The `LAZYREPO_TOKEN` environment variable takes
//! precedence over the stored token, which keeps CI setups file-free.
//!
//! The token itself never appears in logs or error messages.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::defaults::ENV_TOKEN;
use crate::error::AuthError;

/// On-disk layout of the token file
#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    token: String,
}

/// Store a token, replacing any previous one
pub fn store_token(path: &Path, token: &str) -> Result<(), AuthError> {
    let contents = toml::to_string_pretty(&TokenFile {
        token: token.to_string(),
    })
    .map_err(|e| AuthError::ParseError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AuthError::IoError {
            path: parent.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    std::fs::write(path, contents).map_err(|e| AuthError::IoError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    restrict_permissions(path);
    debug!(path = %path.display(), "token stored");
    Ok(())
}

/// Load the token, preferring the environment over the stored file
///
/// Returns `Ok(None)` when no token is configured anywhere; callers fall
/// back to anonymous access.
pub fn load_token(path: &Path) -> Result<Option<String>, AuthError> {
    if let Ok(token) = std::env::var(ENV_TOKEN) {
        if !token.is_empty() {
            return Ok(Some(token));
        }
    }

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path).map_err(|e| AuthError::IoError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    let file: TokenFile = toml::from_str(&contents).map_err(|e| AuthError::ParseError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    Ok(Some(file.token))
}

/// Load the token, failing if none is configured
pub fn require_token(path: &Path) -> Result<String, AuthError> {
    load_token(path)?.ok_or(AuthError::TokenNotFound)
}

/// Remove the stored token, if any
pub fn clear_token(path: &Path) -> Result<(), AuthError> {
    if path.exists() {
        std::fs::remove_file(path).map_err(|e| AuthError::IoError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        debug!(path = %path.display(), "token cleared");
    }
    Ok(())
}

/// Keep the token file readable by the owner only
#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_store_and_load_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.toml");

        store_token(&path, "ghp_example123").unwrap();
        assert_eq!(load_token(&path).unwrap().as_deref(), Some("ghp_example123"));
    }

    #[test]
    fn test_load_token_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.toml");
        assert_eq!(load_token(&path).unwrap(), None);
    }

    #[test]
    fn test_require_token_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.toml");
        let err = require_token(&path).unwrap_err();
        assert!(matches!(err, AuthError::TokenNotFound));
    }

    #[test]
    fn test_clear_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.toml");

        store_token(&path, "tok").unwrap();
        clear_token(&path).unwrap();
        assert_eq!(load_token(&path).unwrap(), None);

        // Clearing again is fine
        clear_token(&path).unwrap();
    }

    #[test]
    fn test_store_token_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config/auth.toml");
        store_token(&path, "tok").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_token_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();

        let err = load_token(&path).unwrap_err();
        assert!(matches!(err, AuthError::ParseError { .. }));
    }
}
