//! Platform-specific directory management
//!
//! Provides platform-specific paths for the clone cache and configuration.
//! Follows XDG Base Directory Specification on Linux and standard locations
//! on macOS.
//!
//! Environment variables can override default directories:
//! - `LAZYREPO_CACHE_DIR` - Override cache directory
//! - `LAZYREPO_CONFIG_DIR` - Override config directory

use std::env;
use std::path::PathBuf;

use crate::config::defaults::{REPOS_SUBDIR, TOKEN_FILE};

/// Environment variable names for directory overrides
pub const ENV_CACHE_DIR: &str = "LAZYREPO_CACHE_DIR";
pub const ENV_CONFIG_DIR: &str = "LAZYREPO_CONFIG_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "lazyrepo";

/// Platform-specific directory provider for lazyrepo
///
/// Provides paths to cache and config directories following platform
/// conventions (XDG on Linux, Library on macOS).
#[derive(Debug, Clone)]
pub struct LazyrepoDirs {
    cache_dir: PathBuf,
    config_dir: PathBuf,
}

impl LazyrepoDirs {
    /// Create a new `LazyrepoDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache_dir: Self::resolve_cache_dir(),
            config_dir: Self::resolve_config_dir(),
        }
    }

    /// Get the cache directory path
    ///
    /// Used for cloned repositories, which can always be re-fetched.
    /// - Linux: `$XDG_CACHE_HOME/lazyrepo` or `~/.cache/lazyrepo`
    /// - macOS: `~/Library/Caches/lazyrepo`
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone()
    }

    /// Get the config directory path
    ///
    /// Used for user configuration files.
    /// - Linux: `$XDG_CONFIG_HOME/lazyrepo` or `~/.config/lazyrepo`
    /// - macOS: `~/Library/Application Support/lazyrepo`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the directory repository clones are placed in
    ///
    /// Located under the cache directory, one subdirectory per repository.
    #[must_use]
    pub fn repos_dir(&self) -> PathBuf {
        self.cache_dir.join(REPOS_SUBDIR)
    }

    /// Get the stored-credential file path
    #[must_use]
    pub fn token_file(&self) -> PathBuf {
        self.config_dir.join(TOKEN_FILE)
    }

    /// Resolve cache directory from environment or platform default
    fn resolve_cache_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CACHE_DIR) {
            return PathBuf::from(path);
        }

        Self::platform_cache_dir()
    }

    /// Resolve config directory from environment or platform default
    fn resolve_config_dir() -> PathBuf {
        if let Ok(path) = env::var(ENV_CONFIG_DIR) {
            return PathBuf::from(path);
        }

        Self::platform_config_dir()
    }

    /// Get platform-specific cache directory
    fn platform_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".cache").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".cache").join(APP_NAME))
            })
    }

    /// Get platform-specific config directory
    fn platform_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .unwrap_or_else(|| {
                // Fallback to home directory
                dirs::home_dir()
                    .map(|h| h.join(".config").join(APP_NAME))
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            })
    }
}

impl Default for LazyrepoDirs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_new_creates_instance() {
        let dirs = LazyrepoDirs::new();
        assert!(!dirs.cache_dir().as_os_str().is_empty());
        assert!(!dirs.config_dir().as_os_str().is_empty());
    }

    #[test]
    fn test_repos_dir_is_under_cache_dir() {
        let dirs = LazyrepoDirs::new();
        assert!(dirs.repos_dir().starts_with(dirs.cache_dir()));
    }

    #[test]
    fn test_token_file_is_under_config_dir() {
        let dirs = LazyrepoDirs::new();
        assert!(dirs.token_file().starts_with(dirs.config_dir()));
        assert!(dirs.token_file().ends_with("auth.toml"));
    }
}
