//! Default configuration values

/// File extension recognized as an evaluatable source module
pub const SOURCE_EXTENSION: &str = "lzy";

/// Branch imported when none is given
pub const DEFAULT_BRANCH: &str = "main";

/// Environment variable overriding the stored authentication token
pub const ENV_TOKEN: &str = "LAZYREPO_TOKEN";

/// Subdirectory of the cache directory holding cloned repositories
pub const REPOS_SUBDIR: &str = "repos";

/// Name of the token file inside the config directory
pub const TOKEN_FILE: &str = "auth.toml";
