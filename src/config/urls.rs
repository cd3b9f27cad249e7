//! Remote hosting URLs

/// Base URL used to expand `owner/name` shorthand identifiers
pub const GITHUB_BASE: &str = "https://github.com";
