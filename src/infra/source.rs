//! Repository identifiers
//!
//! Callers name repositories either by full URL or by `owner/name`
//! shorthand, which expands to a GitHub HTTPS URL. The short repository
//! name (last path segment, minus `.git`) doubles as the root module name
//! and the local clone directory name.

use crate::config::urls::GITHUB_BASE;

/// A parsed repository identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSource {
    identifier: String,
    url: String,
    name: String,
}

impl RepoSource {
    /// Parse a caller-supplied identifier
    pub fn parse(identifier: &str) -> Self {
        let url = if identifier.starts_with("http://") || identifier.starts_with("https://") {
            identifier.to_string()
        } else {
            format!("{GITHUB_BASE}/{identifier}.git")
        };

        let last = identifier
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(identifier);
        let name = last.strip_suffix(".git").unwrap_or(last).to_string();

        Self {
            identifier: identifier.to_string(),
            url,
            name,
        }
    }

    /// The identifier exactly as the caller gave it
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Clone URL without credentials; safe for logs and error messages
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Short repository name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Clone URL with the token spliced in after the scheme
    ///
    /// Never log or embed the result in errors; use [`Self::url`] there.
    pub fn authenticated_url(&self, token: Option<&str>) -> String {
        match token {
            Some(token) if !token.is_empty() => {
                if let Some(rest) = self.url.strip_prefix("https://") {
                    format!("https://{token}@{rest}")
                } else if let Some(rest) = self.url.strip_prefix("http://") {
                    format!("http://{token}@{rest}")
                } else {
                    self.url.clone()
                }
            }
            _ => self.url.clone(),
        }
    }
}
