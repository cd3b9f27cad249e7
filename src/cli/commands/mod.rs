//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod auth;
pub mod call;
pub mod get;
pub mod import;
pub mod tree;
pub mod update;

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;

use crate::config::defaults::DEFAULT_BRANCH;
use crate::core::manager::RepoManager;
use crate::core::scanner::{ScanOptions, Scanner};
use crate::eval::ScriptEngine;
use crate::infra::dirs::LazyrepoDirs;
use crate::infra::git::GitFetcher;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a repository and list its top-level modules
    Import {
        /// Repository URL or owner/name shorthand
        repo: String,

        /// Branch to import
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Also print the repository structure
        #[arg(long)]
        tree: bool,
    },

    /// Refresh a repository to the branch tip
    Update {
        /// Repository URL or owner/name shorthand
        repo: String,

        /// Branch to update
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,
    },

    /// Print the directory structure of a repository
    Tree {
        /// Repository URL or owner/name shorthand
        repo: String,

        /// Branch to show
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,
    },

    /// Resolve a dotted path and print the value found there
    Get {
        /// Repository URL or owner/name shorthand
        repo: String,

        /// Dotted path, e.g. `lib.math_ext.square`
        path: String,

        /// Branch to read from
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call a top-level function in a module
    Call {
        /// Repository URL or owner/name shorthand
        repo: String,

        /// Dotted path to the function, e.g. `utils.add`
        path: String,

        /// Arguments (integers, booleans, or strings)
        args: Vec<String>,

        /// Branch to read from
        #[arg(short, long, default_value = DEFAULT_BRANCH)]
        branch: String,
    },

    /// Manage the access token for private repositories
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

/// Auth subcommands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store an access token
    Set {
        /// The token to store
        token: String,
    },

    /// Show whether a token is configured
    Status,

    /// Remove the stored token
    Clear,
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        match self {
            Self::Import { repo, branch, tree } => import::execute(&repo, &branch, tree).await,
            Self::Update { repo, branch } => update::execute(&repo, &branch).await,
            Self::Tree { repo, branch } => tree::execute(&repo, &branch).await,
            Self::Get {
                repo,
                path,
                branch,
                json,
            } => get::execute(&repo, &path, &branch, json).await,
            Self::Call {
                repo,
                path,
                args,
                branch,
            } => call::execute(&repo, &path, &args, &branch).await,
            Self::Auth { command } => auth::execute(command).await,
        }
    }
}

/// Build a repository manager wired to the platform directories
pub(crate) fn build_manager() -> Result<RepoManager> {
    let dirs = LazyrepoDirs::new();
    let token = crate::infra::auth::load_token(&dirs.token_file())?;
    let fetcher = GitFetcher::new(dirs.repos_dir(), token);
    let scanner = Scanner::new(Arc::new(ScriptEngine::new()), ScanOptions::default());
    Ok(RepoManager::new(Box::new(fetcher), scanner))
}
