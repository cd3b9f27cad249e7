//! CLI implementation for the `lazyrepo tree` command

use anyhow::Result;

use crate::cli::output::create_spinner;
use crate::core::render::render_tree;

/// Execute the tree command
pub async fn execute(repo: &str, branch: &str) -> Result<()> {
    let mut manager = super::build_manager()?;

    let spinner = create_spinner(&format!("Fetching {repo} ({branch})..."));
    let result = manager.import_repository(repo, branch);
    spinner.finish_and_clear();
    result?;

    // import_repository just cached this entry
    if let Some(path) = manager.local_path(repo, branch) {
        println!("{}", render_tree(&path)?);
    }
    Ok(())
}
