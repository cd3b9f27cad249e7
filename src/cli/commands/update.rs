//! CLI implementation for the `lazyrepo update` command

use anyhow::Result;

use crate::cli::output::{create_spinner, status};

/// Execute the update command
pub async fn execute(repo: &str, branch: &str) -> Result<()> {
    let mut manager = super::build_manager()?;

    let spinner = create_spinner(&format!("Updating {repo} ({branch})..."));
    let result = manager.update_repository(repo, branch);
    spinner.finish_and_clear();

    let root = result?;
    println!("{} Updated {repo} ({branch})", status::SUCCESS);

    let names = root.names()?;
    if !names.is_empty() {
        println!("  Top-level modules:");
        for name in names {
            println!("    {name}");
        }
    }

    Ok(())
}
