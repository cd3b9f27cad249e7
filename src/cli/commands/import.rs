//! CLI implementation for the `lazyrepo import` command

use anyhow::Result;

use crate::cli::output::{create_spinner, status};
use crate::core::render::render_tree;

/// Execute the import command
pub async fn execute(repo: &str, branch: &str, tree: bool) -> Result<()> {
    let mut manager = super::build_manager()?;

    let spinner = create_spinner(&format!("Importing {repo} ({branch})..."));
    let result = manager.import_repository(repo, branch);
    spinner.finish_and_clear();

    let root = result?;
    println!("{} Imported {repo} ({branch})", status::SUCCESS);

    let names = root.names()?;
    if names.is_empty() {
        println!("  No modules found");
    } else {
        println!("  Top-level modules:");
        for name in names {
            println!("    {name}");
        }
    }

    if tree {
        if let Some(path) = manager.local_path(repo, branch) {
            println!("\n{}", render_tree(&path)?);
        }
    }

    Ok(())
}
