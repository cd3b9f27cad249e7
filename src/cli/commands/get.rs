//! CLI implementation for the `lazyrepo get` command

use anyhow::Result;

use crate::cli::output::create_spinner;
use crate::core::node::Attr;

/// Execute the get command
pub async fn execute(repo: &str, path: &str, branch: &str, json: bool) -> Result<()> {
    let mut manager = super::build_manager()?;

    let spinner = create_spinner(&format!("Fetching {repo} ({branch})..."));
    let result = manager.import_repository(repo, branch);
    spinner.finish_and_clear();
    let root = result?;

    match root.get_path(path)? {
        Attr::Value(value) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&value.to_json())?);
            } else {
                println!("{value}");
            }
        }
        Attr::Module(node) => {
            let names = node.names()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "module": node.name(),
                        "names": names,
                    }))?
                );
            } else {
                println!("{node}");
                for name in names {
                    println!("    {name}");
                }
            }
        }
    }

    Ok(())
}
