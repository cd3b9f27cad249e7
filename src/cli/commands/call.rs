//! CLI implementation for the `lazyrepo call` command
//!
//! Splits the dotted path into module path and function name, imports the
//! repository, and invokes the function with literal arguments.

use anyhow::{bail, Result};

use crate::cli::output::create_spinner;
use crate::eval::Value;

/// Execute the call command
pub async fn execute(repo: &str, path: &str, args: &[String], branch: &str) -> Result<()> {
    let Some((module_path, function)) = path.rsplit_once('.') else {
        bail!("Expected a dotted path like 'utils.add', got '{path}'");
    };

    let mut manager = super::build_manager()?;

    let spinner = create_spinner(&format!("Fetching {repo} ({branch})..."));
    let result = manager.import_repository(repo, branch);
    spinner.finish_and_clear();
    let root = result?;

    let attr = root.get_path(module_path)?;
    let Some(module) = attr.as_module() else {
        bail!("'{module_path}' is not a module");
    };

    let values: Vec<Value> = args.iter().map(|a| parse_arg(a)).collect();
    let result = module.call(function, &values)?;
    println!("{result}");
    Ok(())
}

/// Parse a command-line argument into a value
///
/// Integers and booleans are recognized; everything else is a string.
fn parse_arg(arg: &str) -> Value {
    if let Ok(n) = arg.parse::<i64>() {
        return Value::Int(n);
    }
    match arg {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(arg.to_string()),
    }
}
