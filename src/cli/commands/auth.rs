//! CLI implementation for the `lazyrepo auth` command
//!
//! The token itself is never echoed back.

use anyhow::Result;

use crate::cli::output::status;
use crate::infra::auth;
use crate::infra::dirs::LazyrepoDirs;

use super::AuthCommands;

/// Execute an auth subcommand
pub async fn execute(command: AuthCommands) -> Result<()> {
    let dirs = LazyrepoDirs::new();
    let token_file = dirs.token_file();

    match command {
        AuthCommands::Set { token } => {
            auth::store_token(&token_file, &token)?;
            println!("{} Token stored", status::SUCCESS);
        }
        AuthCommands::Status => match auth::load_token(&token_file)? {
            Some(_) => println!("{} A token is configured", status::SUCCESS),
            None => println!("{} No token configured", status::INFO),
        },
        AuthCommands::Clear => {
            auth::clear_token(&token_file)?;
            println!("{} Token cleared", status::SUCCESS);
        }
    }
    Ok(())
}
