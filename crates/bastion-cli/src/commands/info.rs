//! info command - show backend help and path rules

use super::CommandContext;
use anyhow::Result;
use colored::Colorize;
use serde_json::json;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let backend = ctx.backend()?;
    let paths = backend.paths();

    if ctx.is_json() {
        let body = json!({
            "version": bastion_core::VERSION,
            "help": backend.help().trim(),
            "root_paths": paths.root,
            "unauthenticated_paths": paths.unauthenticated,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{} {}", "Bastion".bold(), bastion_core::VERSION);
    println!("{}", backend.help().trim());
    println!();
    println!("{} {}", "Root paths:".bold(), paths.root.join(", "));
    println!(
        "{} {}",
        "Unauthenticated paths:".bold(),
        paths.unauthenticated.join(", ")
    );

    Ok(())
}
