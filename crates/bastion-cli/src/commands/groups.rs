//! groups command - show group to policy mappings

use super::CommandContext;
use anyhow::{bail, Result};
use colored::Colorize;

pub fn execute(ctx: &CommandContext, name: Option<&str>) -> Result<()> {
    let groups = &ctx.config.groups;

    if let Some(name) = name {
        let Some(entry) = groups.get(name) else {
            bail!("no mapping for group {:?}", name);
        };
        if ctx.is_json() {
            println!("{}", serde_json::to_string_pretty(entry)?);
        } else {
            println!("{}", entry.policies.join(", "));
        }
        return Ok(());
    }

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(groups)?);
        return Ok(());
    }

    if groups.is_empty() {
        ctx.info("No group mappings configured");
        return Ok(());
    }

    for (group, entry) in groups {
        println!("{:<24} {}", group.bold(), entry.policies.join(", "));
    }

    Ok(())
}
