//! check-config command - validate the directory configuration

use super::CommandContext;
use anyhow::{bail, Result};
use bastion_auth::ldap::bind_identity;
use colored::Colorize;
use serde::Serialize;

#[derive(Serialize)]
struct CheckResult<'a> {
    url: &'a str,
    bind_identity: String,
    realm_domain: Option<&'a str>,
    group_base_dn: &'a str,
    mapped_groups: usize,
}

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let Some(directory) = &ctx.config.directory else {
        bail!("no [directory] section configured");
    };

    directory.validate()?;

    let result = CheckResult {
        url: &directory.url,
        bind_identity: bind_identity(directory, "{username}"),
        realm_domain: directory.realm(),
        group_base_dn: &directory.group_base_dn,
        mapped_groups: ctx.config.groups.len(),
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    ctx.info(&format!("{}", "Configuration is valid".green().bold()));
    println!("{:<16} {}", "URL:".bold(), result.url);
    println!("{:<16} {}", "Bind identity:".bold(), result.bind_identity);
    if let Some(realm) = result.realm_domain {
        println!("{:<16} {}", "Realm:".bold(), realm);
    }
    println!("{:<16} {}", "Group base DN:".bold(), result.group_base_dn);
    println!("{:<16} {}", "Mapped groups:".bold(), result.mapped_groups);

    Ok(())
}
