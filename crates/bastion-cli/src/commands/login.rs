//! login command - authenticate and print granted policies

use super::CommandContext;
use anyhow::Result;
use bastion_core::Credentials;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

/// Returns whether the login succeeded; failures are printed here.
pub async fn execute(ctx: &CommandContext, username: &str, password: &str) -> Result<bool> {
    let backend = ctx.backend()?;
    let credentials = Credentials::new(username, password);

    debug!(username, "Running login");

    match backend.login(&credentials).await {
        Ok(response) => {
            if ctx.is_json() {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                ctx.info(&format!("{} {}", "Authenticated".green().bold(), username));
                for policy in &response.policies {
                    println!("{}", policy);
                }
            }
            Ok(true)
        }
        Err(e) => {
            if ctx.is_json() {
                let body = json!({ "error": e.code(), "message": e.to_string() });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                ctx.error(&format!("{} {}", "Login failed:".red().bold(), e));
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OutputFormat;
    use bastion_core::BastionConfig;

    #[tokio::test]
    async fn test_failed_login_is_reported_not_returned() {
        let ctx = CommandContext {
            config: BastionConfig::default(),
            output_format: OutputFormat::Json,
            quiet: true,
        };

        let authenticated = execute(&ctx, "alice", "secret").await.unwrap();
        assert!(!authenticated);
    }
}
