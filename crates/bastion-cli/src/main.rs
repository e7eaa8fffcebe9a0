//! Bastion - LDAP credential backend
//!
//! Command-line front end for logging in against a directory and inspecting
//! the backend configuration.

mod commands;

use anyhow::Result;
use bastion_core::BastionConfig;
use clap::{Parser, Subcommand, ValueEnum};
use commands::CommandContext;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bastion")]
#[command(author = "Bastion Team")]
#[command(version = bastion_core::VERSION)]
#[command(about = "LDAP credential backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BASTION_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "BASTION_LOG_LEVEL")]
    log_level: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the granted policies
    Login {
        /// Directory username
        #[arg(short, long)]
        username: String,

        /// Password (falls back to BASTION_PASSWORD)
        #[arg(short, long, env = "BASTION_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Validate the directory configuration
    CheckConfig,

    /// Show group to policy mappings
    Groups {
        /// Only show this group
        name: Option<String>,
    },

    /// Show backend help and path rules
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = BastionConfig::from_file(path)?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
        None => BastionConfig::from_env(),
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_logging(&config);

    let ctx = CommandContext {
        config,
        output_format: cli.output,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Login { username, password } => {
            let Some(password) = password else {
                anyhow::bail!("Password required. Pass --password or set BASTION_PASSWORD");
            };
            // Failures are already reported to the user
            if !commands::login::execute(&ctx, &username, &password).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::CheckConfig => commands::check::execute(&ctx)?,
        Commands::Groups { name } => commands::groups::execute(&ctx, name.as_deref())?,
        Commands::Info => commands::info::execute(&ctx)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(config: &BastionConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_login() {
        let cli = Cli::try_parse_from([
            "bastion", "--output", "json", "login", "-u", "alice", "-p", "secret",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Commands::Login { username, password } => {
                assert_eq!(username, "alice");
                assert_eq!(password.as_deref(), Some("secret"));
            }
            _ => panic!("expected login command"),
        }
    }

    #[test]
    fn test_login_password_is_optional() {
        let cli = Cli::try_parse_from(["bastion", "login", "--username", "alice"]).unwrap();

        match cli.command {
            Commands::Login { username, password } => {
                assert_eq!(username, "alice");
                // Only set when BASTION_PASSWORD is exported in the test environment
                if std::env::var("BASTION_PASSWORD").is_err() {
                    assert!(password.is_none());
                }
            }
            _ => panic!("expected login command"),
        }
    }
}
