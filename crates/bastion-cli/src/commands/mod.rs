//! CLI command implementations

pub mod check;
pub mod groups;
pub mod info;
pub mod login;

use anyhow::Result;
use bastion_auth::{AuthBackend, LdapConnector, MemoryGroupStore};
use bastion_core::BastionConfig;
use std::sync::Arc;

use crate::OutputFormat;

/// Context passed to all commands
pub struct CommandContext {
    pub config: BastionConfig,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    /// Check if output should be JSON
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg);
    }

    /// Backend wired to the real directory and the configured group mappings
    pub fn backend(&self) -> Result<AuthBackend> {
        let groups = Arc::new(MemoryGroupStore::from_entries(self.config.groups.clone()));
        let connector = Arc::new(LdapConnector::new());

        let backend = match &self.config.directory {
            Some(directory) => AuthBackend::with_config(connector, groups, directory.clone())?,
            None => AuthBackend::new(connector, groups),
        };
        Ok(backend)
    }
}
