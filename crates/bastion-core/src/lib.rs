//! Bastion Core Library
//!
//! Core types, configuration and errors for the Bastion LDAP credential backend.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BastionConfig, DirectoryConfig, LoggingConfig};
pub use error::{AuthError, DirectoryError, ErrorKind, Result, StoreError};
pub use types::{
    Credentials, DirectoryEntry, GroupEntry, LoginResponse, PolicySet, SearchScope,
};

/// Bastion version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default directory server URL
pub const DEFAULT_LDAP_URL: &str = "ldap://127.0.0.1";

/// Default connection timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
