//! Directory capability interfaces
//!
//! The login resolver only talks to the directory through these traits, so
//! the wire library stays behind [`crate::ldap::LdapConnector`].

use async_trait::async_trait;
use bastion_core::{DirectoryConfig, DirectoryEntry, DirectoryError, SearchScope};

/// One open connection to a directory server
#[async_trait]
pub trait DirectoryClient: Send {
    /// Authenticate the connection as `identity`
    async fn bind(&mut self, identity: &str, password: &str) -> Result<(), DirectoryError>;

    /// Run a search and collect every returned entry
    async fn search(
        &mut self,
        base_dn: &str,
        scope: SearchScope,
        filter: &str,
        attributes: &[&str],
    ) -> Result<Vec<DirectoryEntry>, DirectoryError>;

    /// Release the connection
    async fn unbind(&mut self) -> Result<(), DirectoryError>;
}

/// Opens directory connections from configuration
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    async fn connect(
        &self,
        config: &DirectoryConfig,
    ) -> Result<Box<dyn DirectoryClient>, DirectoryError>;
}
