//! Authentication for Bastion
//!
//! LDAP login resolution and the credential backend wrapping it.

pub mod backend;
pub mod directory;
pub mod ldap;
pub mod store;

pub use backend::{AuthBackend, PathsSpecial, PATHS_SPECIAL};
pub use directory::{DirectoryClient, DirectoryConnector};
pub use ldap::{LdapConnector, LdapDirectory, LoginResolver};
pub use store::{GroupPolicyStore, MemoryGroupStore};
