//! Bind identities and search filters
//!
//! Values substituted into DNs are DN-escaped (RFC 4514) and values
//! substituted into filters are filter-escaped (RFC 4515). Ordinary user
//! and group names pass through unchanged.

use bastion_core::{DirectoryConfig, DirectoryError};
use ldap3::{dn_escape, ldap_escape};

/// Identity used for the user bind.
///
/// `{username}@{realm}` when a realm domain is configured, otherwise
/// `{user_attribute}={username},{user_base_dn}`.
pub fn bind_identity(config: &DirectoryConfig, username: &str) -> String {
    match config.realm() {
        Some(realm) => user_principal(username, realm),
        None => format!(
            "{}={},{}",
            config.user_attribute,
            dn_escape(username),
            config.user_base_dn
        ),
    }
}

pub fn user_principal(username: &str, realm: &str) -> String {
    format!("{}@{}", username, realm)
}

/// Filter locating the user entry behind a realm principal
pub fn realm_user_filter(username: &str, realm: &str) -> String {
    format!(
        "(userPrincipalName={})",
        ldap_escape(user_principal(username, realm))
    )
}

/// Group membership filter covering POSIX (`memberUid`) and
/// `member`/`uniqueMember` style schemas
pub fn group_membership_filter(username: &str, user_dn: &str) -> String {
    let username = ldap_escape(username);
    let user_dn = ldap_escape(user_dn);
    format!(
        "(|(memberUid={})(member={})(uniqueMember={}))",
        username, user_dn, user_dn
    )
}

/// Value of the first RDN of a group DN.
///
/// `cn=admins,ou=Group,dc=example,dc=com` yields `admins`.
pub fn group_name_from_dn(dn: &str) -> Result<&str, DirectoryError> {
    let first = dn.split(',').next().unwrap_or_default();

    match first.split_once('=') {
        Some((_, name)) if !name.is_empty() => Ok(name),
        _ => Err(DirectoryError::MalformedEntry(format!(
            "group DN {:?} has no name in its first component",
            dn
        ))),
    }
}
