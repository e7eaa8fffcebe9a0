//! LDAP/Active Directory authentication module
//!
//! Provides login against:
//! - LDAP (OpenLDAP, 389 Directory Server) with DN-form binds
//! - Microsoft Active Directory with `user@realm` binds
//!
//! Group memberships found under the group base DN are mapped to policies
//! through a [`crate::GroupPolicyStore`].

mod client;
mod identity;
mod resolver;

pub use client::{LdapConnector, LdapDirectory};
pub use identity::{
    bind_identity, group_membership_filter, group_name_from_dn, realm_user_filter,
    user_principal,
};
pub use resolver::LoginResolver;
