//! LDAP credential backend
//!
//! Wraps the [`LoginResolver`] with the configuration slot, path metadata and
//! help text the host framework expects from a credential backend.

use bastion_core::{AuthError, Credentials, DirectoryConfig, LoginResponse, PolicySet, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::directory::DirectoryConnector;
use crate::ldap::LoginResolver;
use crate::store::GroupPolicyStore;

const BACKEND_HELP: &str = r#"
The "ldap" credential backend authenticates a username and password
against an LDAP or Active Directory server and grants the policies
mapped to the groups the user belongs to.

The server connection is set up through the "config" endpoint and group
mappings through the "groups" endpoints; both require root access.
Users then log in by sending "username" and "password" to "login".
"#;

/// Paths with special authorization rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathsSpecial {
    /// Paths requiring root access
    pub root: &'static [&'static str],
    /// Paths reachable without authentication
    pub unauthenticated: &'static [&'static str],
}

pub const PATHS_SPECIAL: PathsSpecial = PathsSpecial {
    root: &["config", "groups/*"],
    unauthenticated: &["login/*"],
};

impl PathsSpecial {
    pub fn requires_root(&self, path: &str) -> bool {
        self.root.iter().any(|pattern| path_matches(pattern, path))
    }

    pub fn is_unauthenticated(&self, path: &str) -> bool {
        self.unauthenticated
            .iter()
            .any(|pattern| path_matches(pattern, path))
    }
}

/// A trailing `*` matches any suffix; otherwise the path must match exactly
fn path_matches(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => path.starts_with(prefix),
        None => pattern == path,
    }
}

pub struct AuthBackend {
    resolver: LoginResolver,
    config: RwLock<Option<DirectoryConfig>>,
}

impl AuthBackend {
    pub fn new(connector: Arc<dyn DirectoryConnector>, groups: Arc<dyn GroupPolicyStore>) -> Self {
        Self {
            resolver: LoginResolver::new(connector, groups),
            config: RwLock::new(None),
        }
    }

    pub fn with_config(
        connector: Arc<dyn DirectoryConnector>,
        groups: Arc<dyn GroupPolicyStore>,
        config: DirectoryConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            resolver: LoginResolver::new(connector, groups),
            config: RwLock::new(Some(config)),
        })
    }

    pub fn paths(&self) -> PathsSpecial {
        PATHS_SPECIAL
    }

    pub fn help(&self) -> &'static str {
        BACKEND_HELP
    }

    /// Replace the directory configuration after validating it
    pub async fn set_config(&self, config: DirectoryConfig) -> Result<()> {
        config.validate()?;

        info!(url = %config.url, realm = config.realm().unwrap_or(""), "LDAP configuration updated");
        *self.config.write().await = Some(config);
        Ok(())
    }

    pub async fn config(&self) -> Option<DirectoryConfig> {
        self.config.read().await.clone()
    }

    /// Authenticate and resolve policies for a login request
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        debug!(username = %credentials.username, "Login requested");

        let config = self.config().await;
        let policies = self
            .resolver
            .authenticate(config.as_ref(), credentials)
            .await?;

        Ok(LoginResponse::new(&credentials.username, policies))
    }

    /// Re-run the login and refuse renewal if the granted policies changed
    pub async fn renew(
        &self,
        credentials: &Credentials,
        issued_policies: &[String],
    ) -> Result<LoginResponse> {
        let response = self.login(credentials).await?;

        let current = response.policies.iter().collect::<PolicySet>();
        if !current.same_policies(issued_policies) {
            info!(username = %credentials.username, "Policies changed since login, refusing renewal");
            return Err(AuthError::PoliciesChanged);
        }

        Ok(response)
    }
}
