//! Login resolution
//!
//! Connect, bind as the user, re-resolve realm principals to their entry DN,
//! enumerate group memberships and map them to policies. Each step fails the
//! attempt outright; nothing is retried.

use bastion_core::{
    AuthError, Credentials, DirectoryConfig, DirectoryError, PolicySet, Result, SearchScope,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::directory::{DirectoryClient, DirectoryConnector};
use crate::ldap::identity::{
    bind_identity, group_membership_filter, group_name_from_dn, realm_user_filter,
    user_principal,
};
use crate::store::GroupPolicyStore;

/// Attribute holding an Active Directory entry's DN
const DISTINGUISHED_NAME_ATTR: &str = "distinguishedName";

/// RFC 4511 selector requesting no attributes
const NO_ATTRIBUTES: &str = "1.1";

/// Result codes a server may use to refuse a simple bind
const CREDENTIAL_REJECTION_CODES: [u32; 3] = [48, 49, 53];

/// Collapse credential rejections to one message.
///
/// Servers such as Active Directory put sub-codes in the diagnostic text that
/// tell an unknown user apart from a wrong password; that text is only logged.
fn credentials_rejected(e: DirectoryError) -> DirectoryError {
    match e {
        DirectoryError::Operation { code, message }
            if CREDENTIAL_REJECTION_CODES.contains(&code) =>
        {
            debug!(code, diagnostic = %message, "Directory rejected bind");
            DirectoryError::invalid_credentials("invalid credentials")
        }
        other => other,
    }
}

#[derive(Clone)]
pub struct LoginResolver {
    connector: Arc<dyn DirectoryConnector>,
    groups: Arc<dyn GroupPolicyStore>,
}

impl LoginResolver {
    pub fn new(connector: Arc<dyn DirectoryConnector>, groups: Arc<dyn GroupPolicyStore>) -> Self {
        Self { connector, groups }
    }

    /// Resolve the policies granted to `credentials`
    pub async fn authenticate(
        &self,
        config: Option<&DirectoryConfig>,
        credentials: &Credentials,
    ) -> Result<PolicySet> {
        let config = config.ok_or(AuthError::ConfigMissing)?;

        let mut client = self
            .connector
            .connect(config)
            .await
            .map_err(AuthError::ConnectionError)?;

        let outcome = self.resolve(config, credentials, client.as_mut()).await;

        if let Err(e) = client.unbind().await {
            debug!(error = %e, "Failed to release LDAP connection");
        }

        outcome
    }

    async fn resolve(
        &self,
        config: &DirectoryConfig,
        credentials: &Credentials,
        client: &mut dyn DirectoryClient,
    ) -> Result<PolicySet> {
        let username = credentials.username.as_str();

        // An empty password turns a simple bind into an anonymous one
        if credentials.password.is_empty() {
            return Err(AuthError::BindFailure(DirectoryError::invalid_credentials(
                "password must not be empty",
            )));
        }

        let mut user_dn = bind_identity(config, username);
        debug!(username, bind_dn = %user_dn, "Binding as user");

        client
            .bind(&user_dn, &credentials.password)
            .await
            .map_err(|e| AuthError::BindFailure(credentials_rejected(e)))?;

        if let Some(realm) = config.realm() {
            user_dn = self
                .resolve_realm_dn(config, client, username, realm)
                .await?;
            debug!(username, user_dn = %user_dn, "Resolved realm principal");
        }

        let groups = self
            .search_groups(config, client, username, &user_dn)
            .await?;

        let policies = self.map_groups_to_policies(&groups).await;
        if policies.is_empty() {
            info!(username, groups = groups.len(), "User is not in any authorized group");
            return Err(AuthError::NoAuthorizedGroups);
        }

        info!(
            username,
            groups = groups.len(),
            policies = policies.len(),
            "LDAP login resolved"
        );
        Ok(policies)
    }

    async fn resolve_realm_dn(
        &self,
        config: &DirectoryConfig,
        client: &mut dyn DirectoryClient,
        username: &str,
        realm: &str,
    ) -> Result<String> {
        let filter = realm_user_filter(username, realm);

        let mut entries = client
            .search(
                &config.user_base_dn,
                SearchScope::Subtree,
                &filter,
                &[DISTINGUISHED_NAME_ATTR],
            )
            .await
            .map_err(AuthError::UserSearchFailure)?;

        let principal = user_principal(username, realm);
        let entry = match entries.len() {
            0 => return Err(AuthError::UserNotFound(principal)),
            1 => entries.remove(0),
            count => return Err(AuthError::AmbiguousUser { principal, count }),
        };

        match entry.first_value(DISTINGUISHED_NAME_ATTR) {
            Some(dn) if !dn.is_empty() => Ok(dn.to_string()),
            _ => Ok(entry.dn),
        }
    }

    async fn search_groups(
        &self,
        config: &DirectoryConfig,
        client: &mut dyn DirectoryClient,
        username: &str,
        user_dn: &str,
    ) -> Result<Vec<String>> {
        let filter = group_membership_filter(username, user_dn);
        debug!(filter = %filter, "Searching groups");

        let entries = client
            .search(
                &config.group_base_dn,
                SearchScope::Subtree,
                &filter,
                &[NO_ATTRIBUTES],
            )
            .await
            .map_err(AuthError::GroupSearchFailure)?;

        let groups = entries
            .iter()
            .map(|entry| group_name_from_dn(&entry.dn).map(str::to_string))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(AuthError::GroupSearchFailure)?;

        debug!(groups = ?groups, "Found groups for user");
        Ok(groups)
    }

    async fn map_groups_to_policies(&self, groups: &[String]) -> PolicySet {
        let mut policies = PolicySet::new();

        for group in groups {
            match self.groups.lookup(group).await {
                Ok(Some(entry)) => policies.extend(&entry.policies),
                Ok(None) => {}
                Err(e) => warn!(group = %group, error = %e, "Skipping group, policy lookup failed"),
            }
        }

        policies
    }
}
