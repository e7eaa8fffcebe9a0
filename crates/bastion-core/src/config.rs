//! Configuration for Bastion

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::AuthError;
use crate::types::GroupEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BastionConfig {
    /// Directory connection and identity settings
    #[serde(default)]
    pub directory: Option<DirectoryConfig>,

    /// Group name to policy mappings
    #[serde(default)]
    pub groups: BTreeMap<String, GroupEntry>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BastionConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AuthError::InvalidConfig(format!("Failed to read config: {}", e)))?;

        debug!(path, "Loaded configuration file");
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| AuthError::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `BASTION_*` overrides; `lookup` resolves a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("BASTION_LOG_LEVEL") {
            self.logging.level = level;
        }

        let directory_keys = [
            "BASTION_LDAP_URL",
            "BASTION_USER_DN",
            "BASTION_USER_ATTR",
            "BASTION_GROUP_DN",
            "BASTION_REALM_DOMAIN",
            "BASTION_STARTTLS",
            "BASTION_INSECURE_TLS",
        ];
        if self.directory.is_none() && directory_keys.iter().all(|key| lookup(*key).is_none()) {
            return;
        }

        let directory = self.directory.get_or_insert_with(DirectoryConfig::default);
        if let Some(url) = lookup("BASTION_LDAP_URL") {
            directory.url = url;
        }
        if let Some(dn) = lookup("BASTION_USER_DN") {
            directory.user_base_dn = dn;
        }
        if let Some(attr) = lookup("BASTION_USER_ATTR") {
            directory.user_attribute = attr;
        }
        if let Some(dn) = lookup("BASTION_GROUP_DN") {
            directory.group_base_dn = dn;
        }
        if let Some(realm) = lookup("BASTION_REALM_DOMAIN") {
            directory.realm_domain = Some(realm);
        }
        if let Some(flag) = lookup("BASTION_STARTTLS") {
            directory.start_tls = flag == "true";
        }
        if let Some(flag) = lookup("BASTION_INSECURE_TLS") {
            directory.insecure_tls = flag == "true";
        }
    }
}

/// How to reach the directory and how to form identities against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Server URL (ldap:// or ldaps://)
    #[serde(default = "default_url")]
    pub url: String,

    /// Attribute naming the user in its DN
    /// Example: "uid" or "sAMAccountName"
    #[serde(default = "default_user_attribute", alias = "userattr")]
    pub user_attribute: String,

    /// Base DN for users
    /// Example: "ou=People,dc=example,dc=com"
    #[serde(default, alias = "userdn")]
    pub user_base_dn: String,

    /// Base DN for group searches
    /// Example: "ou=Group,dc=example,dc=com"
    #[serde(default, alias = "groupdn")]
    pub group_base_dn: String,

    /// Domain suffix for `user@domain` binds; takes precedence over the DN form
    #[serde(default)]
    pub realm_domain: Option<String>,

    /// Upgrade plain connections with STARTTLS
    #[serde(default, alias = "starttls")]
    pub start_tls: bool,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure_tls: bool,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_url() -> String {
    crate::DEFAULT_LDAP_URL.to_string()
}

fn default_user_attribute() -> String {
    "uid".to_string()
}

fn default_timeout() -> u64 {
    crate::DEFAULT_TIMEOUT_SECS
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            user_attribute: default_user_attribute(),
            user_base_dn: String::new(),
            group_base_dn: String::new(),
            realm_domain: None,
            start_tls: false,
            insecure_tls: false,
            timeout_seconds: default_timeout(),
        }
    }
}

impl DirectoryConfig {
    /// Realm domain, if one is set and not blank
    pub fn realm(&self) -> Option<&str> {
        self.realm_domain
            .as_deref()
            .map(str::trim)
            .filter(|realm| !realm.is_empty())
    }

    /// Parsed server URL
    pub fn server_url(&self) -> std::result::Result<url::Url, crate::DirectoryError> {
        let parsed = url::Url::parse(&self.url)
            .map_err(|e| crate::DirectoryError::InvalidUrl(format!("{}: {}", self.url, e)))?;

        match parsed.scheme() {
            "ldap" | "ldaps" => Ok(parsed),
            other => Err(crate::DirectoryError::InvalidUrl(format!(
                "unsupported scheme {:?}, expected ldap or ldaps",
                other
            ))),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.url.is_empty() {
            return Err(AuthError::InvalidConfig("url is required".to_string()));
        }

        self.server_url()
            .map_err(|e| AuthError::InvalidConfig(e.to_string()))?;

        if self.realm().is_none() && self.user_attribute.trim().is_empty() {
            return Err(AuthError::InvalidConfig(
                "user_attribute is required when realm_domain is not set".to_string(),
            ));
        }

        // Also the base of the realm principal search
        if self.user_base_dn.trim().is_empty() {
            return Err(AuthError::InvalidConfig("user_base_dn is required".to_string()));
        }

        if self.timeout_seconds == 0 {
            return Err(AuthError::InvalidConfig(
                "timeout_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn people_config() -> DirectoryConfig {
        DirectoryConfig {
            url: "ldap://ldap.example.com".to_string(),
            user_attribute: "uid".to_string(),
            user_base_dn: "ou=People,dc=example,dc=com".to_string(),
            group_base_dn: "ou=Group,dc=example,dc=com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(people_config().validate().is_ok());

        let mut config = people_config();
        config.user_base_dn = String::new();
        assert!(matches!(config.validate(), Err(AuthError::InvalidConfig(_))));

        // Realm binds do not need the DN form
        let mut config = people_config();
        config.realm_domain = Some("corp.example.com".to_string());
        config.user_attribute = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_realm_config_still_needs_user_base_dn() {
        let config = DirectoryConfig {
            url: "ldap://dc.example.com".to_string(),
            realm_domain: Some("corp.example.com".to_string()),
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(AuthError::InvalidConfig(_))));
    }

    #[test]
    fn test_url_scheme_is_checked() {
        let mut config = people_config();
        config.url = "http://ldap.example.com".to_string();
        assert!(config.validate().is_err());

        config.url = "ldaps://ldap.example.com:636".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_realm_is_ignored() {
        let mut config = people_config();
        config.realm_domain = Some("  ".to_string());
        assert_eq!(config.realm(), None);

        config.realm_domain = Some("corp.example.com".to_string());
        assert_eq!(config.realm(), Some("corp.example.com"));
    }

    #[test]
    fn test_parse_toml() {
        let config = BastionConfig::parse(
            r#"
            [directory]
            url = "ldap://ldap.example.com"
            userattr = "uid"
            userdn = "ou=People,dc=example,dc=com"
            groupdn = "ou=Group,dc=example,dc=com"

            [groups.admins]
            policies = ["admin-policy"]

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        let directory = config.directory.unwrap();
        assert_eq!(directory.user_base_dn, "ou=People,dc=example,dc=com");
        assert_eq!(directory.timeout_seconds, crate::DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.groups["admins"].policies, vec!["admin-policy".to_string()]);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BASTION_LDAP_URL", "ldaps://dc.corp.example.com"),
            ("BASTION_REALM_DOMAIN", "corp.example.com"),
            ("BASTION_STARTTLS", "true"),
        ]
        .into_iter()
        .collect();

        let mut config = BastionConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        let directory = config.directory.unwrap();
        assert_eq!(directory.url, "ldaps://dc.corp.example.com");
        assert_eq!(directory.realm(), Some("corp.example.com"));
        assert!(directory.start_tls);
    }

    #[test]
    fn test_no_overrides_leaves_directory_unset() {
        let mut config = BastionConfig::default();
        config.apply_overrides(|_| None);
        assert!(config.directory.is_none());
    }
}
