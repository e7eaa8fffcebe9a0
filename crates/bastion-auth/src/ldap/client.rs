//! LDAP Client implementation
//!
//! Opens connections with `ldap3` and exposes them as [`DirectoryClient`]s.
//! Supports LDAP, LDAPS (SSL), and STARTTLS connections.

use async_trait::async_trait;
use bastion_core::{DirectoryConfig, DirectoryEntry, DirectoryError, SearchScope};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, LdapResult, Scope, SearchEntry};
use std::time::Duration;
use tracing::debug;

use crate::directory::{DirectoryClient, DirectoryConnector};

/// Connection factory backed by `ldap3`
#[derive(Debug, Clone, Copy, Default)]
pub struct LdapConnector;

impl LdapConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DirectoryConnector for LdapConnector {
    async fn connect(
        &self,
        config: &DirectoryConfig,
    ) -> Result<Box<dyn DirectoryClient>, DirectoryError> {
        let url = config.server_url()?;

        let settings = LdapConnSettings::new()
            .set_conn_timeout(Duration::from_secs(config.timeout_seconds))
            .set_starttls(config.start_tls)
            .set_no_tls_verify(config.insecure_tls);

        debug!(url = %url, start_tls = config.start_tls, "Connecting to LDAP server");

        let (conn, ldap) = LdapConnAsync::with_settings(settings, url.as_str())
            .await
            .map_err(|e| DirectoryError::Connection(e.to_string()))?;

        ldap3::drive!(conn);

        Ok(Box::new(LdapDirectory { ldap }))
    }
}

/// One live `ldap3` connection
pub struct LdapDirectory {
    ldap: Ldap,
}

#[async_trait]
impl DirectoryClient for LdapDirectory {
    async fn bind(&mut self, identity: &str, password: &str) -> Result<(), DirectoryError> {
        let result = self
            .ldap
            .simple_bind(identity, password)
            .await
            .map_err(map_ldap_error)?;

        check_result(result)
    }

    async fn search(
        &mut self,
        base_dn: &str,
        scope: SearchScope,
        filter: &str,
        attributes: &[&str],
    ) -> Result<Vec<DirectoryEntry>, DirectoryError> {
        let (rs, _res) = self
            .ldap
            .search(base_dn, to_ldap_scope(scope), filter, attributes.to_vec())
            .await
            .map_err(map_ldap_error)?
            .success()
            .map_err(map_ldap_error)?;

        let entries = rs
            .into_iter()
            .map(|result| {
                let entry = SearchEntry::construct(result);
                DirectoryEntry {
                    dn: entry.dn,
                    attributes: entry.attrs,
                }
            })
            .collect::<Vec<_>>();

        debug!(base_dn, filter, count = entries.len(), "LDAP search completed");
        Ok(entries)
    }

    async fn unbind(&mut self) -> Result<(), DirectoryError> {
        self.ldap.unbind().await.map_err(map_ldap_error)
    }
}

fn to_ldap_scope(scope: SearchScope) -> Scope {
    match scope {
        SearchScope::Base => Scope::Base,
        SearchScope::OneLevel => Scope::OneLevel,
        SearchScope::Subtree => Scope::Subtree,
    }
}

fn check_result(result: LdapResult) -> Result<(), DirectoryError> {
    if result.rc == 0 {
        return Ok(());
    }

    Err(DirectoryError::Operation {
        code: result.rc,
        message: result_message(&result),
    })
}

fn result_message(result: &LdapResult) -> String {
    if result.text.is_empty() {
        result_code_name(result.rc).to_string()
    } else {
        result.text.clone()
    }
}

fn result_code_name(rc: u32) -> &'static str {
    match rc {
        1 => "operations error",
        3 => "time limit exceeded",
        4 => "size limit exceeded",
        32 => "no such object",
        34 => "invalid DN syntax",
        48 => "inappropriate authentication",
        49 => "invalid credentials",
        50 => "insufficient access rights",
        51 => "busy",
        52 => "unavailable",
        53 => "unwilling to perform",
        _ => "unknown result code",
    }
}

fn map_ldap_error(e: LdapError) -> DirectoryError {
    match e {
        LdapError::LdapResult { result } => DirectoryError::Operation {
            code: result.rc,
            message: result_message(&result),
        },
        other => DirectoryError::Connection(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ldap_result(rc: u32, text: &str) -> LdapResult {
        LdapResult {
            rc,
            matched: String::new(),
            text: text.to_string(),
            refs: vec![],
            ctrls: vec![],
        }
    }

    #[test]
    fn test_success_code_passes() {
        assert!(check_result(ldap_result(0, "")).is_ok());
    }

    #[test]
    fn test_invalid_credentials_code() {
        let err = check_result(ldap_result(49, "")).unwrap_err();
        assert_eq!(
            err,
            DirectoryError::Operation {
                code: 49,
                message: "invalid credentials".to_string(),
            }
        );
    }

    #[test]
    fn test_server_text_preferred() {
        let err = map_ldap_error(LdapError::LdapResult {
            result: ldap_result(
                49,
                "80090308: LdapErr: DSID-0C09042A, comment: AcceptSecurityContext error",
            ),
        });
        assert!(matches!(
            err,
            DirectoryError::Operation { code: 49, ref message } if message.starts_with("80090308")
        ));
    }

    #[tokio::test]
    async fn test_connect_rejects_non_ldap_url() {
        let config = DirectoryConfig {
            url: "https://ldap.example.com".to_string(),
            ..Default::default()
        };

        let result = LdapConnector::new().connect(&config).await;
        assert!(matches!(result, Err(DirectoryError::InvalidUrl(_))));
    }
}
