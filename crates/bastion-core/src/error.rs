//! Error types for Bastion

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure reported by a directory connection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("invalid directory URL: {0}")]
    InvalidUrl(String),

    #[error("failed to connect to directory server: {0}")]
    Connection(String),

    #[error("directory returned code {code}: {message}")]
    Operation { code: u32, message: String },

    #[error("malformed directory entry: {0}")]
    MalformedEntry(String),
}

impl DirectoryError {
    /// LDAP result code 49
    pub const INVALID_CREDENTIALS: u32 = 49;

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        DirectoryError::Operation {
            code: Self::INVALID_CREDENTIALS,
            message: message.into(),
        }
    }
}

/// Failure reported by a group policy store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("invalid group name: {0:?}")]
    InvalidName(String),

    #[error("group store unavailable: {0}")]
    Unavailable(String),
}

/// Tag for branching on an [`AuthError`] without matching its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigMissing,
    InvalidConfig,
    ConnectionError,
    BindFailure,
    UserSearchFailure,
    UserNotFound,
    AmbiguousUser,
    GroupSearchFailure,
    NoAuthorizedGroups,
    PoliciesChanged,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("ldap backend not configured")]
    ConfigMissing,

    #[error("invalid ldap configuration: {0}")]
    InvalidConfig(String),

    #[error("LDAP connection failed: {0}")]
    ConnectionError(#[source] DirectoryError),

    /// Covers both unknown users and wrong passwords.
    #[error("LDAP bind failed: {0}")]
    BindFailure(#[source] DirectoryError),

    #[error("LDAP user search failed: {0}")]
    UserSearchFailure(#[source] DirectoryError),

    #[error("LDAP user not found: {0}")]
    UserNotFound(String),

    #[error("too many LDAP user results for {principal}: {count}")]
    AmbiguousUser { principal: String, count: usize },

    #[error("LDAP group search failed: {0}")]
    GroupSearchFailure(#[source] DirectoryError),

    #[error("user is not member of any authorized group")]
    NoAuthorizedGroups,

    #[error("policies have changed, not renewing")]
    PoliciesChanged,
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::ConfigMissing => ErrorKind::ConfigMissing,
            AuthError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            AuthError::ConnectionError(_) => ErrorKind::ConnectionError,
            AuthError::BindFailure(_) => ErrorKind::BindFailure,
            AuthError::UserSearchFailure(_) => ErrorKind::UserSearchFailure,
            AuthError::UserNotFound(_) => ErrorKind::UserNotFound,
            AuthError::AmbiguousUser { .. } => ErrorKind::AmbiguousUser,
            AuthError::GroupSearchFailure(_) => ErrorKind::GroupSearchFailure,
            AuthError::NoAuthorizedGroups => ErrorKind::NoAuthorizedGroups,
            AuthError::PoliciesChanged => ErrorKind::PoliciesChanged,
        }
    }

    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::ConfigMissing => "ConfigMissing",
            ErrorKind::InvalidConfig => "InvalidConfig",
            ErrorKind::ConnectionError => "ConnectionError",
            ErrorKind::BindFailure => "BindFailure",
            ErrorKind::UserSearchFailure => "UserSearchFailure",
            ErrorKind::UserNotFound => "UserNotFound",
            ErrorKind::AmbiguousUser => "AmbiguousUser",
            ErrorKind::GroupSearchFailure => "GroupSearchFailure",
            ErrorKind::NoAuthorizedGroups => "NoAuthorizedGroups",
            ErrorKind::PoliciesChanged => "PoliciesChanged",
        }
    }

    /// Underlying directory failure, if any
    pub fn directory_cause(&self) -> Option<&DirectoryError> {
        match self {
            AuthError::ConnectionError(cause)
            | AuthError::BindFailure(cause)
            | AuthError::UserSearchFailure(cause)
            | AuthError::GroupSearchFailure(cause) => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_bind_failure_message_carries_directory_text() {
        let err = AuthError::BindFailure(DirectoryError::invalid_credentials("Invalid credentials"));

        assert_eq!(err.kind(), ErrorKind::BindFailure);
        assert_eq!(
            err.to_string(),
            "LDAP bind failed: directory returned code 49: Invalid credentials"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_codes_follow_kind() {
        assert_eq!(AuthError::ConfigMissing.code(), "ConfigMissing");
        assert_eq!(AuthError::NoAuthorizedGroups.code(), "NoAuthorizedGroups");
        let ambiguous = AuthError::AmbiguousUser {
            principal: "alice@corp.example.com".into(),
            count: 2,
        };
        assert_eq!(ambiguous.code(), "AmbiguousUser");
        assert!(ambiguous.directory_cause().is_none());
    }
}
