//! Login response handed back to the host

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::PolicySet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Policies granted to the session
    pub policies: Vec<String>,

    /// Metadata attached to the issued session
    pub metadata: HashMap<String, String>,

    pub display_name: String,

    /// Whether the host may renew the session
    pub renewable: bool,

    pub issued_at: DateTime<Utc>,
}

impl LoginResponse {
    pub fn new(username: &str, policies: PolicySet) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("username".to_string(), username.to_string());

        Self {
            policies: policies.into_vec(),
            metadata,
            display_name: username.to_string(),
            renewable: true,
            issued_at: Utc::now(),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.metadata.get("username").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_serializes_policies_in_order() {
        let policies: PolicySet = ["admin-policy", "dev"].into_iter().collect();
        let response = LoginResponse::new("alice", policies);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["policies"], serde_json::json!(["admin-policy", "dev"]));
        assert_eq!(json["metadata"]["username"], "alice");
        assert_eq!(json["renewable"], true);
        assert_eq!(response.username(), Some("alice"));
    }
}
