//! Policy types

use serde::{Deserialize, Serialize};

/// Policies granted by one directory group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupEntry {
    #[serde(default)]
    pub policies: Vec<String>,
}

impl GroupEntry {
    /// Build an entry from a raw policy list, trimming names and dropping blanks
    pub fn new<I, S>(policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let policies = policies
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Self { policies }
    }
}

/// Ordered, duplicate-free list of policy names resolved for one login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct PolicySet(Vec<String>);

impl PolicySet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a policy unless it is already present
    pub fn insert(&mut self, policy: &str) -> bool {
        if self.contains(policy) {
            return false;
        }
        self.0.push(policy.to_string());
        true
    }

    pub fn extend<'a, I>(&mut self, policies: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for policy in policies {
            self.insert(policy);
        }
    }

    pub fn contains(&self, policy: &str) -> bool {
        self.0.iter().any(|p| p == policy)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Same policies regardless of order
    pub fn same_policies(&self, other: &[String]) -> bool {
        let mut mine: Vec<&str> = self.iter().collect();
        let mut theirs: Vec<&str> = other.iter().map(String::as_str).collect();
        mine.sort_unstable();
        mine.dedup();
        theirs.sort_unstable();
        theirs.dedup();
        mine == theirs
    }
}

impl<S: AsRef<str>> FromIterator<S> for PolicySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = PolicySet::new();
        for policy in iter {
            set.insert(policy.as_ref());
        }
        set
    }
}

impl From<Vec<String>> for PolicySet {
    fn from(policies: Vec<String>) -> Self {
        policies.into_iter().collect()
    }
}

impl From<PolicySet> for Vec<String> {
    fn from(set: PolicySet) -> Self {
        set.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_occurrence_order() {
        let mut set = PolicySet::new();
        assert!(set.insert("dev"));
        assert!(set.insert("ops"));
        assert!(!set.insert("dev"));

        assert_eq!(set.as_slice(), &["dev".to_string(), "ops".to_string()]);
    }

    #[test]
    fn test_same_policies_ignores_order() {
        let set: PolicySet = ["admin", "readonly"].into_iter().collect();

        assert!(set.same_policies(&["readonly".to_string(), "admin".to_string()]));
        assert!(!set.same_policies(&["admin".to_string()]));
    }

    #[test]
    fn test_deserialize_drops_duplicates() {
        let set: PolicySet = serde_json::from_str(r#"["dev", "ops", "dev"]"#).unwrap();
        assert_eq!(set.as_slice(), &["dev".to_string(), "ops".to_string()]);

        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["dev","ops"]"#);
    }

    #[test]
    fn test_group_entry_normalises_policies() {
        let entry = GroupEntry::new([" admin ", "", "dev"]);
        assert_eq!(entry.policies, vec!["admin".to_string(), "dev".to_string()]);
    }
}
