//! Group to policy mappings
//!
//! The resolver only reads through [`GroupPolicyStore::lookup`]; writes go
//! through the root-only group surface on [`MemoryGroupStore`].

use async_trait::async_trait;
use bastion_core::{GroupEntry, StoreError};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[async_trait]
pub trait GroupPolicyStore: Send + Sync {
    /// Policies configured for `group`, or `None` when the group is unmapped
    async fn lookup(&self, group: &str) -> Result<Option<GroupEntry>, StoreError>;
}

/// In-process group store
#[derive(Default)]
pub struct MemoryGroupStore {
    groups: RwLock<HashMap<String, GroupEntry>>,
}

impl MemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, GroupEntry)>,
    {
        let groups = entries
            .into_iter()
            .filter(|(name, _)| !name.trim().is_empty())
            .map(|(name, entry)| (name, GroupEntry::new(&entry.policies)))
            .collect();

        Self {
            groups: RwLock::new(groups),
        }
    }

    /// Create or replace the mapping for `name`
    pub async fn set_group<I, S>(&self, name: &str, policies: I) -> Result<GroupEntry, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidName(name.to_string()));
        }

        let entry = GroupEntry::new(policies);
        self.groups
            .write()
            .await
            .insert(name.to_string(), entry.clone());

        info!(group = name, policies = ?entry.policies, "Group mapping updated");
        Ok(entry)
    }

    pub async fn get_group(&self, name: &str) -> Option<GroupEntry> {
        self.groups.read().await.get(name).cloned()
    }

    /// Remove a mapping; returns whether one existed
    pub async fn delete_group(&self, name: &str) -> bool {
        let removed = self.groups.write().await.remove(name).is_some();
        if removed {
            info!(group = name, "Group mapping deleted");
        }
        removed
    }

    /// Mapped group names, sorted
    pub async fn list_groups(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl GroupPolicyStore for MemoryGroupStore {
    async fn lookup(&self, group: &str) -> Result<Option<GroupEntry>, StoreError> {
        let entry = self.get_group(group).await;
        if entry.is_none() {
            debug!(group, "No policy mapping for group");
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_lookup_group() {
        let store = MemoryGroupStore::new();
        store.set_group("admins", ["admin-policy", " dev "]).await.unwrap();

        let entry = store.lookup("admins").await.unwrap().unwrap();
        assert_eq!(entry.policies, vec!["admin-policy".to_string(), "dev".to_string()]);
        assert!(store.lookup("ops").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_group_name_rejected() {
        let store = MemoryGroupStore::new();
        let result = store.set_group(" ", ["admin"]).await;
        assert!(matches!(result, Err(StoreError::InvalidName(_))));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let store = MemoryGroupStore::from_entries([
            ("ops".to_string(), GroupEntry::new(["ops"])),
            ("admins".to_string(), GroupEntry::new(["admin"])),
        ]);

        assert_eq!(store.list_groups().await, vec!["admins".to_string(), "ops".to_string()]);
        assert!(store.delete_group("ops").await);
        assert!(!store.delete_group("ops").await);
        assert_eq!(store.list_groups().await, vec!["admins".to_string()]);
    }
}
