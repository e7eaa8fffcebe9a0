//! Directory entry types

use std::collections::HashMap;

/// Search scope relative to the base DN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Only the base entry
    Base,
    /// Immediate children of the base entry
    OneLevel,
    /// The base entry and all of its descendants
    #[default]
    Subtree,
}

/// One entry of a search response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryEntry {
    /// Distinguished name of the entry
    pub dn: String,

    /// Attribute values keyed by attribute name
    pub attributes: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// First value of an attribute. Attribute names compare case-insensitively.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, values)| values)
            })
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_ignores_attribute_case() {
        let entry = DirectoryEntry::new("CN=Alice,OU=Users,DC=corp,DC=example,DC=com")
            .with_attribute("distinguishedname", ["CN=Alice,OU=Users,DC=corp,DC=example,DC=com"]);

        assert_eq!(
            entry.first_value("distinguishedName"),
            Some("CN=Alice,OU=Users,DC=corp,DC=example,DC=com")
        );
        assert_eq!(entry.first_value("mail"), None);
    }

    #[test]
    fn test_first_value_of_empty_attribute() {
        let entry = DirectoryEntry::new("uid=bob").with_attribute("cn", Vec::<String>::new());
        assert_eq!(entry.first_value("cn"), None);
    }
}
