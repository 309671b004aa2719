//! Subtree searches and entry access.

use std::collections::HashMap;

use ldap3::{Scope, SearchEntry};

use crate::connection::LdapConnection;
use crate::error::{LdapError, LdapResult};

// ============================================================================
// Entries
// ============================================================================

/// One directory entry with its text-valued attributes.
#[derive(Debug, Clone, Default)]
pub struct LdapEntry {
    /// Distinguished name of the entry.
    pub dn: String,
    /// Attribute values keyed by attribute name.
    pub attributes: HashMap<String, Vec<String>>,
}

impl LdapEntry {
    fn from_search_entry(entry: SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
        }
    }

    /// First value of the given attribute.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of the given attribute.
    #[must_use]
    pub fn get_attrs(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Whether the entry carries the given attribute at all.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

// ============================================================================
// Search
// ============================================================================

/// Fetches every entry below `base`, with all attributes.
pub async fn search_subtree(
    conn: &mut LdapConnection,
    base: &str,
    filter: &str,
) -> LdapResult<Vec<LdapEntry>> {
    let (results, _res) = conn
        .ldap
        .search(base, Scope::Subtree, filter, vec!["*"])
        .await?
        .success()
        .map_err(|e| LdapError::Search(format!("under '{base}': {e}")))?;

    let entries = results
        .into_iter()
        .map(|r| LdapEntry::from_search_entry(SearchEntry::construct(r)))
        .collect::<Vec<_>>();
    tracing::debug!(base = %base, count = entries.len(), "subtree search finished");
    Ok(entries)
}

// ============================================================================
// Tests
// ============================================================================
