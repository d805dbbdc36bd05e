// src/model.rs
//! Vault records and the identities they hang off

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::Envelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The account whose records a listing or rotation operates over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Descriptive fields of a record — stored in plaintext, never encrypted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl RecordMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// One stored secret plus its metadata, owned by exactly one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRecord {
    pub id: RecordId,
    pub owner: OwnerId,
    pub metadata: RecordMetadata,
    pub envelope: Envelope,
    pub date_created: DateTime<Utc>,
    pub date_last_modified: DateTime<Utc>,
    pub modified_by: String,
}

/// A record that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub owner: OwnerId,
    pub metadata: RecordMetadata,
    pub envelope: Envelope,
    pub modified_by: String,
    pub created_at: DateTime<Utc>,
}

impl NewRecord {
    pub fn into_record(self, id: RecordId) -> VaultRecord {
        VaultRecord {
            id,
            owner: self.owner,
            metadata: self.metadata,
            envelope: self.envelope,
            date_created: self.created_at,
            date_last_modified: self.created_at,
            modified_by: self.modified_by,
        }
    }
}

/// Listing order; every key sorts ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Unsorted,
    Name,
    Url,
    ModifiedBy,
    DateCreated,
    DateLastModified,
}

impl From<&str> for SortKey {
    /// Unknown or empty keys fall back to store order
    fn from(key: &str) -> Self {
        match key {
            "name" => SortKey::Name,
            "url" => SortKey::Url,
            "modifiedBy" => SortKey::ModifiedBy,
            "dateCreated" => SortKey::DateCreated,
            "dateLastModified" => SortKey::DateLastModified,
            _ => SortKey::Unsorted,
        }
    }
}

impl SortKey {
    pub fn sort(self, records: &mut [VaultRecord]) {
        match self {
            SortKey::Unsorted => {}
            SortKey::Name => records.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name)),
            SortKey::Url => records.sort_by(|a, b| cmp_optional(&a.metadata.url, &b.metadata.url)),
            SortKey::ModifiedBy => records.sort_by(|a, b| a.modified_by.cmp(&b.modified_by)),
            SortKey::DateCreated => records.sort_by_key(|r| r.date_created),
            SortKey::DateLastModified => records.sort_by_key(|r| r.date_last_modified),
        }
    }
}

// Missing values sort first, as NULLs do in an ascending SQL ORDER BY
fn cmp_optional(a: &Option<String>, b: &Option<String>) -> Ordering {
    a.as_deref().cmp(&b.as_deref())
}
