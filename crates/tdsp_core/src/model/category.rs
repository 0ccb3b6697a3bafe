//! Category catalog and platform domain model.
//!
//! # Responsibility
//! - Map each test category to its own custom-field catalog.
//! - Resolve a category name into a tagged lookup result.
//!
//! # Invariants
//! - Catalog order is declaration order; lookups never reorder fields.
//! - A deactivated category exposes no fields for new entries.
//! - Unknown names resolve to `CategoryLookup::Unknown`, never an error.

use crate::model::field::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a category accepts new records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    #[default]
    Active,
    /// Declared for planning; hidden from prompts and new entries.
    Deactivated,
}

/// One category catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Category name as stored in a record's `test_category`.
    pub name: String,
    pub label: String,
    pub icon: String,
    #[serde(default)]
    pub status: CategoryStatus,
    pub fields: Vec<FieldDescriptor>,
}

impl CategoryEntry {
    pub fn is_active(&self) -> bool {
        self.status == CategoryStatus::Active
    }
}

/// Result of resolving a category name against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLookup<'a> {
    Active(&'a CategoryEntry),
    Deactivated(&'a CategoryEntry),
    Unknown,
}

impl<'a> CategoryLookup<'a> {
    /// Custom-field catalog usable for new entries (empty unless active).
    pub fn fields(self) -> &'a [FieldDescriptor] {
        match self {
            Self::Active(entry) => &entry.fields,
            Self::Deactivated(_) | Self::Unknown => &[],
        }
    }

    pub fn entry(self) -> Option<&'a CategoryEntry> {
        match self {
            Self::Active(entry) | Self::Deactivated(entry) => Some(entry),
            Self::Unknown => None,
        }
    }
}

/// Ordered category catalog with a name index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CategoryEntry>", into = "Vec<CategoryEntry>")]
pub struct CategoryCatalog {
    entries: Vec<CategoryEntry>,
    index: BTreeMap<String, usize>,
}

impl CategoryCatalog {
    pub fn new(entries: Vec<CategoryEntry>) -> Self {
        let mut index = BTreeMap::new();
        for (position, entry) in entries.iter().enumerate() {
            // First declaration wins; duplicates are reported by registry validation.
            index.entry(entry.name.clone()).or_insert(position);
        }
        Self { entries, index }
    }

    pub fn lookup(&self, name: &str) -> CategoryLookup<'_> {
        match self.index.get(name.trim()).map(|position| &self.entries[*position]) {
            Some(entry) if entry.is_active() => CategoryLookup::Active(entry),
            Some(entry) => CategoryLookup::Deactivated(entry),
            None => CategoryLookup::Unknown,
        }
    }

    /// Entries in declaration order, including deactivated ones.
    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn active(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.entries.iter().filter(|entry| entry.is_active())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<CategoryEntry>> for CategoryCatalog {
    fn from(entries: Vec<CategoryEntry>) -> Self {
        Self::new(entries)
    }
}

impl From<CategoryCatalog> for Vec<CategoryEntry> {
    fn from(catalog: CategoryCatalog) -> Self {
        catalog.entries
    }
}

/// Platform-level data domain (only `test_data` is live today).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainEntry {
    pub key: String,
    pub label: String,
    pub icon: String,
    #[serde(default)]
    pub active: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub planned_entities: Vec<String>,
}
