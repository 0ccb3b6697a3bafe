//! Test record model.
//!
//! # Responsibility
//! - Hold one structured test record as an ordered JSON mapping.
//! - Check record completeness against a schema registry.
//!
//! # Invariants
//! - A record always serializes as a flat JSON object.
//! - Custom fields live under `custom_fields`, shaped by the record's
//!   category catalog rather than by the registry layers.
//! - A record is complete only when every required common field is non-blank
//!   and its category is known and active.

use crate::model::category::CategoryLookup;
use crate::model::field::{FormType, CUSTOM_FIELDS_KEY};
use crate::schema::registry::SchemaRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record key naming the record's category.
pub const CATEGORY_FIELD_KEY: &str = "test_category";

/// One structured test record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Parses a record from JSON text; the top level must be an object.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a non-empty trimmed string value.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn category(&self) -> Option<&str> {
        self.text(CATEGORY_FIELD_KEY)
    }

    /// Returns the custom-fields sub-mapping when present and an object.
    pub fn custom_fields(&self) -> Option<&Map<String, Value>> {
        self.fields.get(CUSTOM_FIELDS_KEY).and_then(Value::as_object)
    }

    /// Lists required common keys whose values are missing or blank.
    pub fn missing_required_fields<'r>(&self, registry: &'r SchemaRegistry) -> Vec<&'r str> {
        registry
            .common_fields()
            .iter()
            .filter(|field| field.required && is_blank(self.fields.get(&field.key)))
            .map(|field| field.key.as_str())
            .collect()
    }

    /// Validates record completeness against `registry`.
    ///
    /// Checks run in order: required fields (declaration order), enum
    /// membership of select fields, then the record's category.
    pub fn validate(&self, registry: &SchemaRegistry) -> Result<(), RecordValidationError> {
        if let Some(key) = self.missing_required_fields(registry).first() {
            return Err(RecordValidationError::MissingRequiredField((*key).to_string()));
        }

        for field in registry.common_fields() {
            if field.form_type != FormType::Select {
                continue;
            }
            let Some(enum_key) = field.enum_key.as_deref() else {
                continue;
            };
            let Some(value) = self.text(&field.key) else {
                continue;
            };
            if !registry.enum_values(enum_key).iter().any(|allowed| allowed == value) {
                return Err(RecordValidationError::InvalidEnumValue {
                    field: field.key.clone(),
                    value: value.to_string(),
                });
            }
        }

        let Some(category) = self.category() else {
            return Err(RecordValidationError::MissingCategory);
        };
        match registry.category(category) {
            CategoryLookup::Active(_) => Ok(()),
            CategoryLookup::Deactivated(_) => Err(RecordValidationError::DeactivatedCategory(
                category.to_string(),
            )),
            CategoryLookup::Unknown => {
                Err(RecordValidationError::UnknownCategory(category.to_string()))
            }
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => false,
    }
}

/// Record completeness errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    MissingRequiredField(String),
    InvalidEnumValue { field: String, value: String },
    MissingCategory,
    UnknownCategory(String),
    DeactivatedCategory(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField(key) => write!(f, "required field is empty: {key}"),
            Self::InvalidEnumValue { field, value } => {
                write!(f, "field `{field}` has value outside its choices: {value}")
            }
            Self::MissingCategory => write!(f, "record has no {CATEGORY_FIELD_KEY}"),
            Self::UnknownCategory(name) => write!(f, "category is not in the catalog: {name}"),
            Self::DeactivatedCategory(name) => {
                write!(f, "category is not open for new entries: {name}")
            }
        }
    }
}

impl Error for RecordValidationError {}
