//! Schema registry declaration, validation and process-wide instance.
//!
//! # Responsibility
//! - Hold the versioned three-layer field declaration, enum sets, category
//!   catalog, domain catalog and extraction rules.
//! - Validate declaration-level invariants before a registry is used.
//! - Provide one immutable registry per process.
//!
//! # Invariants
//! - The global registry is installed at most once and never mutated.
//! - Lookups of unknown enum sets or categories yield empty results.
//! - Field keys are unique per layer and per category catalog.

use crate::model::category::{CategoryCatalog, CategoryLookup, DomainEntry};
use crate::model::field::{FieldDescriptor, FormType, CUSTOM_FIELDS_KEY};
use crate::schema::builtin;
use log::info;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

static GLOBAL_REGISTRY: OnceCell<SchemaRegistry> = OnceCell::new();

static FIELD_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("valid field key regex"));
static VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+(\.\d+)?$").expect("valid version regex"));

/// One of the three field groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    /// Fixed fields present on every record.
    Common,
    /// Fixed slots holding free-form nested JSON.
    Flexible,
    /// Category-specific fields drawn from the catalog.
    Custom,
}

impl LayerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Flexible => "flexible",
            Self::Custom => "custom",
        }
    }
}

/// A named field grouping with presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub label: String,
    /// Accent color (CSS value) for headings.
    pub color: String,
    pub background: String,
    pub border: String,
    pub description: String,
    /// Always empty for the custom layer; its fields come from the catalog.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layers {
    pub common: Layer,
    pub flexible: Layer,
    pub custom: Layer,
}

/// Versioned, read-only schema description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    version: String,
    enums: BTreeMap<String, Vec<String>>,
    layers: Layers,
    categories: CategoryCatalog,
    #[serde(default)]
    domains: Vec<DomainEntry>,
    #[serde(default)]
    extraction_rules: Vec<String>,
}

impl SchemaRegistry {
    pub(crate) fn from_parts(
        version: String,
        enums: BTreeMap<String, Vec<String>>,
        layers: Layers,
        categories: CategoryCatalog,
        domains: Vec<DomainEntry>,
        extraction_rules: Vec<String>,
    ) -> Self {
        Self {
            version,
            enums,
            layers,
            categories,
            domains,
            extraction_rules,
        }
    }

    /// Built-in TDSP schema (v1.0).
    pub fn builtin() -> Self {
        builtin::tdsp_v1()
    }

    /// Returns the process-wide registry, defaulting to the built-in schema.
    pub fn global() -> &'static SchemaRegistry {
        GLOBAL_REGISTRY.get_or_init(|| {
            let registry = Self::builtin();
            info!(
                "event=registry_init module=schema status=ok source=builtin version={}",
                registry.version
            );
            registry
        })
    }

    /// Installs a host-provided registry as the process-wide instance.
    ///
    /// # Errors
    /// - Returns `Invalid` when the registry fails validation.
    /// - Returns `AlreadyInstalled` when a global registry already exists,
    ///   unless it is identical to `registry`.
    pub fn install_global(registry: SchemaRegistry) -> Result<&'static SchemaRegistry, RegistryLoadError> {
        registry.validate().map_err(RegistryLoadError::Invalid)?;
        let version = registry.version.clone();
        let mut installed_now = false;
        let active = GLOBAL_REGISTRY.get_or_init(|| {
            installed_now = true;
            registry.clone()
        });
        if !installed_now && *active != registry {
            return Err(RegistryLoadError::AlreadyInstalled {
                active_version: active.version.clone(),
            });
        }
        if installed_now {
            info!("event=registry_init module=schema status=ok source=host version={version}");
        }
        Ok(active)
    }

    /// Parses and validates a registry from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, RegistryLoadError> {
        let registry: SchemaRegistry =
            serde_json::from_str(raw).map_err(RegistryLoadError::Parse)?;
        registry.validate().map_err(RegistryLoadError::Invalid)?;
        Ok(registry)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Values of one enumerated set, in declaration order.
    pub fn enum_values(&self, enum_key: &str) -> &[String] {
        self.enums.get(enum_key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn layer(&self, kind: LayerKind) -> &Layer {
        match kind {
            LayerKind::Common => &self.layers.common,
            LayerKind::Flexible => &self.layers.flexible,
            LayerKind::Custom => &self.layers.custom,
        }
    }

    pub fn common_fields(&self) -> &[FieldDescriptor] {
        &self.layers.common.fields
    }

    pub fn common_field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.layers.common.fields.iter().find(|field| field.key == key)
    }

    pub fn flexible_fields(&self) -> &[FieldDescriptor] {
        &self.layers.flexible.fields
    }

    pub fn categories(&self) -> &CategoryCatalog {
        &self.categories
    }

    pub fn category(&self, name: &str) -> CategoryLookup<'_> {
        self.categories.lookup(name)
    }

    /// Custom-field catalog for `category`; empty when unknown or deactivated.
    pub fn module_fields(&self, category: &str) -> &[FieldDescriptor] {
        self.categories.lookup(category).fields()
    }

    pub fn domains(&self) -> &[DomainEntry] {
        &self.domains
    }

    pub fn active_domains(&self) -> impl Iterator<Item = &DomainEntry> {
        self.domains.iter().filter(|domain| domain.active)
    }

    pub fn domain(&self, key: &str) -> Option<&DomainEntry> {
        self.domains.iter().find(|domain| domain.key == key)
    }

    pub fn extraction_rules(&self) -> &[String] {
        &self.extraction_rules
    }

    /// Validates declaration-level registry invariants.
    pub fn validate(&self) -> Result<(), RegistryValidationError> {
        let version = self.version.trim();
        if version.is_empty() {
            return Err(RegistryValidationError::EmptyVersion);
        }
        if !VERSION_RE.is_match(version) {
            return Err(RegistryValidationError::InvalidVersion(self.version.clone()));
        }

        for (enum_key, values) in &self.enums {
            if values.is_empty() {
                return Err(RegistryValidationError::EmptyEnumSet(enum_key.clone()));
            }
            let mut seen = BTreeSet::new();
            for value in values {
                if !seen.insert(value.as_str()) {
                    return Err(RegistryValidationError::DuplicateEnumValue {
                        enum_key: enum_key.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        self.validate_fields(LayerKind::Common.as_str(), &self.layers.common.fields)?;
        self.validate_fields(LayerKind::Flexible.as_str(), &self.layers.flexible.fields)?;
        if let Some(field) = self.layers.custom.fields.first() {
            return Err(RegistryValidationError::CustomLayerFields(field.key.clone()));
        }
        for field in &self.layers.flexible.fields {
            if !field.field_type.is_json() {
                return Err(RegistryValidationError::NonJsonFlexibleField(field.key.clone()));
            }
        }

        let mut names = BTreeSet::new();
        for entry in self.categories.entries() {
            if entry.name.trim().is_empty() {
                return Err(RegistryValidationError::EmptyCategoryName);
            }
            if !names.insert(entry.name.as_str()) {
                return Err(RegistryValidationError::DuplicateCategory(entry.name.clone()));
            }
            self.validate_fields(&format!("category:{}", entry.name), &entry.fields)?;
        }

        let mut domain_keys = BTreeSet::new();
        for domain in &self.domains {
            if !domain_keys.insert(domain.key.as_str()) {
                return Err(RegistryValidationError::DuplicateDomain(domain.key.clone()));
            }
        }
        Ok(())
    }

    fn validate_fields(
        &self,
        scope: &str,
        fields: &[FieldDescriptor],
    ) -> Result<(), RegistryValidationError> {
        let mut keys = BTreeSet::new();
        for field in fields {
            if !FIELD_KEY_RE.is_match(&field.key) {
                return Err(RegistryValidationError::InvalidFieldKey {
                    scope: scope.to_string(),
                    key: field.key.clone(),
                });
            }
            if field.key == CUSTOM_FIELDS_KEY {
                return Err(RegistryValidationError::ReservedFieldKey {
                    scope: scope.to_string(),
                    key: field.key.clone(),
                });
            }
            if !keys.insert(field.key.as_str()) {
                return Err(RegistryValidationError::DuplicateFieldKey {
                    scope: scope.to_string(),
                    key: field.key.clone(),
                });
            }
            if field.form_type == FormType::Select {
                match field.enum_key.as_deref() {
                    None => {
                        return Err(RegistryValidationError::MissingEnumKey {
                            scope: scope.to_string(),
                            key: field.key.clone(),
                        });
                    }
                    Some(enum_key) if !self.enums.contains_key(enum_key) => {
                        return Err(RegistryValidationError::UnknownEnumSet {
                            field: field.key.clone(),
                            enum_key: enum_key.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

/// Declaration-level registry errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryValidationError {
    EmptyVersion,
    InvalidVersion(String),
    EmptyEnumSet(String),
    DuplicateEnumValue { enum_key: String, value: String },
    InvalidFieldKey { scope: String, key: String },
    ReservedFieldKey { scope: String, key: String },
    DuplicateFieldKey { scope: String, key: String },
    MissingEnumKey { scope: String, key: String },
    UnknownEnumSet { field: String, enum_key: String },
    NonJsonFlexibleField(String),
    CustomLayerFields(String),
    EmptyCategoryName,
    DuplicateCategory(String),
    DuplicateDomain(String),
}

impl Display for RegistryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyVersion => write!(f, "schema version must not be empty"),
            Self::InvalidVersion(value) => write!(
                f,
                "schema version is invalid: {value} (expected major.minor[.patch])"
            ),
            Self::EmptyEnumSet(key) => write!(f, "enum set has no values: {key}"),
            Self::DuplicateEnumValue { enum_key, value } => {
                write!(f, "enum set `{enum_key}` repeats value: {value}")
            }
            Self::InvalidFieldKey { scope, key } => {
                write!(f, "{scope} field key is invalid: {key}")
            }
            Self::ReservedFieldKey { scope, key } => {
                write!(f, "{scope} field key is reserved: {key}")
            }
            Self::DuplicateFieldKey { scope, key } => {
                write!(f, "{scope} field key is duplicated: {key}")
            }
            Self::MissingEnumKey { scope, key } => {
                write!(f, "{scope} select field has no enum_key: {key}")
            }
            Self::UnknownEnumSet { field, enum_key } => {
                write!(f, "field `{field}` references unknown enum set: {enum_key}")
            }
            Self::NonJsonFlexibleField(key) => {
                write!(f, "flexible field must declare a JSON type: {key}")
            }
            Self::CustomLayerFields(key) => {
                write!(f, "custom layer declares a fixed field: {key}")
            }
            Self::EmptyCategoryName => write!(f, "category name must not be empty"),
            Self::DuplicateCategory(name) => write!(f, "category is duplicated: {name}"),
            Self::DuplicateDomain(key) => write!(f, "domain is duplicated: {key}"),
        }
    }
}

impl Error for RegistryValidationError {}

/// Errors raised while loading or installing a registry.
#[derive(Debug)]
pub enum RegistryLoadError {
    Parse(serde_json::Error),
    Invalid(RegistryValidationError),
    AlreadyInstalled { active_version: String },
}

impl Display for RegistryLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "schema JSON could not be parsed: {err}"),
            Self::Invalid(err) => write!(f, "invalid schema: {err}"),
            Self::AlreadyInstalled { active_version } => write!(
                f,
                "schema registry already installed (version {active_version}); refusing to replace it"
            ),
        }
    }
}

impl Error for RegistryLoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(err) => Some(err),
            Self::AlreadyInstalled { .. } => None,
        }
    }
}
