//! Field descriptor model.
//!
//! # Responsibility
//! - Describe one record attribute declaratively (type, requiredness, UI hint).
//! - Answer the shape questions every generator asks (array-like, hidden, control id).
//!
//! # Invariants
//! - `key` is unique within its layer or category catalog.
//! - `enum_key` is only meaningful when `form_type == FormType::Select`.
//! - The control id of a field is always `f_<key>`.

use serde::{Deserialize, Serialize};

/// Prefix shared by every rendered input control id.
pub const CONTROL_ID_PREFIX: &str = "f_";

/// Record key holding the category-specific sub-mapping.
pub const CUSTOM_FIELDS_KEY: &str = "custom_fields";

/// Returns the deterministic control id for one field key.
pub fn control_id(key: &str) -> String {
    format!("{CONTROL_ID_PREFIX}{key}")
}

/// Semantic value type of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Enum,
    /// ISO calendar date (`YYYY-MM-DD`).
    Date,
    /// Multi-line free text.
    Text,
    StringArray,
    JsonObject,
    JsonArray,
}

impl FieldType {
    /// Human-readable type label used in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Enum => "Enum",
            Self::Date => "Date",
            Self::Text => "Text",
            Self::StringArray => "Array<String>",
            Self::JsonObject => "JSON Object",
            Self::JsonArray => "JSON Array",
        }
    }

    /// Whether values of this type are ordered sequences.
    pub fn is_array(self) -> bool {
        matches!(self, Self::StringArray | Self::JsonArray)
    }

    /// Whether values of this type are nested JSON structures.
    pub fn is_json(self) -> bool {
        matches!(self, Self::JsonObject | Self::JsonArray)
    }
}

/// UI hint: how a field is rendered in the input form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormType {
    #[default]
    Text,
    Select,
    Date,
    Textarea,
    /// Never rendered and never shown to the extraction service.
    Hidden,
    Json,
    JsonArray,
}

/// Declarative metadata for one record attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Rendered as part of the type label (`String (PK)`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub primary_key: bool,
    #[serde(default)]
    pub required: bool,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub form_type: FormType,
    /// Name of the enumerated value set backing a `select` control.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_key: Option<String>,
}

impl FieldDescriptor {
    /// Creates an optional, text-rendered field.
    pub fn new(key: impl Into<String>, field_type: FieldType, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type,
            primary_key: false,
            required: false,
            description: description.into(),
            placeholder: None,
            default_value: None,
            form_type: FormType::Text,
            enum_key: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn form(mut self, form_type: FormType) -> Self {
        self.form_type = form_type;
        self
    }

    /// Renders the field as a closed-choice control over `enum_key`.
    pub fn select(mut self, enum_key: impl Into<String>) -> Self {
        self.form_type = FormType::Select;
        self.enum_key = Some(enum_key.into());
        self
    }

    /// Type label including the primary-key marker, e.g. `String (PK)`.
    pub fn type_label(&self) -> String {
        if self.primary_key {
            format!("{} (PK)", self.field_type.label())
        } else {
            self.field_type.label().to_string()
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.form_type == FormType::Hidden
    }

    pub fn is_array(&self) -> bool {
        self.field_type.is_array()
    }

    pub fn control_id(&self) -> String {
        control_id(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::{control_id, FieldDescriptor, FieldType, FormType};

    #[test]
    fn type_label_marks_primary_key() {
        let field = FieldDescriptor::new("test_id", FieldType::String, "id").primary_key();
        assert_eq!(field.type_label(), "String (PK)");

        let plain = FieldDescriptor::new("tags", FieldType::StringArray, "tags");
        assert_eq!(plain.type_label(), "Array<String>");
    }

    #[test]
    fn select_sets_form_type_and_enum_key() {
        let field = FieldDescriptor::new("test_type", FieldType::Enum, "kind").select("test_type");
        assert_eq!(field.form_type, FormType::Select);
        assert_eq!(field.enum_key.as_deref(), Some("test_type"));
    }

    #[test]
    fn control_id_is_prefixed_key() {
        assert_eq!(control_id("notes"), "f_notes");
        let field = FieldDescriptor::new("dut_info", FieldType::JsonObject, "dut");
        assert_eq!(field.control_id(), "f_dut_info");
    }

    #[test]
    fn array_like_types() {
        assert!(FieldType::StringArray.is_array());
        assert!(FieldType::JsonArray.is_array());
        assert!(!FieldType::JsonObject.is_array());
        assert!(FieldType::JsonObject.is_json());
        assert!(!FieldType::Text.is_json());
    }

    #[test]
    fn deserializes_with_defaults() {
        let field: FieldDescriptor = serde_json::from_value(serde_json::json!({
            "key": "best_candidate",
            "type": "string",
            "description": "final pick"
        }))
        .expect("minimal descriptor should decode");
        assert!(!field.required);
        assert_eq!(field.form_type, FormType::Text);
        assert_eq!(field.enum_key, None);
    }
}
