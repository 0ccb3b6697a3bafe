//! Form-to-record collector.
//!
//! # Responsibility
//! - Read control values (by `f_<key>` id) back into a structured record.
//! - Coerce values per field declaration: comma lists for array fields,
//!   nested JSON for flexible slots and custom fields.
//!
//! # Invariants
//! - Any JSON that parses is kept as typed, whatever its top-level shape.
//! - Lenient collection never fails; unparseable nested JSON degrades to an
//!   empty container of the declared shape and is reported as a fallback.
//! - Strict collection stops at the first unparseable nested-JSON control.
//! - Fallback logs carry field keys and shapes only, never control content.

use crate::model::field::{control_id, FieldType, CUSTOM_FIELDS_KEY};
use crate::model::record::Record;
use crate::schema::registry::SchemaRegistry;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::BuildHasher;
use std::str::FromStr;

/// Read access to the current value of rendered form controls.
pub trait FormControls {
    /// Returns the raw value of `control_id`, or `None` when no such control exists.
    fn control_value(&self, control_id: &str) -> Option<&str>;
}

impl<S: BuildHasher> FormControls for HashMap<String, String, S> {
    fn control_value(&self, control_id: &str) -> Option<&str> {
        self.get(control_id).map(String::as_str)
    }
}

impl FormControls for BTreeMap<String, String> {
    fn control_value(&self, control_id: &str) -> Option<&str> {
        self.get(control_id).map(String::as_str)
    }
}

/// How malformed nested JSON is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectMode {
    /// Substitute an empty container and keep collecting.
    #[default]
    Lenient,
    /// Reject the record.
    Strict,
}

impl CollectMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

impl FromStr for CollectMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unsupported collect mode `{other}`; expected lenient|strict"
            )),
        }
    }
}

/// Declared top-level shape of a nested-JSON control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonShape {
    Array,
    Object,
}

impl JsonShape {
    pub fn for_field_type(field_type: FieldType) -> Self {
        if field_type.is_array() {
            Self::Array
        } else {
            Self::Object
        }
    }

    pub fn empty_value(self) -> Value {
        match self {
            Self::Array => Value::Array(Vec::new()),
            Self::Object => Value::Object(Map::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

/// Outcome of decoding one nested-JSON control.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonDecode {
    /// Valid JSON, kept as typed.
    Parsed(Value),
    /// Blank input; the empty container of the declared shape.
    Blank(Value),
    /// Unparseable input replaced by the empty container of the declared shape.
    Fallback { value: Value, reason: String },
}

impl JsonDecode {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn value(&self) -> &Value {
        match self {
            Self::Parsed(value) | Self::Blank(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Parsed(value) | Self::Blank(value) | Self::Fallback { value, .. } => value,
        }
    }
}

/// Decodes `raw` as JSON; `shape` only picks the empty substitute.
pub fn decode_json(raw: &str, shape: JsonShape) -> JsonDecode {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return JsonDecode::Blank(shape.empty_value());
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => JsonDecode::Parsed(value),
        Err(err) => JsonDecode::Fallback {
            value: shape.empty_value(),
            reason: err.to_string(),
        },
    }
}

/// Splits a comma-separated list, trimming items and dropping empty ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// One control whose content was replaced by an empty container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFallback {
    pub key: String,
    pub shape: JsonShape,
    pub reason: String,
}

/// Collected record plus the fallbacks applied while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected {
    pub record: Record,
    pub fallbacks: Vec<FieldFallback>,
}

impl Collected {
    pub fn is_clean(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Collects a record leniently; never fails.
pub fn collect_form(registry: &SchemaRegistry, controls: &impl FormControls) -> Collected {
    let collected = collect_with(registry, controls, |fallback| {
        warn!(
            "event=json_fallback module=collector status=degraded field={} shape={}",
            fallback.key,
            fallback.shape.as_str()
        );
        Ok::<(), Infallible>(())
    });
    match collected {
        Ok(collected) => collected,
        Err(never) => match never {},
    }
}

/// Collects a record under `mode`.
///
/// # Errors
/// - In `CollectMode::Strict`, returns `CollectError::InvalidJson` for the
///   first unparseable nested-JSON control; later controls are not read.
pub fn collect_form_with_mode(
    registry: &SchemaRegistry,
    controls: &impl FormControls,
    mode: CollectMode,
) -> Result<Collected, CollectError> {
    match mode {
        CollectMode::Lenient => Ok(collect_form(registry, controls)),
        CollectMode::Strict => collect_with(registry, controls, |fallback| {
            error!(
                "event=json_rejected module=collector status=error field={} shape={}",
                fallback.key,
                fallback.shape.as_str()
            );
            Err(CollectError::InvalidJson {
                key: fallback.key.clone(),
                shape: fallback.shape,
                message: fallback.reason.clone(),
            })
        }),
    }
}

/// Shared collection loop; `on_fallback` decides whether a substitution
/// is accepted or aborts collection.
fn collect_with<E>(
    registry: &SchemaRegistry,
    controls: &impl FormControls,
    mut on_fallback: impl FnMut(&FieldFallback) -> Result<(), E>,
) -> Result<Collected, E> {
    let mut record = Record::new();
    let mut fallbacks = Vec::new();
    let mut decode = |key: &str, raw: &str, shape: JsonShape| -> Result<Value, E> {
        match decode_json(raw, shape) {
            JsonDecode::Fallback { value, reason } => {
                let fallback = FieldFallback {
                    key: key.to_string(),
                    shape,
                    reason,
                };
                on_fallback(&fallback)?;
                fallbacks.push(fallback);
                Ok(value)
            }
            decoded => Ok(decoded.into_value()),
        }
    };

    for field in registry.common_fields() {
        let Some(raw) = controls.control_value(&field.control_id()) else {
            if let Some(default) = field.default_value.as_deref() {
                record.insert(field.key.clone(), Value::String(default.to_string()));
            }
            continue;
        };
        let text = raw.trim();
        let value = if field.is_array() {
            Value::Array(split_list(text).into_iter().map(Value::String).collect())
        } else if text.is_empty() {
            Value::String(field.default_value.clone().unwrap_or_default())
        } else {
            Value::String(text.to_string())
        };
        record.insert(field.key.clone(), value);
    }

    for field in registry.flexible_fields() {
        let Some(raw) = controls.control_value(&field.control_id()) else {
            continue;
        };
        let value = decode(&field.key, raw, JsonShape::for_field_type(field.field_type))?;
        record.insert(field.key.clone(), value);
    }

    if let Some(raw) = controls.control_value(&control_id(CUSTOM_FIELDS_KEY)) {
        if !raw.trim().is_empty() {
            let value = decode(CUSTOM_FIELDS_KEY, raw, JsonShape::Object)?;
            record.insert(CUSTOM_FIELDS_KEY, value);
        }
    }

    Ok(Collected { record, fallbacks })
}

/// Collection errors surfaced in strict mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    InvalidJson {
        key: String,
        shape: JsonShape,
        message: String,
    },
}

impl Display for CollectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson {
                key,
                shape,
                message,
            } => write!(
                f,
                "field `{key}` must hold a JSON {}: {message}",
                shape.as_str()
            ),
        }
    }
}

impl Error for CollectError {}

#[cfg(test)]
mod tests {
    use super::{decode_json, split_list, CollectMode, JsonDecode, JsonShape};
    use serde_json::json;

    #[test]
    fn split_list_trims_and_drops_empty_items() {
        assert_eq!(split_list("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(split_list(" , x,, "), vec!["x"]);
        assert!(split_list("   ").is_empty());
    }

    #[test]
    fn decode_reports_which_path_was_taken() {
        assert_eq!(
            decode_json(r#" {"a": 1} "#, JsonShape::Object),
            JsonDecode::Parsed(json!({"a": 1}))
        );
        assert_eq!(decode_json("  ", JsonShape::Array), JsonDecode::Blank(json!([])));

        let broken = decode_json("[{", JsonShape::Array);
        assert!(broken.is_fallback());
        assert_eq!(broken.value(), &json!([]));
    }

    #[test]
    fn decode_keeps_valid_json_of_any_shape() {
        assert_eq!(
            decode_json("[1, 2]", JsonShape::Object),
            JsonDecode::Parsed(json!([1, 2]))
        );
        assert_eq!(
            decode_json(r#"{"item": "Noise"}"#, JsonShape::Array),
            JsonDecode::Parsed(json!({"item": "Noise"}))
        );
        assert_eq!(decode_json("42", JsonShape::Array), JsonDecode::Parsed(json!(42)));
    }

    #[test]
    fn decode_falls_back_only_on_parse_failure() {
        match decode_json("{oops", JsonShape::Object) {
            JsonDecode::Fallback { value, reason } => {
                assert_eq!(value, json!({}));
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected decode outcome: {other:?}"),
        }
    }

    #[test]
    fn collect_mode_parses_case_insensitively() {
        assert_eq!(" STRICT ".parse::<CollectMode>(), Ok(CollectMode::Strict));
        assert_eq!("lenient".parse::<CollectMode>(), Ok(CollectMode::Lenient));
        assert!("loose".parse::<CollectMode>().is_err());
        assert_eq!(CollectMode::default(), CollectMode::Lenient);
    }
}
