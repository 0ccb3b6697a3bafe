//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose schema, generator and validation use cases to Dart via FRB.
//! - Keep error semantics simple: strings and flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All calls read the process-wide schema registry.
//! - Markup returned here is already escaped and safe to inject.

use log::warn;
use std::collections::HashMap;
use tdsp_core::{
    build_ai_prompt, build_filter_options, build_manual_form, collect_form_with_mode,
    core_version as core_version_inner, filter_options as filter_options_inner,
    init_logging as init_logging_inner, ping as ping_inner, render_custom_fields_detail,
    CategoryLookup, CollectMode, FieldDescriptor, Record, SchemaRegistry,
};

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Version of the active schema registry.
#[flutter_rust_bridge::frb(sync)]
pub fn schema_version() -> String {
    SchemaRegistry::global().version().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Field declaration projected for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub key: String,
    /// Human-readable type label (`Array<String>`, `String (PK)`, ...).
    pub type_label: String,
    pub description: String,
    pub required: bool,
}

/// Category lookup result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFieldsResponse {
    /// `active|deactivated|unknown`.
    pub status: String,
    /// Declared fields; empty unless `status == "active"`.
    pub fields: Vec<FieldInfo>,
}

/// Returns the custom-field catalog of `category`.
///
/// # FFI contract
/// - Unknown and deactivated categories yield an empty field list, not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn module_fields(category: String) -> ModuleFieldsResponse {
    let lookup = SchemaRegistry::global().category(&category);
    let status = match lookup {
        CategoryLookup::Active(_) => "active",
        CategoryLookup::Deactivated(_) => "deactivated",
        CategoryLookup::Unknown => "unknown",
    };
    ModuleFieldsResponse {
        status: status.to_string(),
        fields: lookup.fields().iter().map(to_field_info).collect(),
    }
}

/// Extraction prompt for the external extraction service.
#[flutter_rust_bridge::frb(sync)]
pub fn ai_prompt() -> String {
    build_ai_prompt(SchemaRegistry::global())
}

/// Manual-entry form markup.
#[flutter_rust_bridge::frb(sync)]
pub fn manual_form_html() -> String {
    build_manual_form(SchemaRegistry::global()).into_string()
}

/// Ordered choices of one enum set; empty for unknown sets.
#[flutter_rust_bridge::frb(sync)]
pub fn filter_options(enum_key: String) -> Vec<String> {
    filter_options_inner(SchemaRegistry::global(), enum_key.trim()).to_vec()
}

/// `<option>` markup for one enum set.
#[flutter_rust_bridge::frb(sync)]
pub fn filter_options_html(enum_key: String) -> String {
    build_filter_options(SchemaRegistry::global(), enum_key.trim()).into_string()
}

/// One rendered control value as read by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControlValue {
    /// Control id (`f_<key>`).
    pub id: String,
    pub value: String,
}

/// Collection response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectResponse {
    pub ok: bool,
    /// Collected record as compact JSON; empty on failure.
    pub record_json: String,
    /// Keys whose malformed JSON was replaced by an empty container.
    pub fallback_keys: Vec<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Collects control values into a record.
///
/// # FFI contract
/// - `strict == false` never fails; malformed nested JSON is reported in
///   `fallback_keys`.
/// - `strict == true` fails on the first malformed nested-JSON control.
#[flutter_rust_bridge::frb(sync)]
pub fn collect_form(controls: Vec<FormControlValue>, strict: bool) -> CollectResponse {
    let controls: HashMap<String, String> = controls
        .into_iter()
        .map(|control| (control.id, control.value))
        .collect();
    let mode = if strict {
        CollectMode::Strict
    } else {
        CollectMode::Lenient
    };

    let collected = match collect_form_with_mode(SchemaRegistry::global(), &controls, mode) {
        Ok(collected) => collected,
        Err(err) => return CollectResponse::failure(format!("collect_form failed: {err}")),
    };
    let record_json = match serde_json::to_string(&collected.record) {
        Ok(json) => json,
        Err(err) => return CollectResponse::failure(format!("collect_form failed: {err}")),
    };
    let fallback_keys: Vec<String> = collected
        .fallbacks
        .into_iter()
        .map(|fallback| fallback.key)
        .collect();
    let message = if fallback_keys.is_empty() {
        "Record collected.".to_string()
    } else {
        format!(
            "Record collected with {} empty fallback(s).",
            fallback_keys.len()
        )
    };
    CollectResponse {
        ok: true,
        record_json,
        fallback_keys,
        message,
    }
}

impl CollectResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_json: String::new(),
            fallback_keys: Vec::new(),
            message: message.into(),
        }
    }
}

/// Renders the custom-fields detail markup of a JSON record.
///
/// # FFI contract
/// - Unparseable input renders nothing and is logged without content.
#[flutter_rust_bridge::frb(sync)]
pub fn custom_fields_detail_html(record_json: String) -> String {
    match Record::from_json_str(&record_json) {
        Ok(record) => render_custom_fields_detail(SchemaRegistry::global(), &record).into_string(),
        Err(err) => {
            warn!(
                "event=detail_render module=ffi status=skipped reason=invalid_record line={} column={}",
                err.line(),
                err.column()
            );
            String::new()
        }
    }
}

/// Generic validation response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    pub ok: bool,
    /// Required keys whose values are blank.
    pub missing_fields: Vec<String>,
    pub message: String,
}

/// Checks a JSON record for completeness against the active registry.
#[flutter_rust_bridge::frb(sync)]
pub fn validate_record(record_json: String) -> ValidationResponse {
    let registry = SchemaRegistry::global();
    let record = match Record::from_json_str(&record_json) {
        Ok(record) => record,
        Err(err) => {
            return ValidationResponse {
                ok: false,
                missing_fields: Vec::new(),
                message: format!("validate_record failed: {err}"),
            }
        }
    };
    let missing_fields = record
        .missing_required_fields(registry)
        .into_iter()
        .map(str::to_string)
        .collect();
    match record.validate(registry) {
        Ok(()) => ValidationResponse {
            ok: true,
            missing_fields,
            message: "Record is complete.".to_string(),
        },
        Err(err) => ValidationResponse {
            ok: false,
            missing_fields,
            message: err.to_string(),
        },
    }
}

fn to_field_info(field: &FieldDescriptor) -> FieldInfo {
    FieldInfo {
        key: field.key.clone(),
        type_label: field.type_label(),
        description: field.description.clone(),
        required: field.required,
    }
}
