//! Core schema logic for TDSP (Test Data Standardization Platform).
//! This crate is the single source of truth for schema and record invariants.

pub mod config;
pub mod generator;
pub mod logging;
pub mod markup;
pub mod model;
pub mod schema;

pub use config::{ConfigError, CoreConfig};
pub use generator::collector::{
    collect_form, collect_form_with_mode, decode_json, split_list, CollectError, CollectMode,
    Collected, FieldFallback, FormControls, JsonDecode, JsonShape,
};
pub use generator::detail::{comparison_summary, is_significant, render_custom_fields_detail};
pub use generator::form::{
    build_filter_options, build_manual_form, filter_options, layout_rows, FormRow,
};
pub use generator::prompt::build_ai_prompt;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use markup::{escape, Element, Markup};
pub use model::category::{
    CategoryCatalog, CategoryEntry, CategoryLookup, CategoryStatus, DomainEntry,
};
pub use model::field::{control_id, FieldDescriptor, FieldType, FormType, CUSTOM_FIELDS_KEY};
pub use model::record::{Record, RecordValidationError, CATEGORY_FIELD_KEY};
pub use schema::builtin::{DEFAULT_CATEGORY, SCHEMA_VERSION};
pub use schema::registry::{
    Layer, LayerKind, Layers, RegistryLoadError, RegistryValidationError, SchemaRegistry,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
