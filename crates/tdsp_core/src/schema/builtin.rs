//! Built-in TDSP schema definition (v1.0).
//!
//! Extending the schema:
//! - new test type: append to the `test_type` enum set;
//! - new common field: append to the common layer;
//! - new category: add a `CategoryEntry` (start it `Deactivated` until the
//!   extraction prompt has been tuned for it).

use crate::model::category::{CategoryCatalog, CategoryEntry, CategoryStatus, DomainEntry};
use crate::model::field::{FieldDescriptor, FieldType, FormType};
use crate::schema::registry::{Layer, Layers, SchemaRegistry};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: &str = "1.0";

/// Category used by the common layer's default `test_category`.
pub const DEFAULT_CATEGORY: &str = "Thermocycling Module";

pub(crate) fn tdsp_v1() -> SchemaRegistry {
    SchemaRegistry::from_parts(
        SCHEMA_VERSION.to_string(),
        enums(),
        Layers {
            common: common_layer(),
            flexible: flexible_layer(),
            custom: custom_layer(),
        },
        CategoryCatalog::new(categories()),
        domains(),
        extraction_rules(),
    )
}

fn enums() -> BTreeMap<String, Vec<String>> {
    let sets: [(&str, &[&str]); 4] = [
        (
            "test_type",
            &[
                "Comparative",
                "Performance",
                "Functional",
                "Reliability",
                "Safety",
                "EMC",
                "Environmental",
                "Other",
            ],
        ),
        ("result_summary", &["Pass", "Fail", "Conditional", "Informational"]),
        (
            "report_type",
            &["Detailed Report", "Monthly Report", "Summary", "Raw Data"],
        ),
        ("source_format", &["PPT", "Excel", "Word"]),
    ];
    sets.iter()
        .map(|(key, values)| {
            (
                (*key).to_string(),
                values.iter().map(|value| (*value).to_string()).collect(),
            )
        })
        .collect()
}

fn common_layer() -> Layer {
    Layer {
        label: "Layer 1 — Common".to_string(),
        color: "var(--blue)".to_string(),
        background: "#0a1530".to_string(),
        border: "#1e3a5f".to_string(),
        description: "Shared by every test; the basis for search and filtering. Fixed.".to_string(),
        fields: vec![
            FieldDescriptor::new("test_id", FieldType::String, "Unique test identifier")
                .primary_key()
                .required()
                .placeholder("QB-FAN-2025-001"),
            FieldDescriptor::new("project_name", FieldType::String, "Project name")
                .required()
                .placeholder("QB Project"),
            FieldDescriptor::new("test_category", FieldType::String, "Test module / area")
                .required()
                .placeholder(DEFAULT_CATEGORY)
                .default_value(DEFAULT_CATEGORY),
            FieldDescriptor::new("test_type", FieldType::Enum, "Test type")
                .required()
                .select("test_type"),
            FieldDescriptor::new("test_date", FieldType::Date, "YYYY-MM-DD")
                .required()
                .form(FormType::Date),
            FieldDescriptor::new("result_summary", FieldType::Enum, "Result summary")
                .required()
                .select("result_summary"),
            FieldDescriptor::new("engineer_name", FieldType::String, "Responsible engineer")
                .required()
                .placeholder("Jongtack Byeon"),
            FieldDescriptor::new("report_type", FieldType::Enum, "Report type").select("report_type"),
            FieldDescriptor::new("project_phase", FieldType::String, "Project phase (Alpha, Beta1, ...)")
                .placeholder("Beta1"),
            FieldDescriptor::new("original_files", FieldType::StringArray, "Source file names (comma separated)")
                .placeholder("Report.pptx, Data.xlsx"),
            FieldDescriptor::new("source_format", FieldType::String, "Source format").select("source_format"),
            FieldDescriptor::new("tags", FieldType::StringArray, "Search tags (comma separated)")
                .placeholder("fan-noise, MHS, heatsink"),
            FieldDescriptor::new("notes", FieldType::Text, "Key conclusions and remarks")
                .placeholder("Key conclusions and remarks...")
                .form(FormType::Textarea),
            FieldDescriptor::new("schema_version", FieldType::String, "Schema version")
                .default_value(SCHEMA_VERSION)
                .form(FormType::Hidden),
        ],
    }
}

fn flexible_layer() -> Layer {
    Layer {
        label: "Layer 2 — Flexible".to_string(),
        color: "var(--purple)".to_string(),
        background: "#1a1230".to_string(),
        border: "#581c87".to_string(),
        description: "Always present; inner JSON structure is free and varies per test."
            .to_string(),
        fields: vec![
            FieldDescriptor::new(
                "dut_info",
                FieldType::JsonObject,
                "Device under test: module, heatsink_design, fan_model, ...",
            )
            .placeholder(r#"{"module":"Thermocycling Module","heatsink_design":"Fin Type"}"#)
            .form(FormType::Json),
            FieldDescriptor::new(
                "test_conditions",
                FieldType::JsonObject,
                "Test conditions: unit_level, software, protocol, pwm_control, ...",
            )
            .placeholder(r#"{"unit_level":"Module","software":"BlinkX 2.0","pwm_control":"Feedback"}"#)
            .form(FormType::Json),
            FieldDescriptor::new(
                "measurements",
                FieldType::JsonArray,
                "Measurements: [{item, value, unit, condition, spec, verdict}]",
            )
            .placeholder(
                r#"[{"item":"Noise Level","value":52.61,"unit":"dB","condition":"PWM50 avg","verdict":"Pass"}]"#,
            )
            .form(FormType::JsonArray),
        ],
    }
}

fn custom_layer() -> Layer {
    Layer {
        label: "Layer 3 — Custom fields".to_string(),
        color: "var(--accent)".to_string(),
        background: "#1f0f05".to_string(),
        border: "#7c2d12".to_string(),
        description: "Category-specific fields; each module uses its own custom_fields."
            .to_string(),
        fields: Vec::new(),
    }
}

fn categories() -> Vec<CategoryEntry> {
    vec![
        CategoryEntry {
            name: DEFAULT_CATEGORY.to_string(),
            label: "TCM (Thermocycling Module)".to_string(),
            icon: "🔥".to_string(),
            status: CategoryStatus::Active,
            fields: vec![
                FieldDescriptor::new("evaluation_purpose", FieldType::String, "Purpose of the evaluation"),
                FieldDescriptor::new(
                    "evaluation_priority",
                    FieldType::String,
                    "Evaluation priority (e.g. Noise → OP time → HS temp)",
                ),
                FieldDescriptor::new(
                    "pcr_protocol",
                    FieldType::JsonObject,
                    "PCR protocol: targets, cycles, pre_heating",
                ),
                FieldDescriptor::new(
                    "comparison_targets",
                    FieldType::JsonArray,
                    "Compared candidates: [{name, category, results: {...}, label}]",
                ),
                FieldDescriptor::new(
                    "design_factors",
                    FieldType::JsonObject,
                    "Design factors: heat_capacity, thermal_resistance, ...",
                ),
                FieldDescriptor::new(
                    "statistical_analysis",
                    FieldType::JsonArray,
                    "Statistical analysis: [{factor, r, R2, p_value, context}]",
                ),
                FieldDescriptor::new(
                    "simulation_results",
                    FieldType::JsonObject,
                    "CFD / simulation: method, peltier_load, results",
                ),
                FieldDescriptor::new(
                    "failure_analysis",
                    FieldType::JsonObject,
                    "Failure analysis (if any): root_cause, component",
                ),
                FieldDescriptor::new("best_candidate", FieldType::String, "Finally selected candidate"),
                FieldDescriptor::new("key_findings", FieldType::StringArray, "List of key findings"),
            ],
        },
        CategoryEntry {
            name: "Optical Module".to_string(),
            label: "Optical Module".to_string(),
            icon: "🔬".to_string(),
            status: CategoryStatus::Deactivated,
            fields: vec![
                FieldDescriptor::new(
                    "channels",
                    FieldType::JsonArray,
                    "Per-channel data: [{ch, wavelength_nm, led_power_mW, snr}]",
                ),
                FieldDescriptor::new("detector_type", FieldType::String, "Detector type"),
                FieldDescriptor::new("calibration_method", FieldType::String, "Calibration method"),
                FieldDescriptor::new("crosstalk_matrix", FieldType::JsonArray, "Crosstalk matrix"),
                FieldDescriptor::new("optical_path_length_mm", FieldType::Number, "Optical path length (mm)"),
            ],
        },
        CategoryEntry {
            name: "Pressure Module".to_string(),
            label: "Pressure Module".to_string(),
            icon: "🔧".to_string(),
            status: CategoryStatus::Deactivated,
            fields: vec![
                FieldDescriptor::new("pressure_range", FieldType::String, "Pressure range"),
                FieldDescriptor::new("accuracy", FieldType::String, "Accuracy"),
                FieldDescriptor::new("response_time", FieldType::String, "Response time"),
                FieldDescriptor::new("seal_test_result", FieldType::String, "Seal test result"),
            ],
        },
    ]
}

fn domains() -> Vec<DomainEntry> {
    let planned = |key: &str, label: &str, icon: &str, description: &str, entities: &[&str]| {
        DomainEntry {
            key: key.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
            active: false,
            description: description.to_string(),
            planned_entities: entities.iter().map(|entity| (*entity).to_string()).collect(),
        }
    };

    vec![
        DomainEntry {
            key: "test_data".to_string(),
            label: "Test data".to_string(),
            icon: "🧪".to_string(),
            active: true,
            description: "Live: test result standardization and management".to_string(),
            planned_entities: Vec::new(),
        },
        planned(
            "project_management",
            "Project management",
            "📋",
            "Projects, assignees, tasks and issue tracking",
            &["projects", "tasks", "issues", "milestones"],
        ),
        planned(
            "report_management",
            "Report management",
            "📝",
            "Weekly and monthly report records",
            &["weekly_reports", "monthly_reports"],
        ),
        planned(
            "meeting_management",
            "Meeting management",
            "🤝",
            "Meeting minutes, action items and follow-up tracking",
            &["meetings", "action_items", "decisions"],
        ),
    ]
}

fn extraction_rules() -> Vec<String> {
    [
        r#"Use "Comparative" as test_type when multiple designs/fans/conditions are compared"#,
        "Extract comparison tables into custom_fields.comparison_targets array",
        "Extract statistical data (correlation, regression, p-values) into statistical_analysis",
        "Include speaker notes conclusions in notes field (Korean OK)",
        "test_date from document date",
        "For Monthly Reports, focus on the QB Project section",
        "Return ONLY valid JSON, no markdown fences",
        "One JSON object per file (or array if truly distinct tests)",
    ]
    .iter()
    .map(|rule| (*rule).to_string())
    .collect()
}
