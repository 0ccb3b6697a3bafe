//! Extraction prompt builder.
//!
//! # Responsibility
//! - Render the registry into instructions for the external extraction
//!   service.
//!
//! # Invariants
//! - Hidden common fields never appear; the schema version is named in the
//!   introduction instead.
//! - Deactivated categories contribute no custom-field block.
//! - Output is a pure function of the registry.

use crate::model::field::FieldDescriptor;
use crate::schema::registry::SchemaRegistry;
use log::debug;

const PROMPT_INTRO: &str = "You are a test data extraction assistant for the TDSP \
(Test Data Standardization Platform). Extract structured test data from the provided \
file content using the 3-Layer schema";

/// Builds the full extraction prompt for `registry`.
pub fn build_ai_prompt(registry: &SchemaRegistry) -> String {
    let common: Vec<String> = registry
        .common_fields()
        .iter()
        .filter(|field| !field.is_hidden())
        .map(|field| {
            let required = if field.required { " (required)" } else { "" };
            format!(
                "  \"{}\": \"{}{required} — {}\"",
                field.key,
                field.type_label(),
                field.description
            )
        })
        .collect();

    let flexible: Vec<String> = registry
        .flexible_fields()
        .iter()
        .map(|field| field_line(field, "  "))
        .collect();

    let mut custom = String::new();
    for entry in registry.categories().active() {
        let fields: Vec<String> = entry
            .fields
            .iter()
            .map(|field| field_line(field, "    "))
            .collect();
        custom.push_str(&format!(
            "\nFor {} tests, include \"custom_fields\" with ANY of these that apply:\n{{\n  \"custom_fields\": {{\n{}\n  }}\n}}\n",
            entry.name,
            fields.join(",\n")
        ));
    }

    let rules: Vec<String> = registry
        .extraction_rules()
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect();

    let prompt = format!(
        "{PROMPT_INTRO} (version {}) and return ONLY valid JSON.\n\n=== LAYER 1: COMMON ===\n{{\n{}\n}}\n\n=== LAYER 2: FLEXIBLE (free-form JSON) ===\n{{\n{}\n}}\n\n=== LAYER 3: CUSTOM FIELDS (test-category specific) ===\n{custom}\nRULES:\n{}",
        registry.version(),
        common.join(",\n"),
        flexible.join(",\n"),
        rules.join("\n")
    );
    debug!(
        "event=prompt_built module=generator status=ok version={} chars={}",
        registry.version(),
        prompt.chars().count()
    );
    prompt
}

fn field_line(field: &FieldDescriptor, indent: &str) -> String {
    format!(
        "{indent}\"{}\": \"{} — {}\"",
        field.key,
        field.type_label(),
        field.description
    )
}

#[cfg(test)]
mod tests {
    use super::build_ai_prompt;
    use crate::schema::registry::SchemaRegistry;

    #[test]
    fn common_fields_carry_required_marker() {
        let prompt = build_ai_prompt(&SchemaRegistry::builtin());
        assert!(prompt.contains(r#"  "test_id": "String (PK) (required) — Unique test identifier""#));
        assert!(prompt.contains(r#"  "project_phase": "String — Project phase (Alpha, Beta1, ...)""#));
    }

    #[test]
    fn flexible_fields_have_no_required_marker() {
        let prompt = build_ai_prompt(&SchemaRegistry::builtin());
        let flexible = prompt
            .split("=== LAYER 2")
            .nth(1)
            .and_then(|rest| rest.split("=== LAYER 3").next())
            .expect("flexible section");
        assert!(flexible.contains(r#""measurements": "JSON Array — "#));
        assert!(!flexible.contains("(required)"));
    }

    #[test]
    fn hidden_fields_are_omitted_and_version_is_named() {
        let prompt = build_ai_prompt(&SchemaRegistry::builtin());
        assert!(!prompt.contains("schema_version"));
        assert!(prompt.contains("using the 3-Layer schema (version 1.0) and return ONLY valid JSON."));
        assert!(prompt.contains("Key conclusions and remarks\"\n}"));
    }

    #[test]
    fn sections_appear_in_order() {
        let prompt = build_ai_prompt(&SchemaRegistry::builtin());
        let positions: Vec<usize> = [
            "You are a test data extraction assistant",
            "=== LAYER 1: COMMON ===",
            "=== LAYER 2: FLEXIBLE",
            "=== LAYER 3: CUSTOM FIELDS",
            "For Thermocycling Module tests",
            "RULES:",
        ]
        .iter()
        .map(|marker| prompt.find(marker).expect("marker present"))
        .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn rules_section_lists_registry_rules() {
        let registry = SchemaRegistry::builtin();
        let prompt = build_ai_prompt(&registry);
        for rule in registry.extraction_rules() {
            assert!(prompt.contains(&format!("- {rule}")));
        }
        assert!(prompt.ends_with("- One JSON object per file (or array if truly distinct tests)"));
    }

    #[test]
    fn is_deterministic() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(build_ai_prompt(&registry), build_ai_prompt(&registry));
    }
}
