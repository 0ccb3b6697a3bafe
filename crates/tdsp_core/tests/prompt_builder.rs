use tdsp_core::{build_ai_prompt, SchemaRegistry};

#[test]
fn prompt_contains_every_visible_common_and_flexible_key() {
    let registry = SchemaRegistry::builtin();
    let prompt = build_ai_prompt(&registry);

    for field in registry.common_fields().iter().filter(|field| !field.is_hidden()) {
        assert!(
            prompt.contains(&format!("\"{}\":", field.key)),
            "missing common key {}",
            field.key
        );
    }
    for field in registry.flexible_fields() {
        assert!(
            prompt.contains(&format!("\"{}\":", field.key)),
            "missing flexible key {}",
            field.key
        );
    }
}

#[test]
fn prompt_never_mentions_hidden_fields() {
    let registry = SchemaRegistry::builtin();
    let prompt = build_ai_prompt(&registry);
    let hidden: Vec<&str> = registry
        .common_fields()
        .iter()
        .filter(|field| field.is_hidden())
        .map(|field| field.key.as_str())
        .collect();
    assert!(!hidden.is_empty());
    for key in hidden {
        assert!(!prompt.contains(key), "hidden key leaked: {key}");
    }
}

#[test]
fn prompt_lists_only_active_category_catalogs() {
    let registry = SchemaRegistry::builtin();
    let prompt = build_ai_prompt(&registry);

    assert!(prompt.contains(
        "For Thermocycling Module tests, include \"custom_fields\" with ANY of these that apply:"
    ));
    assert!(prompt.contains("    \"key_findings\": \"Array<String> — List of key findings\""));
    assert!(!prompt.contains("Optical Module"));
    assert!(!prompt.contains("crosstalk_matrix"));
    assert!(!prompt.contains("Pressure Module"));
}

#[test]
fn prompt_closes_with_output_rules() {
    let prompt = build_ai_prompt(&SchemaRegistry::builtin());
    let rules = prompt.split("RULES:\n").nth(1).expect("rules section");
    assert!(rules.contains("- Return ONLY valid JSON, no markdown fences"));
    assert!(rules.lines().all(|line| line.starts_with("- ")));
}
