use tdsp_core::{
    build_filter_options, filter_options, CategoryLookup, RegistryLoadError,
    RegistryValidationError, SchemaRegistry, DEFAULT_CATEGORY,
};

#[test]
fn active_category_returns_declared_catalog_in_order() {
    let registry = SchemaRegistry::builtin();
    for entry in registry.categories().active() {
        assert_eq!(registry.module_fields(&entry.name), entry.fields.as_slice());
    }

    let keys: Vec<&str> = registry
        .module_fields(DEFAULT_CATEGORY)
        .iter()
        .map(|field| field.key.as_str())
        .collect();
    assert_eq!(
        keys,
        vec![
            "evaluation_purpose",
            "evaluation_priority",
            "pcr_protocol",
            "comparison_targets",
            "design_factors",
            "statistical_analysis",
            "simulation_results",
            "failure_analysis",
            "best_candidate",
            "key_findings",
        ]
    );
}

#[test]
fn deactivated_categories_expose_no_fields() {
    let registry = SchemaRegistry::builtin();
    let deactivated: Vec<&str> = registry
        .categories()
        .entries()
        .iter()
        .filter(|entry| !entry.is_active())
        .map(|entry| entry.name.as_str())
        .collect();
    assert_eq!(deactivated, vec!["Optical Module", "Pressure Module"]);

    for name in deactivated {
        assert!(registry.module_fields(name).is_empty());
        assert!(matches!(
            registry.category(name),
            CategoryLookup::Deactivated(entry) if !entry.fields.is_empty()
        ));
    }
}

#[test]
fn unknown_category_is_empty_not_an_error() {
    let registry = SchemaRegistry::builtin();
    assert!(registry.module_fields("Fluidics Module").is_empty());
    assert_eq!(registry.category("Fluidics Module"), CategoryLookup::Unknown);
}

#[test]
fn result_summary_filter_options_are_ordered() {
    let registry = SchemaRegistry::builtin();
    assert_eq!(
        filter_options(&registry, "result_summary"),
        ["Pass", "Fail", "Conditional", "Informational"]
    );
    assert_eq!(
        build_filter_options(&registry, "result_summary").as_str(),
        "<option>Pass</option><option>Fail</option><option>Conditional</option><option>Informational</option>"
    );
}

#[test]
fn unknown_enum_set_yields_no_options() {
    let registry = SchemaRegistry::builtin();
    assert!(filter_options(&registry, "lab_site").is_empty());
    assert!(build_filter_options(&registry, "lab_site").is_empty());
}

#[test]
fn global_registry_is_shared_and_valid() {
    let first = SchemaRegistry::global();
    let second = SchemaRegistry::global();
    assert!(std::ptr::eq(first, second));
    first.validate().expect("global registry should validate");
}

#[test]
fn host_schema_must_validate() {
    let raw = SchemaRegistry::builtin()
        .to_json_pretty()
        .expect("serialize registry");
    let mut value: serde_json::Value = serde_json::from_str(&raw).expect("registry json");
    let fields = value["layers"]["common"]["fields"]
        .as_array_mut()
        .expect("common fields");
    for field in fields.iter_mut() {
        if field["key"] == "result_summary" {
            field["enum_key"] = serde_json::json!("result_summaries");
        }
    }

    let err = SchemaRegistry::from_json_str(&value.to_string()).expect_err("dangling enum");
    assert!(matches!(
        err,
        RegistryLoadError::Invalid(RegistryValidationError::UnknownEnumSet { .. })
    ));
}

#[test]
fn host_schema_round_trips_through_json() {
    let raw = SchemaRegistry::builtin()
        .to_json_pretty()
        .expect("serialize registry");
    let loaded = SchemaRegistry::from_json_str(&raw).expect("valid host schema");
    assert_eq!(loaded.version(), "1.0");
    assert_eq!(loaded.module_fields(DEFAULT_CATEGORY).len(), 10);
}
