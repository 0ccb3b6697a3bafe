use serde_json::json;
use tdsp_core::{Record, RecordValidationError, SchemaRegistry};

fn complete() -> serde_json::Value {
    json!({
        "test_id": "QB-FAN-2025-001",
        "project_name": "QB Project",
        "test_category": "Thermocycling Module",
        "test_type": "Comparative",
        "test_date": "2025-11-04",
        "result_summary": "Pass",
        "engineer_name": "J. Byeon",
        "tags": ["fan"]
    })
}

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).expect("record object")
}

#[test]
fn complete_record_validates() {
    let registry = SchemaRegistry::builtin();
    assert_eq!(record(complete()).validate(&registry), Ok(()));
    assert!(record(complete()).missing_required_fields(&registry).is_empty());
}

#[test]
fn blank_primary_key_is_reported_first() {
    let registry = SchemaRegistry::builtin();
    let mut value = complete();
    value["test_id"] = json!("   ");
    value["test_category"] = json!("Unknown Module");

    let record = record(value);
    assert_eq!(record.missing_required_fields(&registry), vec!["test_id"]);
    assert_eq!(
        record.validate(&registry),
        Err(RecordValidationError::MissingRequiredField("test_id".to_string()))
    );
}

#[test]
fn select_values_must_come_from_their_choices() {
    let registry = SchemaRegistry::builtin();
    let mut value = complete();
    value["result_summary"] = json!("Maybe");

    assert_eq!(
        record(value).validate(&registry),
        Err(RecordValidationError::InvalidEnumValue {
            field: "result_summary".to_string(),
            value: "Maybe".to_string(),
        })
    );
}

#[test]
fn blank_select_values_are_allowed() {
    let registry = SchemaRegistry::builtin();
    let mut value = complete();
    value["report_type"] = json!("");
    assert_eq!(record(value).validate(&registry), Ok(()));
}

#[test]
fn category_must_be_present_known_and_active() {
    let registry = SchemaRegistry::builtin();

    let mut missing = complete();
    missing
        .as_object_mut()
        .expect("object")
        .remove("test_category");
    assert_eq!(
        record(missing).validate(&registry),
        Err(RecordValidationError::MissingCategory)
    );

    let mut unknown = complete();
    unknown["test_category"] = json!("Acoustic Module");
    assert_eq!(
        record(unknown).validate(&registry),
        Err(RecordValidationError::UnknownCategory("Acoustic Module".to_string()))
    );

    let mut deactivated = complete();
    deactivated["test_category"] = json!("Optical Module");
    let err = record(deactivated)
        .validate(&registry)
        .expect_err("deactivated category");
    assert_eq!(
        err,
        RecordValidationError::DeactivatedCategory("Optical Module".to_string())
    );
    assert_eq!(err.to_string(), "category is not open for new entries: Optical Module");
}
