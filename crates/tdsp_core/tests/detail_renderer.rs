use serde_json::json;
use tdsp_core::{render_custom_fields_detail, Record, SchemaRegistry};

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).expect("record object")
}

#[test]
fn records_without_custom_fields_render_nothing() {
    let registry = SchemaRegistry::builtin();
    for value in [
        json!({"test_id": "QB-1"}),
        json!({"test_id": "QB-1", "custom_fields": {}}),
        json!({"test_id": "QB-1", "custom_fields": "not a mapping"}),
    ] {
        assert!(render_custom_fields_detail(&registry, &record(value)).is_empty());
    }
}

#[test]
fn header_names_layer_and_record_category() {
    let registry = SchemaRegistry::builtin();
    let html = render_custom_fields_detail(
        &registry,
        &record(json!({
            "test_category": "Pressure Module",
            "custom_fields": {"best_candidate": "Fan B"}
        })),
    )
    .into_string();

    assert!(html.starts_with(r#"<div class="dsec full" style="background:#1f0f05;border-color:#7c2d12">"#));
    assert!(html.contains("(Pressure Module)</div>"));
    assert!(html.contains(r#"<span class="ival" style="color:var(--pass)">Fan B</span>"#));
}

#[test]
fn header_falls_back_to_default_category() {
    let registry = SchemaRegistry::builtin();
    let html = render_custom_fields_detail(
        &registry,
        &record(json!({"custom_fields": {"evaluation_purpose": "Noise"}})),
    )
    .into_string();
    assert!(html.contains("(Thermocycling Module)</div>"));
    assert!(html.contains(r#"<span class="ilbl">Evaluation purpose</span>"#));
}

#[test]
fn record_text_is_escaped_everywhere() {
    let registry = SchemaRegistry::builtin();
    let html = render_custom_fields_detail(
        &registry,
        &record(json!({
            "test_category": "<b>TCM</b>",
            "custom_fields": {
                "evaluation_purpose": "<script>alert(1)</script>",
                "comparison_targets": [
                    {"name": "A & B", "category": "\"quoted\"", "results": {"<k>": "<v>"}}
                ],
                "key_findings": ["<img src=x>"]
            }
        })),
    )
    .into_string();

    assert!(!html.contains("<script>"));
    assert!(!html.contains("<img"));
    assert!(!html.contains("<b>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("A &amp; B"));
    assert!(html.contains("&quot;quoted&quot;"));
    assert!(html.contains("&lt;k&gt;: &lt;v&gt;"));
    assert!(html.contains("• &lt;img src=x&gt;"));
}

#[test]
fn comparison_targets_show_count_and_truncated_results() {
    let registry = SchemaRegistry::builtin();
    let html = render_custom_fields_detail(
        &registry,
        &record(json!({
            "custom_fields": {
                "comparison_targets": [
                    {
                        "name": "Fan A",
                        "category": "Current",
                        "results": {"noise": 52.1, "op_time": "41s", "hs_temp": 70, "power": 12},
                        "label": "baseline"
                    },
                    {"name": "Fan B"}
                ]
            }
        })),
    )
    .into_string();

    assert!(html.contains("Comparison targets (2)"));
    assert!(html.contains("noise: 52.1, op_time: 41s, hs_temp: 70 ..."));
    assert!(html.contains("<th>Result summary</th>"));
    assert!(!html.contains("power: 12"));
    assert!(!html.contains("Statistical analysis"));
}

#[test]
fn significant_p_values_are_highlighted() {
    let registry = SchemaRegistry::builtin();
    let html = render_custom_fields_detail(
        &registry,
        &record(json!({
            "custom_fields": {
                "statistical_analysis": [
                    {"factor": "PWM", "r": 0.91, "R2": 0.83, "p_value": 0.001, "context": "noise"},
                    {"factor": "Ambient", "r": 0.12, "R2": 0.01, "p_value": 0.4}
                ]
            }
        })),
    )
    .into_string();

    assert!(html.contains("<th>R²</th>"));
    assert!(html.contains(
        r#"<td style="font-family:var(--mono);font-size:11px;color:var(--pass)">0.001</td>"#
    ));
    assert!(html.contains(
        r#"<td style="font-family:var(--mono);font-size:11px;color:var(--t3)">0.4</td>"#
    ));
}

#[test]
fn empty_sections_are_skipped() {
    let registry = SchemaRegistry::builtin();
    let html = render_custom_fields_detail(
        &registry,
        &record(json!({
            "custom_fields": {
                "evaluation_priority": "",
                "comparison_targets": [],
                "key_findings": [],
                "unlisted_key": "ignored"
            }
        })),
    )
    .into_string();

    assert!(!html.is_empty());
    assert!(!html.contains("Evaluation priority"));
    assert!(!html.contains("Comparison targets"));
    assert!(!html.contains("Key findings"));
    assert!(!html.contains("ignored"));
}
