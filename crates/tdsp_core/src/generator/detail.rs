//! Read-only detail rendering of a record's custom fields.
//!
//! # Responsibility
//! - Render known custom keys (simple rows, comparison targets, statistics,
//!   key findings) as display markup.
//!
//! # Invariants
//! - Records without a non-empty `custom_fields` mapping render nothing.
//! - All record-derived text passes through the escaping builder.
//! - Statistical values are displayed verbatim, never re-computed.

use crate::markup::{Element, Markup};
use crate::model::record::Record;
use crate::schema::registry::{LayerKind, SchemaRegistry};
use serde_json::{Map, Value};

/// Maximum number of result pairs shown per comparison target.
pub const COMPARISON_SUMMARY_PAIRS: usize = 3;
/// Threshold below which a p-value is highlighted as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

const SECTION_TITLE_STYLE: &str =
    "font-size:10px;color:var(--t3);text-transform:uppercase;letter-spacing:.06em;margin-bottom:6px";
const MONO_CELL_STYLE: &str = "font-family:var(--mono);font-size:11px";

/// (key, label, value color) for simple string-valued custom keys.
const SIMPLE_KEYS: [(&str, &str, Option<&str>); 3] = [
    ("evaluation_purpose", "Evaluation purpose", None),
    ("evaluation_priority", "Evaluation priority", Some("var(--accent)")),
    ("best_candidate", "Best candidate", Some("var(--pass)")),
];

/// Renders the custom-fields section of `record`'s detail view.
pub fn render_custom_fields_detail(registry: &SchemaRegistry, record: &Record) -> Markup {
    let Some(custom) = record.custom_fields().filter(|custom| !custom.is_empty()) else {
        return Markup::empty();
    };
    let layer = registry.layer(LayerKind::Custom);
    let category = record
        .category()
        .or_else(|| {
            registry
                .common_field("test_category")
                .and_then(|field| field.default_value.as_deref())
        })
        .unwrap_or_default();

    let mut body = vec![Element::new("div")
        .class("stit")
        .style(&format!("color:{}", layer.color))
        .text(format!("{} ({category})", layer.label))
        .render()];

    for (key, label, color) in SIMPLE_KEYS {
        let Some(value) = custom.get(key).filter(|value| !is_empty_value(value)) else {
            continue;
        };
        body.push(
            Element::new("div")
                .class("irow")
                .child(Element::new("span").class("ilbl").text(label))
                .child(
                    Element::new("span")
                        .class("ival")
                        .style(&color.map(|color| format!("color:{color}")).unwrap_or_default())
                        .text(display_value(value)),
                )
                .render(),
        );
    }

    if let Some(targets) = non_empty_array(custom, "comparison_targets") {
        body.push(comparison_table(targets));
    }
    if let Some(rows) = non_empty_array(custom, "statistical_analysis") {
        body.push(statistics_table(rows));
    }
    if let Some(findings) = non_empty_array(custom, "key_findings") {
        body.push(
            section(
                "Key findings",
                Markup::concat(findings.iter().map(|finding| {
                    Element::new("div")
                        .style("padding:4px 0;font-size:12px;color:var(--t2)")
                        .text(format!("• {}", display_value(finding)))
                        .render()
                })),
            ),
        );
    }

    Element::new("div")
        .class("dsec full")
        .style(&format!(
            "background:{};border-color:{}",
            layer.background, layer.border
        ))
        .children(body)
        .render()
}

/// Summarizes up to three `key: value` result pairs, with ` ...` when more exist.
pub fn comparison_summary(results: Option<&Value>) -> String {
    let Some(results) = results.and_then(Value::as_object) else {
        return String::new();
    };
    let mut summary = results
        .iter()
        .take(COMPARISON_SUMMARY_PAIRS)
        .map(|(key, value)| format!("{key}: {}", display_value(value)))
        .collect::<Vec<_>>()
        .join(", ");
    if results.len() > COMPARISON_SUMMARY_PAIRS {
        summary.push_str(" ...");
    }
    summary
}

/// Whether a p-value (number or numeric string) is below the significance level.
pub fn is_significant(p_value: Option<&Value>) -> bool {
    let parsed = match p_value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.is_some_and(|value| value < SIGNIFICANCE_LEVEL)
}

fn comparison_table(targets: &[Value]) -> Markup {
    let rows = targets.iter().map(|target| {
        Element::new("tr")
            .child(
                Element::new("td")
                    .style("color:var(--t1);font-size:12px")
                    .text(field_text(target, "name")),
            )
            .child(
                Element::new("td")
                    .style("color:var(--t3)")
                    .text(field_text(target, "category")),
            )
            .child(
                Element::new("td")
                    .style("font-family:var(--mono);font-size:10px;color:var(--t2)")
                    .text(comparison_summary(target.get("results"))),
            )
            .child(
                Element::new("td")
                    .style("color:var(--accent);font-size:11px")
                    .text(field_text(target, "label")),
            )
            .render()
    });
    section(
        &format!("Comparison targets ({})", targets.len()),
        table(&["Name", "Category", "Result summary", "Label"], rows),
    )
}

fn statistics_table(entries: &[Value]) -> Markup {
    let rows = entries.iter().map(|entry| {
        let p_color = if is_significant(entry.get("p_value")) {
            "var(--pass)"
        } else {
            "var(--t3)"
        };
        Element::new("tr")
            .child(
                Element::new("td")
                    .style("color:var(--t1)")
                    .text(field_text(entry, "factor")),
            )
            .child(
                Element::new("td")
                    .style(MONO_CELL_STYLE)
                    .text(field_text(entry, "r")),
            )
            .child(
                Element::new("td")
                    .style(MONO_CELL_STYLE)
                    .text(field_text(entry, "R2")),
            )
            .child(
                Element::new("td")
                    .style(&format!("{MONO_CELL_STYLE};color:{p_color}"))
                    .text(field_text(entry, "p_value")),
            )
            .child(
                Element::new("td")
                    .style("color:var(--t3)")
                    .text(field_text(entry, "context")),
            )
            .render()
    });
    section(
        "Statistical analysis",
        table(&["Factor", "r", "R²", "p-value", "Context"], rows),
    )
}

fn section(title: &str, content: impl Into<Markup>) -> Markup {
    Element::new("div")
        .style("margin-top:12px")
        .child(Element::new("div").style(SECTION_TITLE_STYLE).text(title))
        .child(content)
        .render()
}

fn table(headers: &[&str], rows: impl Iterator<Item = Markup>) -> Markup {
    Element::new("table")
        .class("mtbl")
        .child(
            Element::new("thead").child(
                Element::new("tr")
                    .children(headers.iter().map(|header| Element::new("th").text(header))),
            ),
        )
        .child(Element::new("tbody").children(rows))
        .render()
}

fn non_empty_array<'a>(custom: &'a Map<String, Value>, key: &str) -> Option<&'a [Value]> {
    custom
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .filter(|items| !items.is_empty())
}

fn field_text(entry: &Value, key: &str) -> String {
    entry.get(key).map(display_value).unwrap_or_default()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}
