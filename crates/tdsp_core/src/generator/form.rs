//! Input form and filter option rendering.
//!
//! # Responsibility
//! - Render one labeled control per visible common field, then one per
//!   flexible slot, then the free-form custom-fields input.
//! - Render enum sets as filter `<option>` lists.
//!
//! # Invariants
//! - Hidden fields produce no control at all.
//! - Common fields are grouped two per row; a textarea field always gets a
//!   full-width row of its own.
//! - Every control id is `f_<key>`, matching the collector.

use crate::markup::{Element, Markup};
use crate::model::field::{control_id, FieldDescriptor, FormType, CUSTOM_FIELDS_KEY};
use crate::schema::registry::SchemaRegistry;

/// Label of the explicit "nothing selected" choice.
pub const UNSELECTED_OPTION_LABEL: &str = "Select";

const CUSTOM_FIELDS_LABEL: &str = "Custom Fields (JSON, category specific)";
const CUSTOM_FIELDS_PLACEHOLDER: &str =
    r#"{"evaluation_purpose":"...","comparison_targets":[...],"key_findings":[...]}"#;

/// One layout row of common-field controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow<'a> {
    /// Up to two single-line controls side by side.
    Pair(&'a FieldDescriptor, Option<&'a FieldDescriptor>),
    /// A textarea spanning the whole row.
    FullWidth(&'a FieldDescriptor),
}

/// Groups visible common fields into layout rows.
pub fn layout_rows(fields: &[FieldDescriptor]) -> Vec<FormRow<'_>> {
    let mut rows = Vec::new();
    let mut pending: Option<&FieldDescriptor> = None;
    for field in fields.iter().filter(|field| !field.is_hidden()) {
        if field.form_type == FormType::Textarea {
            if let Some(first) = pending.take() {
                rows.push(FormRow::Pair(first, None));
            }
            rows.push(FormRow::FullWidth(field));
            continue;
        }
        match pending.take() {
            Some(first) => rows.push(FormRow::Pair(first, Some(field))),
            None => pending = Some(field),
        }
    }
    if let Some(first) = pending {
        rows.push(FormRow::Pair(first, None));
    }
    rows
}

/// Renders the manual-entry form for `registry`.
pub fn build_manual_form(registry: &SchemaRegistry) -> Markup {
    let mut form = Markup::empty();

    for row in layout_rows(registry.common_fields()) {
        match row {
            FormRow::FullWidth(field) => form.push(
                Element::new("div")
                    .class("fg")
                    .child(field_label(field))
                    .child(
                        Element::new("textarea")
                            .class("fta")
                            .attr("id", field.control_id())
                            .style("font-family:var(--kr);font-size:12.5px")
                            .attr("placeholder", field.placeholder.as_deref().unwrap_or(""))
                            .flag("required", field.required),
                    ),
            ),
            FormRow::Pair(first, second) => form.push(
                Element::new("div")
                    .class("frow")
                    .child(common_control(registry, first))
                    .children(second.map(|field| common_control(registry, field))),
            ),
        }
    }

    for field in registry.flexible_fields() {
        let placeholder = field.placeholder.as_deref().unwrap_or("");
        let control = if field.is_array() {
            Element::new("textarea")
                .class("fta")
                .attr("id", field.control_id())
                .attr("placeholder", placeholder)
        } else {
            Element::void("input")
                .class("fi")
                .attr("id", field.control_id())
                .style("font-family:var(--mono);font-size:11.5px")
                .attr("placeholder", placeholder)
        };
        form.push(
            Element::new("div")
                .class("fg")
                .child(Element::new("label").class("fl").text(&field.description))
                .child(control),
        );
    }

    form.push(
        Element::new("div")
            .class("fg")
            .child(
                Element::new("label")
                    .class("fl")
                    .style("color:var(--accent)")
                    .text(CUSTOM_FIELDS_LABEL),
            )
            .child(
                Element::new("textarea")
                    .class("fta")
                    .attr("id", control_id(CUSTOM_FIELDS_KEY))
                    .style("min-height:90px")
                    .attr("placeholder", CUSTOM_FIELDS_PLACEHOLDER),
            ),
    );
    form
}

/// Values offered by a filter dropdown; empty for unknown sets.
pub fn filter_options<'r>(registry: &'r SchemaRegistry, enum_key: &str) -> &'r [String] {
    registry.enum_values(enum_key)
}

/// Renders a filter dropdown's `<option>` list.
pub fn build_filter_options(registry: &SchemaRegistry, enum_key: &str) -> Markup {
    Markup::concat(
        filter_options(registry, enum_key)
            .iter()
            .map(|value| Element::new("option").text(value).render()),
    )
}

fn field_label(field: &FieldDescriptor) -> Element {
    let marker = if field.required { " *" } else { "" };
    Element::new("label")
        .class("fl")
        .text(format!("{}{marker}", field.description))
}

fn common_control(registry: &SchemaRegistry, field: &FieldDescriptor) -> Element {
    let control = match field.form_type {
        FormType::Select => {
            let choices = field
                .enum_key
                .as_deref()
                .map(|enum_key| registry.enum_values(enum_key))
                .unwrap_or(&[]);
            Element::new("select")
                .class("fi")
                .attr("id", field.control_id())
                .flag("required", field.required)
                .child(
                    Element::new("option")
                        .attr("value", "")
                        .text(UNSELECTED_OPTION_LABEL),
                )
                .children(choices.iter().map(|choice| Element::new("option").text(choice)))
        }
        FormType::Date => Element::void("input")
            .attr("type", "date")
            .class("fi")
            .attr("id", field.control_id())
            .flag("required", field.required),
        _ => Element::void("input")
            .class("fi")
            .attr("id", field.control_id())
            .attr("placeholder", field.placeholder.as_deref().unwrap_or(""))
            .flag("required", field.required)
            .attr_opt("value", field.default_value.as_deref()),
    };
    Element::new("div")
        .class("fg")
        .child(field_label(field))
        .child(control)
}

#[cfg(test)]
mod tests {
    use super::{build_filter_options, build_manual_form, layout_rows, FormRow};
    use crate::model::field::{FieldDescriptor, FieldType, FormType};
    use crate::schema::registry::SchemaRegistry;

    fn keys(row: &FormRow<'_>) -> Vec<String> {
        match row {
            FormRow::Pair(first, second) => std::iter::once(*first)
                .chain(*second)
                .map(|field| field.key.clone())
                .collect(),
            FormRow::FullWidth(field) => vec![field.key.clone()],
        }
    }

    #[test]
    fn textarea_breaks_pending_pair() {
        let fields = vec![
            FieldDescriptor::new("a", FieldType::String, "a"),
            FieldDescriptor::new("b", FieldType::String, "b"),
            FieldDescriptor::new("c", FieldType::String, "c"),
            FieldDescriptor::new("notes", FieldType::Text, "n").form(FormType::Textarea),
            FieldDescriptor::new("hidden", FieldType::String, "h").form(FormType::Hidden),
            FieldDescriptor::new("d", FieldType::String, "d"),
        ];
        let rows = layout_rows(&fields);
        let grouped: Vec<Vec<String>> = rows.iter().map(keys).collect();
        assert_eq!(
            grouped,
            vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string()],
                vec!["notes".to_string()],
                vec!["d".to_string()],
            ]
        );
        assert!(matches!(rows[2], FormRow::FullWidth(_)));
    }

    #[test]
    fn builtin_form_renders_every_visible_control() {
        let registry = SchemaRegistry::builtin();
        let form = build_manual_form(&registry);
        for field in registry.common_fields() {
            let id = format!("id=\"f_{}\"", field.key);
            assert_eq!(form.as_str().contains(&id), !field.is_hidden(), "{}", field.key);
        }
        for field in registry.flexible_fields() {
            assert!(form.as_str().contains(&format!("id=\"f_{}\"", field.key)));
        }
        assert!(form.as_str().contains("id=\"f_custom_fields\""));
    }

    #[test]
    fn select_has_unselected_option_then_choices() {
        let form = build_manual_form(&SchemaRegistry::builtin());
        assert!(form.as_str().contains(
            r#"<select class="fi" id="f_result_summary" required><option value="">Select</option><option>Pass</option><option>Fail</option><option>Conditional</option><option>Informational</option></select>"#
        ));
    }

    #[test]
    fn text_input_prefills_default_and_marks_required() {
        let form = build_manual_form(&SchemaRegistry::builtin());
        assert!(form.as_str().contains(
            r#"<input class="fi" id="f_test_category" placeholder="Thermocycling Module" required value="Thermocycling Module">"#
        ));
        assert!(form.as_str().contains("Test module / area *"));
        assert!(form
            .as_str()
            .contains(r#"<input type="date" class="fi" id="f_test_date" required>"#));
    }

    #[test]
    fn flexible_array_slots_use_textarea() {
        let form = build_manual_form(&SchemaRegistry::builtin());
        assert!(form.as_str().contains(r#"<textarea class="fta" id="f_measurements""#));
        assert!(form.as_str().contains(r#"<input class="fi" id="f_dut_info""#));
        assert!(form.as_str().contains("{&quot;module&quot;"));
    }

    #[test]
    fn filter_options_follow_enum_order() {
        let registry = SchemaRegistry::builtin();
        assert_eq!(
            build_filter_options(&registry, "source_format").as_str(),
            "<option>PPT</option><option>Excel</option><option>Word</option>"
        );
        assert!(build_filter_options(&registry, "unknown").is_empty());
    }
}
