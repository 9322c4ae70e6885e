use serde_json::{Value, json};

use content_spec::{Manifest, Question, Section};

fn question_json(question: &Question) -> Value {
    json!({
        "id": question.id(),
        "number": question.number(),
        "type": question.kind().name(),
        "label": question.label(),
        "optional": question.is_optional(),
        "fields": question.fields(None),
    })
}

fn section_json(section: &Section) -> Value {
    json!({
        "id": section.id(),
        "name": section.name(),
        "editable": section.editable(),
        "description": section.description(),
        "questions": section.questions().iter().map(question_json).collect::<Vec<_>>(),
        "field_names": section.get_field_names(),
    })
}

pub fn manifest_json(manifest: &Manifest) -> Value {
    json!({
        "sections": manifest.sections().iter().map(section_json).collect::<Vec<_>>(),
    })
}

/// Human-friendly listing of sections and their numbered questions.
pub fn manifest_text(manifest: &Manifest) -> String {
    if manifest.is_empty() {
        return "No sections apply to these answers.".to_string();
    }

    let mut lines = Vec::new();
    for section in manifest.sections() {
        let mut header = format!("Section: {} ({})", section.name(), section.id());
        if !section.editable() {
            header.push_str(" [read-only]");
        }
        lines.push(header);
        if let Some(description) = section.description() {
            lines.push(format!("  {description}"));
        }
        for question in section.questions() {
            let number = question
                .number()
                .map(|number| format!("{number}."))
                .unwrap_or_else(|| "-".to_string());
            let mut entry = format!("  {number} {} ({})", question.id(), question.kind().name());
            if let Some(label) = question.label() {
                entry.push_str(&format!(" - {label}"));
            }
            if question.is_optional() {
                entry.push_str(" [optional]");
            }
            lines.push(entry);
        }
    }
    lines.join("\n")
}
