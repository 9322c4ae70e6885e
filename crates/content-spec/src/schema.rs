use std::collections::BTreeMap;

use schemars::schema_for;
use serde_json::{Value, json};

use crate::error::Result;
use crate::spec::{QuestionDef, SectionDef};

/// JSON Schemas for question, manifest and message files.
pub fn content_schema() -> Result<Value> {
    Ok(json!({
        "question": serde_json::to_value(schema_for!(QuestionDef))?,
        "manifest": serde_json::to_value(schema_for!(Vec<SectionDef>))?,
        "messages": serde_json::to_value(schema_for!(BTreeMap<String, String>))?,
    }))
}
