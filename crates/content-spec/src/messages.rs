use std::collections::BTreeMap;

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Status-keyed messages loaded from one message file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBlock {
    messages: BTreeMap<String, String>,
}

impl MessageBlock {
    /// Key used for a framework status, optionally narrowed by supplier status.
    pub fn status_key(framework_status: &str, supplier_status: Option<&str>) -> String {
        match supplier_status {
            Some(supplier_status) => format!("{framework_status}-{supplier_status}"),
            None => framework_status.to_string(),
        }
    }

    pub fn get(&self, framework_status: &str, supplier_status: Option<&str>) -> Option<&str> {
        self.messages
            .get(&Self::status_key(framework_status, supplier_status))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl FromIterator<(String, String)> for MessageBlock {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

/// Renders `{{placeholders}}` in a message against `context`.
///
/// Placeholders missing from the context render as empty strings.
pub fn render_message(template: &str, context: &Value) -> Result<String> {
    let mut engine = Handlebars::new();
    engine.register_escape_fn(handlebars::no_escape);
    Ok(engine.render_template(template, context)?)
}
