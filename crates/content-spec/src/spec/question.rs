use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Acceptable values for a `depends` rule: a single value or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Being {
    Many(Vec<Value>),
    One(Value),
}

impl Being {
    /// Whether `value` is one of the acceptable values.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Being::Many(values) => values.contains(value),
            Being::One(expected) => expected == value,
        }
    }
}

/// Visibility rule: the question is shown only when answer `on` is `being`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DependsRule {
    pub on: String,
    pub being: Being,
}

/// Named validation message attached to a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Validation {
    pub name: String,
    pub message: String,
}

/// Entry of a nested `questions` list: a question id to load, or an inline question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum QuestionRef {
    Id(String),
    Inline(Box<QuestionDef>),
}

/// Declarative shape of a question YAML file.
///
/// Question files carry no `id` of their own; the loader fills it in from the
/// file name. Fields without a dedicated slot are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<DependsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assurance_approach: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validations: Vec<Validation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<QuestionRef>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
