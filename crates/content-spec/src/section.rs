use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::convert::{convert_to_boolean, convert_to_number, expand_pricing_field};
use crate::error::Result;
use crate::question::{PRICE_FIELDS, Question, QuestionKind};
use crate::submission::FormSubmission;

const ASSURANCE_SUFFIX: &str = "--assurance";
const SERVICE_TYPES: &str = "serviceTypes";
const PRICE_STRING: &str = "priceString";
const DEFAULT_ERROR_MESSAGE: &str = "There was a problem with the answer to this question";

/// Template-ready description of one validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorMessage {
    pub input_name: String,
    pub question: Option<String>,
    pub message: String,
}

/// Ordered group of questions shown together on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    id: String,
    name: String,
    editable: bool,
    description: Option<String>,
    questions: Vec<Question>,
}

impl Section {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        editable: bool,
        description: Option<String>,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            editable,
            description,
            questions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub(crate) fn questions_mut(&mut self) -> &mut [Question] {
        &mut self.questions
    }

    /// Same section metadata over a different question list.
    pub(crate) fn with_questions(&self, questions: Vec<Question>) -> Section {
        Section {
            id: self.id.clone(),
            name: self.name.clone(),
            editable: self.editable,
            description: self.description.clone(),
            questions,
        }
    }

    /// Leaf field ids of every question, optionally restricted to `kind`.
    pub fn get_question_ids(&self, kind: Option<&QuestionKind>) -> Vec<&str> {
        self.questions
            .iter()
            .flat_map(|question| question.fields(kind))
            .collect()
    }

    /// Question (top level or nested) with the given id.
    pub fn get_question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find_map(|question| question.find(id))
    }

    /// Form input names for this section.
    ///
    /// Kinds with expanded fields (pricing) contribute their fixed inputs after
    /// all plain fields.
    pub fn get_field_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        let mut expanded: Vec<&str> = Vec::new();
        for id in self.get_question_ids(None) {
            match self.kind_of(id).and_then(QuestionKind::expanded_fields) {
                Some(fields) => {
                    for &field in fields {
                        if !expanded.contains(&field) {
                            expanded.push(field);
                        }
                    }
                }
                None => names.push(id),
            }
        }
        names.extend(expanded);
        names
    }

    fn kind_of(&self, key: &str) -> Option<&QuestionKind> {
        self.get_question(key).map(Question::kind)
    }

    pub fn is_list(&self, key: &str) -> bool {
        key == SERVICE_TYPES || matches!(self.kind_of(key), Some(QuestionKind::List))
    }

    pub fn is_boolean(&self, key: &str) -> bool {
        matches!(self.kind_of(key), Some(QuestionKind::Boolean))
    }

    pub fn is_numeric(&self, key: &str) -> bool {
        matches!(self.kind_of(key), Some(QuestionKind::Numeric))
    }

    pub fn is_pricing(&self, key: &str) -> bool {
        matches!(self.kind_of(key), Some(QuestionKind::Pricing))
    }

    pub fn is_upload(&self, key: &str) -> bool {
        matches!(self.kind_of(key), Some(QuestionKind::Upload))
    }

    pub fn has_assurance(&self, key: &str) -> bool {
        self.get_question(key).is_some_and(Question::has_assurance)
    }

    /// Extracts typed answers for this section's questions from a form post.
    ///
    /// Submitted keys that are not questions of this section are ignored.
    pub fn get_data(&self, submission: &FormSubmission) -> Result<Map<String, Value>> {
        let declared = self.get_question_ids(None);
        let mut data = Map::new();

        for key in declared.iter().copied() {
            if !submission.contains(key) || data.contains_key(key) {
                continue;
            }

            let value = if self.is_list(key) {
                Value::Array(
                    submission
                        .all(key)
                        .iter()
                        .cloned()
                        .map(Value::String)
                        .collect(),
                )
            } else if self.is_pricing(key) {
                data.extend(expand_pricing_field(submission.all(key))?);
                continue;
            } else if self.is_upload(key) {
                continue;
            } else {
                let Some(raw) = submission.first(key) else {
                    continue;
                };
                if self.is_boolean(key) {
                    convert_to_boolean(raw)
                } else if self.is_numeric(key) {
                    convert_to_number(raw)
                } else {
                    Value::String(raw.to_string())
                }
            };

            let value = if self.has_assurance(key) {
                let assurance = submission
                    .first(&format!("{key}{ASSURANCE_SUFFIX}"))
                    .map(|assurance| Value::String(assurance.to_string()))
                    .unwrap_or(Value::Null);
                json!({ "value": value, "assurance": assurance })
            } else {
                value
            };
            data.insert(key.to_string(), value);
        }

        for key in submission.keys() {
            let Some(root) = key.strip_suffix(ASSURANCE_SUFFIX) else {
                continue;
            };
            if declared.contains(&root) && !data.contains_key(root) {
                let assurance = submission
                    .first(key)
                    .map(|assurance| Value::String(assurance.to_string()))
                    .unwrap_or(Value::Null);
                data.insert(root.to_string(), json!({ "assurance": assurance }));
            }
        }

        Ok(data)
    }

    /// Whether saving `update` over `existing` is needed.
    ///
    /// True when any value changes, or when a field of this section has never
    /// been saved at all. A key absent from `existing` compares as `null`.
    pub fn has_changes_to_save(&self, existing: &Value, update: &Map<String, Value>) -> bool {
        update
            .iter()
            .any(|(key, value)| existing.get(key).unwrap_or(&Value::Null) != value)
            || self
                .get_field_names()
                .into_iter()
                .any(|field| existing.get(field).is_none())
    }

    /// Maps `{question_id: message_key}` errors to template-ready messages.
    pub fn get_error_messages(
        &self,
        errors: &BTreeMap<String, String>,
        lot: &str,
    ) -> BTreeMap<String, ErrorMessage> {
        let mut messages = BTreeMap::new();
        for (key, message_key) in errors {
            let (mut input_name, message_key, question) = if key == SERVICE_TYPES {
                (
                    format!("{SERVICE_TYPES}{lot}"),
                    message_key.as_str(),
                    self.get_question(SERVICE_TYPES),
                )
            } else if PRICE_FIELDS.contains(&key.as_str()) {
                (
                    PRICE_STRING.to_string(),
                    pricing_message_key(key, message_key),
                    self.pricing_question(),
                )
            } else {
                (key.clone(), message_key.as_str(), self.get_question(key))
            };

            // Applies on top of the lot and pricing renames.
            if message_key == "assurance_required" {
                input_name.push_str(ASSURANCE_SUFFIX);
            }

            let message = question
                .and_then(|question| question.validation_message(message_key))
                .unwrap_or(DEFAULT_ERROR_MESSAGE)
                .to_string();
            messages.insert(
                input_name.clone(),
                ErrorMessage {
                    input_name,
                    question: question.and_then(Question::label).map(String::from),
                    message,
                },
            );
        }
        messages
    }

    fn pricing_question(&self) -> Option<&Question> {
        self.get_question_ids(Some(&QuestionKind::Pricing))
            .first()
            .and_then(|id| self.get_question(id))
    }

    /// Flattens `{value, assurance}` answers back into `field` and `field--assurance`.
    pub fn unformat_data(data: &Map<String, Value>) -> Map<String, Value> {
        let mut flat = Map::new();
        for (key, value) in data {
            match value {
                Value::Object(answer) if is_assured_answer(answer) => {
                    if let Some(inner) = answer.get("value") {
                        flat.insert(key.clone(), inner.clone());
                    }
                    if let Some(assurance) = answer.get("assurance") {
                        flat.insert(format!("{key}{ASSURANCE_SUFFIX}"), assurance.clone());
                    }
                }
                _ => {
                    flat.insert(key.clone(), value.clone());
                }
            }
        }
        flat
    }
}

fn is_assured_answer(answer: &Map<String, Value>) -> bool {
    answer.contains_key("assurance")
        && answer
            .keys()
            .all(|key| key == "value" || key == "assurance")
}

fn pricing_message_key<'a>(field: &str, message_key: &'a str) -> &'a str {
    match (field, message_key) {
        ("priceMin", "answer_required") => "no_min_price_specified",
        ("priceUnit" | "priceInterval", "answer_required") => "no_unit_specified",
        ("priceMin", "not_money_format") => "min_price_not_a_number",
        ("priceMax", "not_money_format") => "max_price_not_a_number",
        _ => message_key,
    }
}
