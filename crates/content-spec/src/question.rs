use serde_json::{Map, Value};

use crate::error::{ContentError, Result};
use crate::spec::question::{DependsRule, QuestionDef, QuestionRef, Validation};

/// Form inputs a pricing answer is split into, in submission order.
pub const PRICE_FIELDS: &[&str] = &["priceMin", "priceMax", "priceUnit", "priceInterval"];

/// Answer type of a question, resolved from its declared `type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    Text,
    Boolean,
    /// Declared as `percentage`.
    Numeric,
    /// Declared as `list` or `checkboxes`.
    List,
    Pricing,
    Upload,
    /// Question made of nested sub-questions with no answer type of its own.
    Composite,
    Custom(String),
}

impl QuestionKind {
    pub fn from_declared(kind: Option<&str>, has_children: bool) -> Self {
        match kind {
            Some("text") => QuestionKind::Text,
            Some("boolean") => QuestionKind::Boolean,
            Some("percentage") => QuestionKind::Numeric,
            Some("list") | Some("checkboxes") => QuestionKind::List,
            Some("pricing") => QuestionKind::Pricing,
            Some("upload") => QuestionKind::Upload,
            Some("multiquestion") if has_children => QuestionKind::Composite,
            None if has_children => QuestionKind::Composite,
            None => QuestionKind::Text,
            Some(other) => QuestionKind::Custom(other.to_string()),
        }
    }

    /// Declared type name this kind is read from.
    pub fn name(&self) -> &str {
        match self {
            QuestionKind::Text => "text",
            QuestionKind::Boolean => "boolean",
            QuestionKind::Numeric => "percentage",
            QuestionKind::List => "list",
            QuestionKind::Pricing => "pricing",
            QuestionKind::Upload => "upload",
            QuestionKind::Composite => "multiquestion",
            QuestionKind::Custom(name) => name,
        }
    }

    /// Fixed form inputs that replace the question id when rendering or saving.
    pub fn expanded_fields(&self) -> Option<&'static [&'static str]> {
        match self {
            QuestionKind::Pricing => Some(PRICE_FIELDS),
            _ => None,
        }
    }
}

/// Result of [`Question::get`]: a nested question or a declared attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuestionField<'a> {
    Child(&'a Question),
    Attribute(&'a Value),
}

/// A resolved question, possibly composed of nested questions.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    id: String,
    kind: QuestionKind,
    number: Option<usize>,
    label: Option<String>,
    hint: Option<String>,
    optional: bool,
    assurance: bool,
    depends: Vec<DependsRule>,
    validations: Vec<Validation>,
    children: Vec<Question>,
    attributes: Map<String, Value>,
}

impl Question {
    /// Builds a question over already resolved children.
    ///
    /// Every declared field, including unknown ones, stays reachable through
    /// [`Question::attribute`].
    pub(crate) fn assemble(
        id: String,
        mut definition: QuestionDef,
        children: Vec<Question>,
    ) -> Result<Self> {
        definition.id = Some(id.clone());
        definition.questions.clear();
        let attributes = match serde_json::to_value(&definition)? {
            Value::Object(attributes) => attributes,
            _ => Map::new(),
        };
        let kind = QuestionKind::from_declared(definition.kind.as_deref(), !children.is_empty());
        let assurance = definition
            .assurance_approach
            .as_ref()
            .is_some_and(|value| !matches!(value, Value::Null | Value::Bool(false)));
        Ok(Self {
            id,
            kind,
            number: None,
            label: definition.question.or(definition.name),
            hint: definition.hint,
            optional: definition.optional,
            assurance,
            depends: definition.depends,
            validations: definition.validations,
            children,
            attributes,
        })
    }

    /// Builds a question from an inline definition.
    ///
    /// Nested questions must be inline as well; id references need a
    /// [`ContentLoader`](crate::ContentLoader) to resolve.
    pub fn from_definition(mut definition: QuestionDef) -> Result<Self> {
        let id = definition.id.clone().ok_or_else(|| ContentError::MissingField {
            context: "inline question".into(),
            field: "id",
        })?;
        let children = std::mem::take(&mut definition.questions)
            .into_iter()
            .map(|reference| match reference {
                QuestionRef::Inline(child) => Question::from_definition(*child),
                QuestionRef::Id(child_id) => Err(ContentError::UnresolvedQuestion { id: child_id }),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::assemble(id, definition, children)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    /// 1-based position in the manifest this question was numbered by.
    pub fn number(&self) -> Option<usize> {
        self.number
    }

    pub(crate) fn set_number(&mut self, number: usize) {
        self.number = Some(number);
    }

    /// Display text: the declared `question`, or `name` when absent.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn has_assurance(&self) -> bool {
        self.assurance
    }

    pub fn depends(&self) -> &[DependsRule] {
        &self.depends
    }

    pub fn validations(&self) -> &[Validation] {
        &self.validations
    }

    pub fn validation_message(&self, name: &str) -> Option<&str> {
        self.validations
            .iter()
            .find(|validation| validation.name == name)
            .map(|validation| validation.message.as_str())
    }

    pub fn questions(&self) -> &[Question] {
        &self.children
    }

    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    /// Leaf field ids owned by this question, optionally restricted to `kind`.
    pub fn fields(&self, kind: Option<&QuestionKind>) -> Vec<&str> {
        if self.is_composite() {
            return self
                .children
                .iter()
                .flat_map(|child| child.fields(kind))
                .collect();
        }
        match kind {
            Some(kind) if kind != &self.kind => Vec::new(),
            _ => vec![self.id.as_str()],
        }
    }

    pub fn child(&self, id: &str) -> Option<&Question> {
        self.children.iter().find(|child| child.id == id)
    }

    /// This question or one of its descendants with the given id.
    pub fn find(&self, id: &str) -> Option<&Question> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Looks `key` up as a nested question id first, then as a declared attribute.
    pub fn get(&self, key: &str) -> Option<QuestionField<'_>> {
        self.child(key)
            .map(QuestionField::Child)
            .or_else(|| self.attribute(key).map(QuestionField::Attribute))
    }
}
