#![allow(missing_docs)]

pub mod convert;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod messages;
pub mod question;
pub mod schema;
pub mod section;
pub mod slug;
pub mod spec;
pub mod submission;
pub mod visibility;

pub use convert::{convert_to_boolean, convert_to_number, expand_pricing_field};
pub use error::{ContentError, Result};
pub use loader::ContentLoader;
pub use manifest::Manifest;
pub use messages::{MessageBlock, render_message};
pub use question::{PRICE_FIELDS, Question, QuestionField, QuestionKind};
pub use schema::content_schema;
pub use section::{ErrorMessage, Section};
pub use slug::slugify;
pub use spec::{Being, DependsRule, QuestionDef, QuestionRef, SectionDef, Validation};
pub use submission::FormSubmission;
pub use visibility::{is_visible, rule_holds};
