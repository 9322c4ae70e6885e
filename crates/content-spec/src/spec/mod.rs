pub mod question;
pub mod section;

pub use question::{Being, DependsRule, QuestionDef, QuestionRef, Validation};
pub use section::SectionDef;
