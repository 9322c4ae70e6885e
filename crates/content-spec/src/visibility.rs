use serde_json::Value;

use crate::question::Question;
use crate::spec::question::DependsRule;

/// A rule holds when the answer exists and is one of the `being` values.
pub fn rule_holds(rule: &DependsRule, answers: &Value) -> bool {
    answers
        .get(&rule.on)
        .is_some_and(|value| rule.being.accepts(value))
}

/// Whether every `depends` rule of `question` holds for `answers`.
pub fn is_visible(question: &Question, answers: &Value) -> bool {
    question
        .depends()
        .iter()
        .all(|rule| rule_holds(rule, answers))
}
