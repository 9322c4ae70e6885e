use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw form post: every field name maps to one or more submitted strings.
///
/// Values are expected to be whitespace-trimmed already.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSubmission {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `key`, keeping earlier values.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(key.into()).or_default().push(value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// First submitted value for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn all(&self, key: &str) -> &[String] {
        self.fields.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for FormSubmission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = FormSubmission::new();
        for (key, value) in iter {
            submission.push(key, value);
        }
        submission
    }
}

impl From<BTreeMap<String, Vec<String>>> for FormSubmission {
    fn from(fields: BTreeMap<String, Vec<String>>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_accumulate() {
        let submission: FormSubmission =
            [("tags", "a"), ("tags", "b"), ("name", "x")].into_iter().collect();
        assert_eq!(submission.all("tags"), ["a", "b"]);
        assert_eq!(submission.first("tags"), Some("a"));
        assert_eq!(submission.first("missing"), None);
        assert!(submission.all("missing").is_empty());
    }

    #[test]
    fn deserializes_from_list_mapping() {
        let submission: FormSubmission =
            serde_json::from_str(r#"{"q1": ["hello"], "q2": []}"#).expect("json");
        assert_eq!(submission.first("q1"), Some("hello"));
        assert!(submission.contains("q2"));
        assert_eq!(submission.first("q2"), None);
    }
}
