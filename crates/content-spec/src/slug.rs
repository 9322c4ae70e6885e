use std::sync::OnceLock;

use regex::Regex;

static PUNCTUATION: OnceLock<Regex> = OnceLock::new();
static SEPARATORS: OnceLock<Regex> = OnceLock::new();

/// Lowercases `name`, drops punctuation and joins its words with dashes.
///
/// Letters and digits from any script survive, as do underscores.
pub fn slugify(name: &str) -> String {
    let punctuation =
        PUNCTUATION.get_or_init(|| Regex::new(r"[^\w\s-]").expect("valid slug regex"));
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[-\s]+").expect("valid slug regex"));
    let lowered = name.to_lowercase();
    let stripped = punctuation.replace_all(&lowered, "");
    separators
        .replace_all(&stripped, "-")
        .trim_matches('-')
        .to_string()
}
