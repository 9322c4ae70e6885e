use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = ContentError> = std::result::Result<T, E>;

/// Failures raised while loading or interpreting content files.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content not found at {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest '{manifest}' for framework '{framework}' has not been loaded")]
    ManifestNotLoaded { framework: String, manifest: String },
    #[error("message block '{block}' for framework '{framework}' has not been loaded")]
    MessagesNotLoaded { framework: String, block: String },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("manifest '{manifest}' declares section id '{id}' more than once")]
    DuplicateSection { manifest: String, id: String },
    #[error("{context} is missing required field '{field}'")]
    MissingField { context: String, field: &'static str },
    #[error("question '{id}' is referenced by id but cannot be resolved here")]
    UnresolvedQuestion { id: String },
    #[error("question references form a cycle: {}", chain.join(" -> "))]
    CyclicQuestion { chain: Vec<String> },
    #[error("pricing answers need at least 4 values, got {found}")]
    PricingFieldCount { found: usize },
    #[error("json encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to render message: {source}")]
    Template {
        #[from]
        source: handlebars::RenderError,
    },
}

impl ContentError {
    /// True for every "the requested content does not exist" failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::NotFound { .. }
                | ContentError::ManifestNotLoaded { .. }
                | ContentError::MessagesNotLoaded { .. }
        )
    }
}
