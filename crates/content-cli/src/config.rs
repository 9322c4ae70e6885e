use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliResult;

const CONTENT_PATH_ENV: &str = "CONTENT_PATH";
const DEFAULT_CONTENT_PATH: &str = "content";

/// Defaults read from `--config`; command line flags win over every field.
#[derive(Debug, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub content_path: Option<PathBuf>,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub question_set: Option<String>,
    #[serde(default)]
    pub manifest: Option<String>,
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = fs::read_to_string(path)
            .map_err(|err| format!("failed to read config {}: {err}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    /// Flag, then config, then `CONTENT_PATH`, then `./content`.
    pub fn content_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.content_path.clone())
            .or_else(|| env::var_os(CONTENT_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_PATH))
    }

    pub fn framework(&self, flag: Option<String>) -> CliResult<String> {
        require(flag.or_else(|| self.framework.clone()), "framework")
    }

    pub fn question_set(&self, flag: Option<String>) -> CliResult<String> {
        require(flag.or_else(|| self.question_set.clone()), "question-set")
    }

    pub fn manifest(&self, flag: Option<String>) -> CliResult<String> {
        require(flag.or_else(|| self.manifest.clone()), "manifest")
    }
}

fn require(value: Option<String>, name: &str) -> CliResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("--{name} is required (pass the flag or set it in --config)").into()),
    }
}
