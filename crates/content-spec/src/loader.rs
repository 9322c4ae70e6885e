use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::{ContentError, Result};
use crate::manifest::Manifest;
use crate::messages::{self, MessageBlock};
use crate::question::Question;
use crate::section::Section;
use crate::slug::slugify;
use crate::spec::{QuestionDef, QuestionRef, SectionDef};

static LOT_SERVICE_TYPES: OnceLock<Regex> = OnceLock::new();

/// Lot-specific service type questions all answer the same `serviceTypes` field.
fn normalize_question_id(question_id: &str) -> String {
    let pattern = LOT_SERVICE_TYPES.get_or_init(|| {
        Regex::new(r"^serviceTypes(SCS|SaaS|PaaS|IaaS)$").expect("valid service types regex")
    });
    if pattern.is_match(question_id) {
        "serviceTypes".to_string()
    } else {
        question_id.to_string()
    }
}

type ManifestKey = (String, String);
type QuestionKey = (String, String, String);
type MessageKey = (String, String);

/// Reads content files below `<content_path>/frameworks` and caches what it builds.
///
/// Entries are loaded lazily and kept for the lifetime of the loader. Sections
/// are frozen behind an `Arc` once built; questions and manifests are handed
/// out as owned copies.
#[derive(Debug)]
pub struct ContentLoader {
    content_path: PathBuf,
    manifests: HashMap<ManifestKey, Arc<[Section]>>,
    questions: HashMap<QuestionKey, Question>,
    messages: HashMap<MessageKey, MessageBlock>,
}

impl ContentLoader {
    pub fn new(content_path: impl Into<PathBuf>) -> Self {
        Self {
            content_path: content_path.into(),
            manifests: HashMap::new(),
            questions: HashMap::new(),
            messages: HashMap::new(),
        }
    }

    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    fn framework_dir(&self, framework: &str) -> PathBuf {
        self.content_path.join("frameworks").join(framework)
    }

    fn manifest_path(&self, framework: &str, manifest: &str) -> PathBuf {
        self.framework_dir(framework)
            .join("manifests")
            .join(format!("{manifest}.yml"))
    }

    fn question_path(&self, framework: &str, question_set: &str, question_id: &str) -> PathBuf {
        self.framework_dir(framework)
            .join("questions")
            .join(question_set)
            .join(format!("{question_id}.yml"))
    }

    fn message_path(&self, framework: &str, block: &str) -> PathBuf {
        self.framework_dir(framework)
            .join("messages")
            .join(format!("{block}.yml"))
    }

    /// Loads a manifest file and resolves every question it lists.
    pub fn load_manifest(
        &mut self,
        framework: &str,
        question_set: &str,
        manifest: &str,
    ) -> Result<Arc<[Section]>> {
        let key = (framework.to_string(), manifest.to_string());
        if let Some(sections) = self.manifests.get(&key) {
            trace!(framework, manifest, "manifest cache hit");
            return Ok(Arc::clone(sections));
        }

        let path = self.manifest_path(framework, manifest);
        debug!(path = %path.display(), "loading manifest");
        let definitions: Vec<SectionDef> = read_yaml(&path)?;

        let mut sections = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let mut questions = Vec::with_capacity(definition.questions.len());
            for reference in definition.questions {
                let mut chain = Vec::new();
                questions.push(self.resolve(framework, question_set, reference, &path, &mut chain)?);
            }
            let id = definition.id.unwrap_or_else(|| slugify(&definition.name));
            if sections.iter().any(|section: &Section| section.id() == id) {
                return Err(ContentError::DuplicateSection {
                    manifest: manifest.to_string(),
                    id,
                });
            }
            sections.push(Section::new(
                id,
                definition.name,
                definition.editable,
                definition.description,
                questions,
            ));
        }

        let sections: Arc<[Section]> = sections.into();
        self.manifests.insert(key, Arc::clone(&sections));
        Ok(sections)
    }

    /// Sections of a manifest previously passed to [`ContentLoader::load_manifest`].
    pub fn get_manifest_sections(&self, framework: &str, manifest: &str) -> Result<Arc<[Section]>> {
        self.manifests
            .get(&(framework.to_string(), manifest.to_string()))
            .cloned()
            .ok_or_else(|| ContentError::ManifestNotLoaded {
                framework: framework.to_string(),
                manifest: manifest.to_string(),
            })
    }

    /// Fresh, freshly numbered manifest over a loaded manifest's sections.
    pub fn get_builder(&self, framework: &str, manifest: &str) -> Result<Manifest> {
        let sections = self.get_manifest_sections(framework, manifest)?;
        Ok(Manifest::new(sections.to_vec()))
    }

    /// Loads one question file, resolving its nested questions.
    ///
    /// Returns a copy; the cached question is never exposed.
    pub fn get_question(
        &mut self,
        framework: &str,
        question_set: &str,
        question_id: &str,
    ) -> Result<Question> {
        self.load_question(framework, question_set, question_id, &mut Vec::new())
    }

    fn load_question(
        &mut self,
        framework: &str,
        question_set: &str,
        question_id: &str,
        chain: &mut Vec<String>,
    ) -> Result<Question> {
        let key = (
            framework.to_string(),
            question_set.to_string(),
            question_id.to_string(),
        );
        if let Some(question) = self.questions.get(&key) {
            trace!(framework, question_set, question_id, "question cache hit");
            return Ok(question.clone());
        }
        if chain.iter().any(|id| id == question_id) {
            let mut chain = chain.clone();
            chain.push(question_id.to_string());
            return Err(ContentError::CyclicQuestion { chain });
        }

        let path = self.question_path(framework, question_set, question_id);
        debug!(path = %path.display(), "loading question");
        let definition: QuestionDef = read_yaml(&path)?;

        chain.push(question_id.to_string());
        let question = self.build(
            framework,
            question_set,
            normalize_question_id(question_id),
            definition,
            &path,
            chain,
        );
        chain.pop();
        let question = question?;

        self.questions.insert(key, question.clone());
        Ok(question)
    }

    fn resolve(
        &mut self,
        framework: &str,
        question_set: &str,
        reference: QuestionRef,
        origin: &Path,
        chain: &mut Vec<String>,
    ) -> Result<Question> {
        match reference {
            QuestionRef::Id(question_id) => {
                self.load_question(framework, question_set, &question_id, chain)
            }
            QuestionRef::Inline(definition) => {
                let id = definition.id.clone().ok_or_else(|| ContentError::MissingField {
                    context: format!("inline question in {}", origin.display()),
                    field: "id",
                })?;
                self.build(framework, question_set, id, *definition, origin, chain)
            }
        }
    }

    fn build(
        &mut self,
        framework: &str,
        question_set: &str,
        id: String,
        mut definition: QuestionDef,
        origin: &Path,
        chain: &mut Vec<String>,
    ) -> Result<Question> {
        let references = std::mem::take(&mut definition.questions);
        let mut children = Vec::with_capacity(references.len());
        for reference in references {
            children.push(self.resolve(framework, question_set, reference, origin, chain)?);
        }
        Question::assemble(id, definition, children)
    }

    /// Loads each named message block for `framework`.
    pub fn load_messages<I, S>(&mut self, framework: &str, blocks: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for block in blocks {
            let block = block.as_ref();
            let key = (framework.to_string(), block.to_string());
            if self.messages.contains_key(&key) {
                continue;
            }
            let path = self.message_path(framework, block);
            debug!(path = %path.display(), "loading message block");
            let messages: MessageBlock = read_yaml(&path)?;
            self.messages.insert(key, messages);
        }
        Ok(())
    }

    /// Message for a framework status, optionally narrowed by supplier status.
    ///
    /// Fails only when the block was never loaded; a missing status is `None`.
    pub fn get_message(
        &self,
        framework: &str,
        block: &str,
        framework_status: &str,
        supplier_status: Option<&str>,
    ) -> Result<Option<&str>> {
        let Some(messages) = self
            .messages
            .get(&(framework.to_string(), block.to_string()))
        else {
            warn!(framework, block, "message block requested before loading");
            return Err(ContentError::MessagesNotLoaded {
                framework: framework.to_string(),
                block: block.to_string(),
            });
        };
        Ok(messages.get(framework_status, supplier_status))
    }

    /// [`ContentLoader::get_message`] with `{{placeholders}}` filled from `context`.
    pub fn render_message(
        &self,
        framework: &str,
        block: &str,
        framework_status: &str,
        supplier_status: Option<&str>,
        context: &Value,
    ) -> Result<Option<String>> {
        self.get_message(framework, block, framework_status, supplier_status)?
            .map(|template| messages::render_message(template, context))
            .transpose()
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path).map_err(|source| ContentError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
