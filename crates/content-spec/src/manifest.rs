use serde_json::{Map, Value};

use crate::error::Result;
use crate::question::Question;
use crate::section::Section;
use crate::submission::FormSubmission;
use crate::visibility::is_visible;

/// Ordered sections making up one questionnaire flow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    sections: Vec<Section>,
}

impl Manifest {
    /// Builds a manifest and numbers its questions 1, 2, 3... in document order.
    pub fn new(mut sections: Vec<Section>) -> Self {
        let mut number = 0;
        for section in &mut sections {
            for question in section.questions_mut() {
                number += 1;
                question.set_number(number);
            }
        }
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// New manifest keeping only questions whose `depends` rules hold for
    /// `answers`, and only sections left with at least one question.
    ///
    /// Question numbers are carried over from this manifest, so a filtered
    /// view may have gaps. `self` is never modified.
    pub fn filter(&self, answers: &Value) -> Manifest {
        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                let questions: Vec<Question> = section
                    .questions()
                    .iter()
                    .filter(|question| is_visible(question, answers))
                    .cloned()
                    .collect();
                if questions.is_empty() {
                    None
                } else {
                    Some(section.with_questions(questions))
                }
            })
            .collect();
        Manifest { sections }
    }

    pub fn get_section(&self, section_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.id() == section_id)
    }

    /// Question (top level or nested) with the given field id in any section.
    pub fn get_question(&self, field_name: &str) -> Option<&Question> {
        self.sections
            .iter()
            .find_map(|section| section.get_question(field_name))
    }

    pub fn get_question_ids(&self) -> Vec<&str> {
        self.sections
            .iter()
            .flat_map(|section| section.get_question_ids(None))
            .collect()
    }

    /// Id of the section after `current`, or of the first section when `current` is `None`.
    ///
    /// With `only_editable`, non-editable sections are never returned.
    pub fn get_next_section_id(&self, current: Option<&str>, only_editable: bool) -> Option<&str> {
        let mut after_current = current.is_none();
        for section in &self.sections {
            if after_current && (!only_editable || section.editable()) {
                return Some(section.id());
            }
            if Some(section.id()) == current {
                after_current = true;
            }
        }
        None
    }

    pub fn get_next_editable_section_id(&self, current: Option<&str>) -> Option<&str> {
        self.get_next_section_id(current, true)
    }

    /// Merged `get_data` output of every section.
    pub fn get_all_data(&self, submission: &FormSubmission) -> Result<Map<String, Value>> {
        let mut data = Map::new();
        for section in &self.sections {
            data.extend(section.get_data(submission)?);
        }
        Ok(data)
    }
}
