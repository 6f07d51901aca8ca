use std::collections::BTreeMap;

use crate::models::dto::request::AnswerEntry;

/// Client-owned working answers: question id -> selected option index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerMap {
    answers: BTreeMap<String, usize>,
}

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records or overwrites the answer; returns the previous selection.
    pub fn select(&mut self, question_id: &str, option_index: usize) -> Option<usize> {
        self.answers.insert(question_id.to_string(), option_index)
    }

    pub fn get(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Save payload entries, ordered by question id.
    pub fn to_entries(&self) -> Vec<AnswerEntry> {
        self.answers
            .iter()
            .map(|(question_id, selected)| AnswerEntry {
                question_id: question_id.clone(),
                selected_option: *selected,
            })
            .collect()
    }
}

impl FromIterator<(String, usize)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}
