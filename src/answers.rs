use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::catalog::{Catalog, Question};

/// A respondent's selections: question id -> chosen option id.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AnswerSet {
    selections: BTreeMap<u32, String>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the option chosen for a question.
    pub fn select(&mut self, question_id: u32, option_id: impl Into<String>) {
        self.selections.insert(question_id, option_id.into());
    }

    pub fn clear(&mut self, question_id: u32) -> Option<String> {
        self.selections.remove(&question_id)
    }

    pub fn get(&self, question_id: u32) -> Option<&str> {
        self.selections.get(&question_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.selections.iter().map(|(q, o)| (*q, o.as_str()))
    }

    /// Parse a `QUESTION=OPTION` pair such as `3=b`.
    pub fn parse_pair(s: &str) -> Result<(u32, String)> {
        let Some((question, option)) = s.split_once('=') else {
            bail!("Expected QUESTION=OPTION, got '{}'", s)
        };
        let question: u32 = question
            .trim()
            .parse()
            .with_context(|| format!("Invalid question id in '{}'", s))?;
        let option = option.trim();
        if option.is_empty() {
            bail!("Missing option id in '{}'", s)
        }
        Ok((question, option.to_string()))
    }

    /// How far through the catalog these answers are.
    ///
    /// Answers naming questions the catalog doesn't have are not counted.
    pub fn progress(&self, catalog: &Catalog) -> Progress {
        let answered = catalog
            .questions
            .iter()
            .filter(|q| self.selections.contains_key(&q.id))
            .count();
        Progress {
            answered,
            total: catalog.questions.len(),
        }
    }

    /// First question, in catalog order, that has no answer yet.
    pub fn next_unanswered<'a>(&self, catalog: &'a Catalog) -> Option<&'a Question> {
        catalog
            .questions
            .iter()
            .find(|q| !self.selections.contains_key(&q.id))
    }
}

impl FromIterator<(u32, String)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self {
            selections: iter.into_iter().collect(),
        }
    }
}

/// Completion state of an answer set against a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// Only a complete answer set should be ranked.
    pub fn is_complete(&self) -> bool {
        self.answered == self.total
    }

    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered)
    }
}

/// Load an answer set from a file.
///
/// `.json` files are parsed as JSON, everything else as YAML. Both use a
/// plain mapping such as `{"1": "a", "2": "c"}`.
pub fn load_answers(path: &Path) -> Result<AnswerSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers file at {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let answers = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse answers: invalid JSON in {}", path.display()))?
    } else {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse answers: invalid YAML in {}", path.display()))?
    };

    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_select_replaces_previous_answer() {
        let mut answers = AnswerSet::new();
        answers.select(1, "a");
        answers.select(1, "b");
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(1), Some("b"));
    }

    #[test]
    fn test_clear() {
        let mut answers = AnswerSet::new();
        answers.select(2, "c");
        assert_eq!(answers.clear(2), Some("c".to_string()));
        assert!(answers.is_empty());
        assert_eq!(answers.clear(2), None);
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(AnswerSet::parse_pair("3=b").unwrap(), (3, "b".to_string()));
        assert_eq!(AnswerSet::parse_pair(" 4 = d ").unwrap(), (4, "d".to_string()));
    }

    #[test]
    fn test_parse_pair_errors() {
        assert!(AnswerSet::parse_pair("3").is_err());
        assert!(AnswerSet::parse_pair("x=b").is_err());
        assert!(AnswerSet::parse_pair("3=").is_err());
    }

    #[test]
    fn test_progress_counts_only_known_questions() {
        let catalog = Catalog::builtin();
        let mut answers = AnswerSet::new();
        answers.select(1, "a");
        answers.select(99, "a");

        let progress = answers.progress(&catalog);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.total, 8);
        assert_eq!(progress.remaining(), 7);
        assert!(!progress.is_complete());
    }

    #[test]
    fn test_progress_complete() {
        let catalog = Catalog::builtin();
        let answers: AnswerSet = catalog
            .questions
            .iter()
            .map(|q| (q.id, "a".to_string()))
            .collect();
        assert!(answers.progress(&catalog).is_complete());
        assert!(answers.next_unanswered(&catalog).is_none());
    }

    #[test]
    fn test_next_unanswered_follows_catalog_order() {
        let catalog = Catalog::builtin();
        let mut answers = AnswerSet::new();
        answers.select(1, "a");
        answers.select(3, "a");
        assert_eq!(answers.next_unanswered(&catalog).unwrap().id, 2);
    }

    #[test]
    fn test_load_answers_json() {
        let path = env::temp_dir().join("specialty_match_test_answers.json");
        std::fs::write(&path, r#"{"1": "a", "2": "c"}"#).unwrap();

        let answers = load_answers(&path).unwrap();
        assert_eq!(answers.get(1), Some("a"));
        assert_eq!(answers.get(2), Some("c"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_answers_yaml() {
        let path = env::temp_dir().join("specialty_match_test_answers.yaml");
        std::fs::write(&path, "1: b\n2: d\n").unwrap();

        let answers = load_answers(&path).unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.get(2), Some("d"));

        let _ = std::fs::remove_file(&path);
    }
}
