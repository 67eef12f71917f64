use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which text variant to display.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    Base,
    Localized,
}

/// A value with an optional localized counterpart.
///
/// Example YAML:
/// ```yaml
/// name:
///   base: "Cardiology"
///   localized: "Cardiología"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Localized<T> {
    pub base: T,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized: Option<T>,
}

impl<T> Localized<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            localized: None,
        }
    }

    pub fn with_localized(mut self, localized: T) -> Self {
        self.localized = Some(localized);
        self
    }

    /// Falls back to the base value when no localized variant exists.
    pub fn get(&self, locale: Locale) -> &T {
        match (locale, &self.localized) {
            (Locale::Localized, Some(localized)) => localized,
            _ => &self.base,
        }
    }
}

/// One selectable answer. `weights` maps category keys to the points this
/// option contributes; keys that are absent contribute nothing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnswerOption {
    pub id: String,
    pub prompt: Localized<String>,
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Question {
    pub id: u32,
    pub prompt: Localized<String>,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn option(&self, id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// A specialty the quiz can recommend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub key: String,
    pub name: Localized<String>,
    pub description: Localized<String>,
    #[serde(default = "empty_list")]
    pub strengths: Localized<Vec<String>>,
    #[serde(default = "empty_list")]
    pub challenges: Localized<Vec<String>>,
}

fn empty_list() -> Localized<Vec<String>> {
    Localized::new(Vec::new())
}

/// The full question bank and specialty list.
///
/// `categories` is kept in declaration order; that order decides ties when
/// two specialties finish with the same score.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Category recommended when no answer scored any points.
    pub fallback: String,
    pub categories: Vec<Category>,
    pub questions: Vec<Question>,
}

impl Catalog {
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.key == key)
    }

    pub fn category_keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.key.as_str())
    }
}
