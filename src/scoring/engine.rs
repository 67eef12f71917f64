use serde::Serialize;
use std::collections::BTreeMap;

use super::table::ScoreTable;
use crate::answers::AnswerSet;
use crate::catalog::Catalog;

/// Points one answered question added to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub question_id: u32,
    pub option_id: String,
    pub weights: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnknownQuestion,
    UnknownOption,
}

/// An answer that could not be matched against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedAnswer {
    pub question_id: u32,
    pub option_id: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub table: ScoreTable,
    pub contributions: Vec<Contribution>,
    pub skipped: Vec<SkippedAnswer>,
}

/// Sum option weights for every answer into a fresh score table.
///
/// Answers that reference a question or option the catalog doesn't have are
/// recorded in `skipped` and leave the table untouched.
pub fn aggregate(catalog: &Catalog, answers: &AnswerSet) -> Aggregation {
    let mut table = ScoreTable::seeded(catalog);
    let mut contributions = Vec::new();
    let mut skipped = Vec::new();

    for (question_id, option_id) in answers.iter() {
        let Some(question) = catalog.question(question_id) else {
            tracing::debug!(question_id, option_id, "skipping answer for unknown question");
            skipped.push(SkippedAnswer {
                question_id,
                option_id: option_id.to_string(),
                reason: SkipReason::UnknownQuestion,
            });
            continue;
        };

        let Some(option) = question.option(option_id) else {
            tracing::debug!(question_id, option_id, "skipping unknown option");
            skipped.push(SkippedAnswer {
                question_id,
                option_id: option_id.to_string(),
                reason: SkipReason::UnknownOption,
            });
            continue;
        };

        for (key, weight) in &option.weights {
            if !table.add(key, *weight) {
                tracing::debug!(question_id, option_id, category = %key, "ignoring weight for unknown category");
            }
        }

        contributions.push(Contribution {
            question_id,
            option_id: option_id.to_string(),
            weights: option.weights.clone(),
        });
    }

    Aggregation {
        table,
        contributions,
        skipped,
    }
}
