pub mod engine;
pub mod ranking;
pub mod table;

pub use engine::{aggregate, Aggregation, Contribution, SkipReason, SkippedAnswer};
pub use ranking::{rank, RankOutcome, Ranking};
pub use table::{CategoryScore, ScoreTable};

use serde::Serialize;

use crate::answers::AnswerSet;
use crate::catalog::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub aggregation: Aggregation,
    pub ranking: Ranking,
}

/// Aggregate the answers and rank the result.
///
/// Completeness is not checked here; callers gate on
/// [`AnswerSet::progress`] before presenting a result as final.
pub fn evaluate(catalog: &Catalog, answers: &AnswerSet) -> MatchResult {
    let aggregation = aggregate(catalog, answers);
    let ranking = rank(&aggregation.table, &catalog.fallback);
    MatchResult {
        aggregation,
        ranking,
    }
}
