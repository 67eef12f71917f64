use serde::{Deserialize, Serialize};

use super::table::ScoreTable;

/// How the winning category was decided.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RankOutcome {
    /// A single category had the highest score.
    Winner,
    /// Other categories matched the top score; the earliest in catalog order won.
    Tied { with: Vec<String> },
    /// Nothing scored above zero.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    pub key: String,
    pub score: u64,
    pub outcome: RankOutcome,
}

/// Pick the highest-scoring category.
///
/// Scans in table order and only replaces the leader on a strictly greater
/// score, so the first category to reach the maximum wins. When every score
/// is zero (or the table is empty) `fallback` is returned.
pub fn rank(table: &ScoreTable, fallback: &str) -> Ranking {
    let mut best: Option<(&str, u64)> = None;
    for entry in table.entries() {
        match best {
            Some((_, score)) if entry.score <= score => {}
            _ => best = Some((entry.key.as_str(), entry.score)),
        }
    }

    match best {
        Some((key, score)) if score > 0 => {
            let tied: Vec<String> = table
                .entries()
                .iter()
                .filter(|e| e.score == score && e.key != key)
                .map(|e| e.key.clone())
                .collect();
            let outcome = if tied.is_empty() {
                RankOutcome::Winner
            } else {
                RankOutcome::Tied { with: tied }
            };
            Ranking {
                key: key.to_string(),
                score,
                outcome,
            }
        }
        _ => {
            tracing::debug!(fallback, "no category scored, using fallback");
            Ranking {
                key: fallback.to_string(),
                score: 0,
                outcome: RankOutcome::Fallback,
            }
        }
    }
}
