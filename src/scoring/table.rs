use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CategoryScore {
    pub key: String,
    pub score: u64,
}

/// Accumulated points per category, kept in catalog order.
///
/// The order is significant: it is the tie-break order used by [`super::rank`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ScoreTable {
    entries: Vec<CategoryScore>,
}

impl ScoreTable {
    /// A table with every catalog category at zero.
    pub fn seeded(catalog: &Catalog) -> Self {
        Self::from_keys(catalog.category_keys())
    }

    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entries: keys
                .into_iter()
                .map(|key| CategoryScore {
                    key: key.to_string(),
                    score: 0,
                })
                .collect(),
        }
    }

    /// Add points to a known category. Returns false if the key isn't in the table.
    pub fn add(&mut self, key: &str, points: u32) -> bool {
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.score = entry.score.saturating_add(u64::from(points));
                true
            }
            None => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.iter().find(|e| e.key == key).map(|e| e.score)
    }

    pub fn entries(&self) -> &[CategoryScore] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.score).sum()
    }

    pub fn max_score(&self) -> u64 {
        self.entries.iter().map(|e| e.score).max().unwrap_or(0)
    }

    /// Entries sorted by score descending; equal scores keep catalog order.
    pub fn standings(&self) -> Vec<&CategoryScore> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted
    }
}
