use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::answers::AnswerSet;
use crate::scoring::{CategoryScore, MatchResult, RankOutcome};

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizState {
    pub version: u32,
    #[serde(default)]
    pub in_progress: Option<InProgress>,
    #[serde(default)]
    pub history: Vec<QuizRecord>,
}

/// A quiz that was stopped before every question was answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InProgress {
    pub started_at: DateTime<Utc>,
    pub answers: AnswerSet,
}

/// A finished quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRecord {
    pub taken_at: DateTime<Utc>,
    pub winner: String,
    pub outcome: RankOutcome,
    pub scores: Vec<CategoryScore>,
}

impl QuizRecord {
    pub fn from_result(result: &MatchResult, taken_at: DateTime<Utc>) -> Self {
        Self {
            taken_at,
            winner: result.ranking.key.clone(),
            outcome: result.ranking.outcome.clone(),
            scores: result.aggregation.table.entries().to_vec(),
        }
    }

    /// Format how long ago the quiz was taken, e.g. "3days 2h ago"
    pub fn format_age(&self, now: DateTime<Utc>) -> String {
        let elapsed = now - self.taken_at;
        let minutes = elapsed.num_minutes();
        if minutes < 1 {
            return "just now".to_string();
        }
        // Drop everything below minutes, then keep the two largest units
        let rounded = std::time::Duration::from_secs(minutes as u64 * 60);
        let formatted = humantime::format_duration(rounded).to_string();
        let coarse: Vec<&str> = formatted.split_whitespace().take(2).collect();
        format!("{} ago", coarse.join(" "))
    }
}

impl Default for QuizState {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizState {
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            in_progress: None,
            history: Vec::new(),
        }
    }

    /// Answers to resume from, or an empty set.
    pub fn resume_answers(&self) -> AnswerSet {
        self.in_progress
            .as_ref()
            .map(|p| p.answers.clone())
            .unwrap_or_default()
    }

    /// Remember partial answers, keeping the original start time.
    pub fn save_progress(&mut self, answers: AnswerSet) {
        if answers.is_empty() {
            self.in_progress = None;
            return;
        }
        let started_at = self
            .in_progress
            .as_ref()
            .map(|p| p.started_at)
            .unwrap_or_else(Utc::now);
        self.in_progress = Some(InProgress {
            started_at,
            answers,
        });
    }

    pub fn discard_progress(&mut self) -> bool {
        self.in_progress.take().is_some()
    }

    /// Append a finished quiz, dropping the oldest records beyond `limit`.
    /// Clears any saved progress.
    pub fn record(&mut self, result: &MatchResult, limit: usize) {
        self.in_progress = None;
        self.history.push(QuizRecord::from_result(result, Utc::now()));
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }

    pub fn latest(&self) -> Option<&QuizRecord> {
        self.history.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::scoring::evaluate;
    use chrono::Duration;

    fn result_for(choice: &str) -> MatchResult {
        let catalog = Catalog::builtin();
        let answers: AnswerSet = catalog
            .questions
            .iter()
            .map(|q| (q.id, choice.to_string()))
            .collect();
        evaluate(&catalog, &answers)
    }

    #[test]
    fn test_new_state_empty() {
        let state = QuizState::new();
        assert_eq!(state.version, 1);
        assert!(state.in_progress.is_none());
        assert!(state.history.is_empty());
        assert!(state.resume_answers().is_empty());
    }

    #[test]
    fn test_save_progress_keeps_start_time() {
        let mut state = QuizState::new();
        let mut answers = AnswerSet::new();
        answers.select(1, "a");
        state.save_progress(answers.clone());
        let started = state.in_progress.as_ref().unwrap().started_at;

        answers.select(2, "b");
        state.save_progress(answers.clone());
        let progress = state.in_progress.as_ref().unwrap();
        assert_eq!(progress.started_at, started);
        assert_eq!(progress.answers, answers);
        assert_eq!(state.resume_answers().len(), 2);
    }

    #[test]
    fn test_save_empty_progress_clears() {
        let mut state = QuizState::new();
        let mut answers = AnswerSet::new();
        answers.select(1, "a");
        state.save_progress(answers);
        state.save_progress(AnswerSet::new());
        assert!(state.in_progress.is_none());
    }

    #[test]
    fn test_record_clears_progress() {
        let mut state = QuizState::new();
        let mut answers = AnswerSet::new();
        answers.select(1, "a");
        state.save_progress(answers);

        state.record(&result_for("a"), 10);
        assert!(state.in_progress.is_none());
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.latest().unwrap().scores.len(), 10);
    }

    #[test]
    fn test_record_trims_oldest() {
        let mut state = QuizState::new();
        state.record(&result_for("a"), 2);
        state.record(&result_for("b"), 2);
        state.record(&result_for("zzz"), 2);
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[1].outcome, RankOutcome::Fallback);
        assert_eq!(state.history[0].winner, result_for("b").ranking.key);
    }

    #[test]
    fn test_discard_progress() {
        let mut state = QuizState::new();
        assert!(!state.discard_progress());
        let mut answers = AnswerSet::new();
        answers.select(3, "c");
        state.save_progress(answers);
        assert!(state.discard_progress());
    }

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        let mut record = QuizRecord::from_result(&result_for("a"), now);
        assert_eq!(record.format_age(now), "just now");

        record.taken_at = now - Duration::minutes(90);
        assert_eq!(record.format_age(now), "1h 30m ago");

        record.taken_at = now - Duration::days(3) - Duration::hours(2) - Duration::minutes(5);
        assert_eq!(record.format_age(now), "3days 2h ago");
    }
}
