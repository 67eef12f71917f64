use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::answers::Progress;
use crate::catalog::{Catalog, Category, Locale};
use crate::scoring::{MatchResult, RankOutcome, ScoreTable, SkipReason};
use crate::state::QuizRecord;

const DEFAULT_WIDTH: usize = 80;
const BAR_WIDTH: usize = 20;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Terminal width, or 80 columns when not attached to a terminal
fn get_terminal_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Truncate to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn display_name<'a>(catalog: &'a Catalog, key: &'a str, locale: Locale) -> &'a str {
    catalog
        .category(key)
        .map(|c| c.name.get(locale).as_str())
        .unwrap_or(key)
}

fn score_bar(score: u64, max: u64) -> String {
    if max == 0 {
        return String::new();
    }
    let filled = ((score as f64 / max as f64) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.min(BAR_WIDTH))
}

/// Multi-line description of one specialty
pub fn format_category(category: &Category, locale: Locale, use_colors: bool) -> String {
    let width = get_terminal_width().saturating_sub(2);
    let mut lines = Vec::new();

    let name = category.name.get(locale);
    if use_colors {
        lines.push(format!("{}", name.bold()));
    } else {
        lines.push(name.clone());
    }

    for line in wrap_text(category.description.get(locale), width) {
        lines.push(format!("  {}", line));
    }

    let sections = [
        ("Strengths", category.strengths.get(locale)),
        ("Challenges", category.challenges.get(locale)),
    ];
    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        lines.push(String::new());
        if use_colors {
            lines.push(format!("  {}", title.underline()));
        } else {
            lines.push(format!("  {}:", title));
        }
        for item in items {
            if use_colors {
                let bullet = if title == "Strengths" {
                    "+".green().to_string()
                } else {
                    "-".yellow().to_string()
                };
                lines.push(format!("    {} {}", bullet, item));
            } else {
                lines.push(format!("    * {}", item));
            }
        }
    }

    lines.join("\n")
}

/// The recommendation card shown after a quiz
pub fn format_result(
    result: &MatchResult,
    catalog: &Catalog,
    locale: Locale,
    use_colors: bool,
) -> String {
    let ranking = &result.ranking;
    let mut out = Vec::new();

    let heading = "Your best-fit specialty";
    if use_colors {
        out.push(format!("{}", heading.cyan().bold()));
    } else {
        out.push(heading.to_string());
    }
    out.push(String::new());

    match catalog.category(&ranking.key) {
        Some(category) => out.push(format_category(category, locale, use_colors)),
        None => out.push(ranking.key.clone()),
    }
    out.push(String::new());

    match &ranking.outcome {
        RankOutcome::Winner => out.push(format!("Score: {}", ranking.score)),
        RankOutcome::Tied { with } => {
            let names: Vec<&str> = with
                .iter()
                .map(|k| display_name(catalog, k, locale))
                .collect();
            out.push(format!(
                "Score: {} (tied with {})",
                ranking.score,
                names.join(", ")
            ));
        }
        RankOutcome::Fallback => {
            out.push("None of your answers pointed to a particular specialty,".to_string());
            out.push("so this is the default recommendation.".to_string());
        }
    }

    let skipped = &result.aggregation.skipped;
    if !skipped.is_empty() {
        out.push(String::new());
        out.push(format!("Ignored {} unrecognised answer(s):", skipped.len()));
        for skip in skipped {
            let reason = match skip.reason {
                SkipReason::UnknownQuestion => "no such question",
                SkipReason::UnknownOption => "no such option",
            };
            out.push(format!(
                "  {}={} ({})",
                skip.question_id, skip.option_id, reason
            ));
        }
    }

    out.join("\n")
}

/// All specialties, best first, with a proportional bar
pub fn format_standings(
    table: &ScoreTable,
    catalog: &Catalog,
    locale: Locale,
    use_colors: bool,
) -> String {
    if table.is_empty() {
        return "No specialties found.".to_string();
    }

    let max = table.max_score();
    let name_width = 24;

    table
        .standings()
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index_str = format!("{:>2}.", idx + 1);
            let name = truncate_text(display_name(catalog, &entry.key, locale), name_width);
            let name_padded = format!("{:<width$}", name, width = name_width);
            let score_str = format!("{:>4}", entry.score);
            let bar = score_bar(entry.score, max);

            let line = if use_colors {
                format!(
                    "{} {} {}  {}",
                    index_str.dimmed(),
                    name_padded,
                    score_str.bold(),
                    bar.green()
                )
            } else {
                format!("{} {} {}  {}", index_str, name_padded, score_str, bar)
            };
            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format scores as tab-separated values for scripting
/// Columns: rank, key, score (no headers, no colors)
pub fn format_tsv(table: &ScoreTable) -> String {
    table
        .standings()
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("{}\t{}\t{}", idx + 1, entry.key, entry.score))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_json(result: &MatchResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize result")
}

pub fn format_progress(progress: &Progress) -> String {
    if progress.is_complete() {
        format!("All {} questions answered.", progress.total)
    } else {
        format!(
            "{} of {} questions answered, {} to go.",
            progress.answered,
            progress.total,
            progress.remaining()
        )
    }
}

/// Past results, most recent first
pub fn format_history(
    records: &[QuizRecord],
    catalog: &Catalog,
    locale: Locale,
    now: DateTime<Utc>,
    use_colors: bool,
) -> String {
    if records.is_empty() {
        return "No quiz results yet.".to_string();
    }

    records
        .iter()
        .rev()
        .map(|record| {
            let name = display_name(catalog, &record.winner, locale);
            let top = record
                .scores
                .iter()
                .find(|s| s.key == record.winner)
                .map(|s| s.score)
                .unwrap_or(0);
            let note = match &record.outcome {
                RankOutcome::Winner => String::new(),
                RankOutcome::Tied { .. } => " (tie)".to_string(),
                RankOutcome::Fallback => " (default)".to_string(),
            };
            let age = record.format_age(now);
            if use_colors {
                format!("{:>14}  {} {}{}", age.dimmed(), name.bold(), top, note)
            } else {
                format!("{:>14}  {} {}{}", age, name, top, note)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Specialty list: key and display name
pub fn format_catalog(catalog: &Catalog, locale: Locale, use_colors: bool) -> String {
    let key_width = catalog
        .categories
        .iter()
        .map(|c| c.key.len())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = catalog
        .categories
        .iter()
        .map(|c| {
            let key = format!("{:<width$}", c.key, width = key_width);
            let marker = if c.key == catalog.fallback {
                " (default)"
            } else {
                ""
            };
            if use_colors {
                format!("{}  {}{}", key.cyan(), c.name.get(locale), marker.dimmed())
            } else {
                format!("{}  {}{}", key, c.name.get(locale), marker)
            }
        })
        .collect();

    lines.push(String::new());
    lines.push(format!(
        "{} specialties, {} questions",
        catalog.categories.len(),
        catalog.questions.len()
    ));
    lines.join("\n")
}
