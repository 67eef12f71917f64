use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, Locale, Question};

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    /// Every catalog question has an answer.
    Completed(AnswerSet),
    /// The user stopped early (or input ran out).
    Interrupted(AnswerSet),
}

enum Choice {
    Option(String),
    Back,
    Quit,
}

/// Read one trimmed line. `None` on end of input.
fn read_line(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}

/// Accepts a 1-based option number, an option id, or a command.
/// `<` always means back; otherwise option numbers and ids take precedence
/// over the word commands.
fn parse_choice(question: &Question, input: &str) -> Option<Choice> {
    if input == "<" {
        return Some(Choice::Back);
    }

    if let Ok(n) = input.parse::<usize>() {
        if n >= 1 && n <= question.options.len() {
            return Some(Choice::Option(question.options[n - 1].id.clone()));
        }
    }

    if let Some(option) = question.option(input) {
        return Some(Choice::Option(option.id.clone()));
    }

    match input.to_lowercase().as_str() {
        "back" => Some(Choice::Back),
        "q" | "quit" => Some(Choice::Quit),
        _ => None,
    }
}

fn write_question(
    output: &mut impl Write,
    question: &Question,
    number: usize,
    total: usize,
    locale: Locale,
) -> Result<()> {
    writeln!(output)?;
    writeln!(output, "[{}/{}] {}", number, total, question.prompt.get(locale))?;
    for (i, option) in question.options.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, option.prompt.get(locale))?;
    }
    write!(output, "Your choice (number, < = back, q = quit): ")?;
    output.flush().context("Failed to flush output")?;
    Ok(())
}

/// Ask every unanswered question in catalog order.
///
/// `initial` carries answers from an earlier, interrupted session. Going
/// back clears the most recent answer so it is asked again.
pub fn run_quiz(
    catalog: &Catalog,
    locale: Locale,
    initial: AnswerSet,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<QuizOutcome> {
    let mut answers = initial;
    let mut history: Vec<u32> = catalog
        .questions
        .iter()
        .filter(|q| answers.get(q.id).is_some())
        .map(|q| q.id)
        .collect();
    let total = catalog.questions.len();

    while let Some(question) = answers.next_unanswered(catalog) {
        let number = answers.progress(catalog).answered + 1;
        write_question(&mut output, question, number, total, locale)?;

        let Some(line) = read_line(&mut input)? else {
            writeln!(output)?;
            return Ok(QuizOutcome::Interrupted(answers));
        };

        match parse_choice(question, &line) {
            Some(Choice::Option(option_id)) => {
                tracing::debug!(question_id = question.id, option_id = %option_id, "answered");
                answers.select(question.id, option_id);
                history.push(question.id);
            }
            Some(Choice::Back) => match history.pop() {
                Some(previous) => {
                    answers.clear(previous);
                }
                None => writeln!(output, "  Already at the first question.")?,
            },
            Some(Choice::Quit) => return Ok(QuizOutcome::Interrupted(answers)),
            None => writeln!(
                output,
                "  Invalid choice '{}'. Enter a number between 1 and {}.",
                line,
                question.options.len()
            )?,
        }
    }

    Ok(QuizOutcome::Completed(answers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, initial: AnswerSet) -> (QuizOutcome, String) {
        let catalog = Catalog::builtin();
        let mut output = Vec::new();
        let outcome = run_quiz(
            &catalog,
            Locale::Base,
            initial,
            Cursor::new(input.to_string()),
            &mut output,
        )
        .unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_complete_by_number() {
        let (outcome, output) = run("1\n2\n3\n4\n1\n2\n3\n4\n", AnswerSet::new());
        let QuizOutcome::Completed(answers) = outcome else {
            panic!("expected completed quiz");
        };
        assert_eq!(answers.len(), 8);
        assert_eq!(answers.get(1), Some("a"));
        assert_eq!(answers.get(4), Some("d"));
        assert!(output.contains("[1/8]"));
        assert!(output.contains("[8/8]"));
    }

    #[test]
    fn test_accepts_option_ids() {
        let (outcome, _) = run("c\nC\n", AnswerSet::new());
        let QuizOutcome::Interrupted(answers) = outcome else {
            panic!("expected interrupted quiz");
        };
        assert_eq!(answers.get(1), Some("c"));
        // Option ids are matched exactly; "C" is not an id in question 2
        assert_eq!(answers.get(2), None);
    }

    #[test]
    fn test_quit_keeps_answers() {
        let (outcome, _) = run("2\nq\n", AnswerSet::new());
        let QuizOutcome::Interrupted(answers) = outcome else {
            panic!("expected interrupted quiz");
        };
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(1), Some("b"));
    }

    #[test]
    fn test_eof_interrupts() {
        let (outcome, _) = run("", AnswerSet::new());
        assert_eq!(outcome, QuizOutcome::Interrupted(AnswerSet::new()));
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let (outcome, output) = run("9\nnope\n1\nq\n", AnswerSet::new());
        assert!(output.contains("Invalid choice '9'"));
        assert!(output.contains("Invalid choice 'nope'"));
        let QuizOutcome::Interrupted(answers) = outcome else {
            panic!("expected interrupted quiz");
        };
        assert_eq!(answers.get(1), Some("a"));
    }

    #[test]
    fn test_back_clears_previous_answer() {
        let (outcome, _) = run("1\n1\n<\n3\nq\n", AnswerSet::new());
        let QuizOutcome::Interrupted(answers) = outcome else {
            panic!("expected interrupted quiz");
        };
        assert_eq!(answers.get(1), Some("a"));
        assert_eq!(answers.get(2), Some("c"));
    }

    #[test]
    fn test_back_token_never_collides_with_option_ids() {
        // Every builtin question has an option "b", so "b" answers rather than going back
        let (outcome, _) = run("1\nb\n<\n<\nq\n", AnswerSet::new());
        let QuizOutcome::Interrupted(answers) = outcome else {
            panic!("expected interrupted quiz");
        };
        assert!(answers.is_empty());

        let mut catalog = Catalog::builtin();
        catalog.questions[1].options[0].id = "<".to_string();
        let mut output = Vec::new();
        let outcome = run_quiz(
            &catalog,
            Locale::Base,
            AnswerSet::new(),
            Cursor::new("1\n<\nq\n".to_string()),
            &mut output,
        )
        .unwrap();
        assert_eq!(outcome, QuizOutcome::Interrupted(AnswerSet::new()));
    }

    #[test]
    fn test_back_word_command() {
        let (outcome, _) = run("2\nback\nq\n", AnswerSet::new());
        assert_eq!(outcome, QuizOutcome::Interrupted(AnswerSet::new()));
    }

    #[test]
    fn test_back_at_start() {
        let (_, output) = run("<\nq\n", AnswerSet::new());
        assert!(output.contains("Already at the first question."));
    }

    #[test]
    fn test_resume_skips_answered_questions() {
        let mut initial = AnswerSet::new();
        for id in 1..=7 {
            initial.select(id, "a");
        }
        let (outcome, output) = run("4\n", initial);
        assert!(!output.contains("[1/8]"));
        assert!(output.contains("[8/8]"));
        let QuizOutcome::Completed(answers) = outcome else {
            panic!("expected completed quiz");
        };
        assert_eq!(answers.get(8), Some("d"));
    }
}
