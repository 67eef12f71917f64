use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;

use specialty_match::answers::{load_answers, AnswerSet};
use specialty_match::catalog::{validate_catalog, Catalog, Locale};
use specialty_match::config::{self, Config};
use specialty_match::output;
use specialty_match::quiz::{self, QuizOutcome};
use specialty_match::scoring::evaluate;
use specialty_match::state;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take the quiz (default if no subcommand). Resumes an unfinished quiz.
    Quiz {
        /// Discard saved progress and start over
        #[arg(long)]
        restart: bool,
    },
    /// Score a prepared answer set without prompting
    Score {
        /// JSON or YAML file mapping question ids to option ids
        #[arg(long)]
        answers: Option<PathBuf>,

        /// Single answer, e.g. `--answer 3=b` (repeatable, overrides the file)
        #[arg(long = "answer", value_name = "Q=O", value_parser = AnswerSet::parse_pair)]
        answer: Vec<(u32, String)>,

        /// Rank even if some questions are unanswered
        #[arg(long)]
        allow_partial: bool,

        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// List the specialties in the catalog
    Specialties,
    /// Describe one specialty
    Show {
        /// Specialty key, as shown by `specialties`
        key: String,
    },
    /// Print the active catalog as YAML
    ExportCatalog,
    /// Show past results
    History {
        /// Delete all saved results and progress
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "specialty-match")]
#[command(about = "Find the medical specialty that fits you", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/specialty-match/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Use a custom catalog file instead of the configured or bundled one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Show localized text where the catalog provides it
    #[arg(long, global = true)]
    localized: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to the state file (defaults to ~/.config/specialty-match/state.json)
    #[arg(long, global = true, hide = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Everything a subcommand needs after startup.
struct App {
    config: Config,
    catalog: Catalog,
    locale: Locale,
    use_colors: bool,
    verbose: bool,
    state_path: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = specialty_match::telemetry::init(cli.verbose) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let command = cli.command.unwrap_or(Commands::Quiz { restart: false });

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let catalog = match config::resolve_catalog(&config, cli.catalog) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Catalog error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate catalog at startup
    if let Err(errors) = validate_catalog(&catalog) {
        eprintln!("Catalog errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    tracing::info!(
        categories = catalog.categories.len(),
        questions = catalog.questions.len(),
        "catalog ready"
    );

    let app = App {
        locale: if cli.localized {
            Locale::Localized
        } else {
            config.locale
        },
        use_colors: !cli.no_color && output::should_use_colors(),
        verbose: cli.verbose,
        state_path: cli.state.unwrap_or_else(state::get_state_path),
        config,
        catalog,
    };

    let result = match command {
        Commands::Quiz { restart } => run_quiz(&app, restart),
        Commands::Score {
            answers,
            answer,
            allow_partial,
            format,
        } => run_score(&app, answers, answer, allow_partial, format),
        Commands::Specialties => {
            println!(
                "{}",
                output::format_catalog(&app.catalog, app.locale, app.use_colors)
            );
            Ok(EXIT_SUCCESS)
        }
        Commands::Show { key } => run_show(&app, &key),
        Commands::ExportCatalog => serde_saphyr::to_string(&app.catalog)
            .map(|yaml| {
                print!("{}", yaml);
                EXIT_SUCCESS
            })
            .map_err(|e| anyhow::anyhow!("Failed to serialize catalog: {}", e)),
        Commands::History { clear } => run_history(&app, clear),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    }
}

fn run_quiz(app: &App, restart: bool) -> anyhow::Result<i32> {
    let mut quiz_state = state::load_state(&app.state_path)
        .context("Run `specialty-match history --clear` to reset saved results")?;
    if restart && quiz_state.discard_progress() {
        println!("Discarded saved progress.");
    }

    let initial = quiz_state.resume_answers();
    if !initial.is_empty() {
        println!(
            "Resuming: {}",
            output::format_progress(&initial.progress(&app.catalog))
        );
    }

    let stdin = io::stdin();
    let outcome = quiz::run_quiz(
        &app.catalog,
        app.locale,
        initial,
        stdin.lock(),
        io::stdout(),
    )?;

    match outcome {
        QuizOutcome::Completed(answers) => {
            let result = evaluate(&app.catalog, &answers);
            quiz_state.record(&result, app.config.history_limit);
            state::save_state(&app.state_path, &quiz_state)?;

            println!();
            println!(
                "{}",
                output::format_result(&result, &app.catalog, app.locale, app.use_colors)
            );
            if app.verbose {
                println!();
                println!(
                    "{}",
                    output::format_standings(
                        &result.aggregation.table,
                        &app.catalog,
                        app.locale,
                        app.use_colors
                    )
                );
            }
        }
        QuizOutcome::Interrupted(answers) => {
            let progress = answers.progress(&app.catalog);
            quiz_state.save_progress(answers);
            state::save_state(&app.state_path, &quiz_state)?;

            println!();
            println!("{}", output::format_progress(&progress));
            if progress.answered > 0 {
                println!("Progress saved. Run `specialty-match quiz` to continue.");
            }
        }
    }

    Ok(EXIT_SUCCESS)
}

fn run_score(
    app: &App,
    answers_path: Option<PathBuf>,
    pairs: Vec<(u32, String)>,
    allow_partial: bool,
    format: OutputFormat,
) -> anyhow::Result<i32> {
    let mut answers = match answers_path {
        Some(path) => load_answers(&path)?,
        None => AnswerSet::new(),
    };
    for (question_id, option_id) in pairs {
        answers.select(question_id, option_id);
    }

    let progress = answers.progress(&app.catalog);
    if !progress.is_complete() {
        if !allow_partial {
            eprintln!("Incomplete answers: {}", output::format_progress(&progress));
            if let Some(next) = answers.next_unanswered(&app.catalog) {
                eprintln!("First unanswered question: {}", next.id);
            }
            eprintln!("Pass --allow-partial to rank anyway.");
            return Ok(EXIT_INPUT);
        }
        tracing::warn!(
            answered = progress.answered,
            total = progress.total,
            "ranking a partial answer set"
        );
    }

    let result = evaluate(&app.catalog, &answers);

    match format {
        OutputFormat::Table => {
            println!(
                "{}",
                output::format_result(&result, &app.catalog, app.locale, app.use_colors)
            );
            println!();
            println!(
                "{}",
                output::format_standings(
                    &result.aggregation.table,
                    &app.catalog,
                    app.locale,
                    app.use_colors
                )
            );
        }
        OutputFormat::Tsv => println!("{}", output::format_tsv(&result.aggregation.table)),
        OutputFormat::Json => println!("{}", output::format_json(&result)?),
    }

    Ok(EXIT_SUCCESS)
}

fn run_show(app: &App, key: &str) -> anyhow::Result<i32> {
    match app.catalog.category(key) {
        Some(category) => {
            println!(
                "{}",
                output::format_category(category, app.locale, app.use_colors)
            );
            Ok(EXIT_SUCCESS)
        }
        None => {
            eprintln!("Unknown specialty '{}'. Known specialties:", key);
            for known in app.catalog.category_keys() {
                eprintln!("  {}", known);
            }
            Ok(EXIT_INPUT)
        }
    }
}

fn run_history(app: &App, clear: bool) -> anyhow::Result<i32> {
    if clear {
        let cleared = state::reset_state(&app.state_path)?;
        println!("Cleared {} result(s).", cleared);
        return Ok(EXIT_SUCCESS);
    }

    let quiz_state = state::load_state(&app.state_path)
        .context("Run `specialty-match history --clear` to reset saved results")?;
    println!(
        "{}",
        output::format_history(
            &quiz_state.history,
            &app.catalog,
            app.locale,
            chrono::Utc::now(),
            app.use_colors
        )
    );

    if let Some(progress) = &quiz_state.in_progress {
        println!();
        println!(
            "Unfinished quiz: {}",
            output::format_progress(&progress.answers.progress(&app.catalog))
        );
    }

    Ok(EXIT_SUCCESS)
}
