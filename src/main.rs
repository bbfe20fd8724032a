use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use promptlib::nlp::{self, PromptAnalysis, TagNormalizer};
use promptlib::search::DateRange;
use promptlib::utils::{ensure_database_directory, export_file_name, get_database_path};
use promptlib::{
    Config, Database, Prompt, PromptBuilder, PromptError, PromptId, PromptService, PromptUpdate,
    SearchOptions, SortBy,
};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};
use tracing::warn;

/// promptlib - a local library of reusable prompts
#[derive(Parser)]
#[command(name = "promptlib")]
#[command(about = "Store, tag, analyse and search reusable prompts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Add a new prompt
    Add(AddCommand),
    /// Edit an existing prompt
    Edit(EditCommand),
    /// Delete a prompt
    Rm {
        /// Id of the prompt to delete
        id: String,
    },
    /// List all prompts
    List,
    /// Print one prompt as JSON
    Show {
        /// Id of the prompt to show
        id: String,
    },
    /// Search prompts by text, tags and date
    Search(SearchCommand),
    /// Suggest search queries from history and tags
    Suggest {
        /// Partial query; omit to list recent searches
        input: Option<String>,
    },
    /// List prompts similar to a given prompt
    Similar {
        /// Id of the reference prompt
        id: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show keywords, suggested tags, sentiment and intent
    Analyze(AnalyzeCommand),
    /// List every tag in the library
    Tags,
    /// Show or clear search history
    History {
        /// Remove all stored history
        #[arg(long)]
        clear: bool,
    },
    /// Merge prompts from a JSON export file
    Import {
        /// Path to a JSON array of prompts
        file: PathBuf,
    },
    /// Write the library to a JSON file
    Export {
        /// Output path; defaults to prompt-library-YYYY-MM-DD.json
        file: Option<PathBuf>,
    },
    /// Add starter prompts to an empty library
    Seed,
}

/// Add a new prompt
#[derive(Parser)]
struct AddCommand {
    /// Prompt title
    #[arg(value_name = "TITLE")]
    title: String,

    /// Prompt text
    #[arg(value_name = "CONTENT")]
    content: String,

    /// Comma-separated tags to apply to the prompt
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,

    /// Apply suggested topic tags when no tags are given
    #[arg(long)]
    suggest: bool,
}

/// Edit an existing prompt
#[derive(Parser)]
struct EditCommand {
    /// Id of the prompt to edit
    id: String,

    /// New title
    #[arg(long)]
    title: Option<String>,

    /// New content
    #[arg(long)]
    content: Option<String>,

    /// Replacement comma-separated tags
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

/// Search prompts
#[derive(Parser)]
struct SearchCommand {
    /// Text to search for
    query: Option<String>,

    /// Required tag (repeat for several; all must match)
    #[arg(short, long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    /// Only prompts created on or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_start)]
    since: Option<OffsetDateTime>,

    /// Only prompts created on or before this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_end)]
    until: Option<OffsetDateTime>,

    /// Disable approximate matching
    #[arg(long)]
    no_fuzzy: bool,

    /// Do not match against titles
    #[arg(long)]
    no_title: bool,

    /// Do not match against content
    #[arg(long)]
    no_content: bool,

    /// Result ordering
    #[arg(short, long, value_enum, default_value_t = SortArg::Relevance)]
    sort: SortArg,
}

/// Analyse a stored prompt or free text
#[derive(Parser)]
struct AnalyzeCommand {
    /// Prompt id, or the text itself with --text
    target: String,

    /// Treat TARGET as raw text instead of a prompt id
    #[arg(long)]
    text: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Relevance,
    Date,
    Title,
}

impl From<SortArg> for SortBy {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Relevance => SortBy::Relevance,
            SortArg::Date => SortBy::Date,
            SortArg::Title => SortBy::Title,
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = open_service(&config)
        .and_then(|mut service| {
            execute(&cli.command, &mut service, &config, &mut io::stdout().lock())
        });

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "promptlib=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are bad input: blank fields, unknown ids, malformed imports.
fn is_user_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<PromptError>()
        .is_some_and(PromptError::is_user_error)
}

/// Opens the configured database and restores search history.
fn open_service(config: &Config) -> Result<PromptService> {
    let db_path = get_database_path(config)?;
    ensure_database_directory(&db_path)?;

    let db = Database::open(&db_path).context("Failed to open database")?;
    let mut service = PromptService::new(db);

    if let Err(e) = service.load_history() {
        warn!(error = %e, "ignoring unreadable search history");
    }
    Ok(service)
}

/// Runs one command against a service, writing output to `out`.
///
/// Separated from `main` so commands can be tested with in-memory databases.
fn execute(
    command: &Commands,
    service: &mut PromptService,
    config: &Config,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Commands::Add(cmd) => {
            let mut tags = cmd.tags.as_deref().map(TagNormalizer::parse).unwrap_or_default();
            if tags.is_empty() && cmd.suggest {
                let text = format!("{} {}", cmd.title, cmd.content);
                tags = nlp::suggest_tags(&text, config.tag_limit);
            }

            let prompt = service
                .create_prompt(&cmd.title, &cmd.content, &tags)
                .context("Failed to create prompt")?;

            write!(out, "Prompt created (id: {})", prompt.id)?;
            if !prompt.tags.is_empty() {
                write!(out, " with tags: {}", prompt.tags.join(", "))?;
            }
            writeln!(out)?;
        }
        Commands::Edit(cmd) => {
            let update = PromptUpdate {
                title: cmd.title.clone(),
                content: cmd.content.clone(),
                tags: cmd.tags.as_deref().map(TagNormalizer::parse),
            };
            let prompt = service.update_prompt(&PromptId::new(cmd.id.as_str()), update)?;
            writeln!(out, "Prompt updated (id: {})", prompt.id)?;
        }
        Commands::Rm { id } => {
            service.delete_prompt(&PromptId::new(id.as_str()))?;
            writeln!(out, "Prompt deleted (id: {id})")?;
        }
        Commands::List => {
            let prompts = service.list_prompts()?;
            print_prompts(out, prompts.iter())?;
        }
        Commands::Show { id } => {
            let id = PromptId::new(id.as_str());
            let prompt = service
                .get_prompt(&id)?
                .ok_or(PromptError::NotFound(id))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&prompt)?)?;
        }
        Commands::Search(cmd) => {
            let options = search_options(cmd, config);
            let results = service.search(&options)?;
            print_prompts(out, results.iter())?;
        }
        Commands::Suggest { input } => {
            for suggestion in service.suggestions(input.as_deref().unwrap_or(""))? {
                writeln!(out, "{suggestion}")?;
            }
        }
        Commands::Similar { id, limit } => {
            let limit = limit.unwrap_or(config.similar_limit);
            let similar = service.similar_to(&PromptId::new(id.as_str()), limit)?;
            if similar.is_empty() {
                writeln!(out, "No similar prompts found.")?;
            }
            for (prompt, similarity) in similar {
                writeln!(out, "{:.2}  {}  {}", similarity, prompt.id, prompt.title)?;
            }
        }
        Commands::Analyze(cmd) => {
            let analysis = if cmd.text {
                let prompt = PromptBuilder::new().content(cmd.target.as_str()).build();
                PromptAnalysis::of(&prompt, config.keyword_limit, config.tag_limit)
            } else {
                let id = PromptId::new(cmd.target.as_str());
                service.analyze(&id, config.keyword_limit, config.tag_limit)?
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&analysis)?)?;
        }
        Commands::Tags => {
            for tag in service.all_tags()? {
                writeln!(out, "{tag}")?;
            }
        }
        Commands::History { clear } => {
            if *clear {
                service.clear_history()?;
                writeln!(out, "Search history cleared")?;
            } else {
                for query in service.history().entries() {
                    writeln!(out, "{query}")?;
                }
            }
        }
        Commands::Import { file } => {
            let raw = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = service.import_json(&raw)?;
            writeln!(
                out,
                "Imported {} of {} prompts ({} already present)",
                report.imported,
                report.total,
                report.skipped()
            )?;
        }
        Commands::Export { file } => {
            let path = file.clone().unwrap_or_else(|| {
                PathBuf::from(export_file_name(OffsetDateTime::now_utc().date()))
            });
            let json = service.export_json()?;
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            writeln!(out, "Exported library to {}", path.display())?;
        }
        Commands::Seed => {
            let added = service.seed_examples()?;
            writeln!(out, "Added {added} example prompts")?;
        }
    }

    Ok(())
}

fn search_options(cmd: &SearchCommand, config: &Config) -> SearchOptions {
    let date_range = (cmd.since.is_some() || cmd.until.is_some()).then_some(DateRange {
        start: cmd.since,
        end: cmd.until,
    });

    SearchOptions {
        query: cmd.query.clone().unwrap_or_default(),
        tags: cmd.tags.clone(),
        date_range,
        fuzzy_match: config.fuzzy_match && !cmd.no_fuzzy,
        search_in_content: !cmd.no_content,
        search_in_title: !cmd.no_title,
        sort_by: cmd.sort.into(),
    }
}

fn print_prompts<'a>(out: &mut dyn Write, prompts: impl Iterator<Item = &'a Prompt>) -> Result<()> {
    let mut count = 0;
    for prompt in prompts {
        count += 1;
        write!(out, "{}  {}", prompt.id, prompt.title)?;
        if !prompt.tags.is_empty() {
            write!(out, "  [{}]", prompt.tags.join(", "))?;
        }
        writeln!(out)?;
    }
    if count == 0 {
        writeln!(out, "No prompts found.")?;
    }
    Ok(())
}

/// Parses a lower date bound: a full RFC 3339 timestamp, or a calendar day
/// meaning its first instant in UTC.
fn parse_start(input: &str) -> Result<OffsetDateTime, String> {
    parse_bound(input, Duration::ZERO)
}

/// Parses an upper date bound: a full RFC 3339 timestamp, or a calendar day
/// meaning its last instant in UTC.
fn parse_end(input: &str) -> Result<OffsetDateTime, String> {
    parse_bound(input, Duration::DAY - Duration::NANOSECOND)
}

fn parse_bound(input: &str, offset_into_day: Duration) -> Result<OffsetDateTime, String> {
    if let Ok(at) = OffsetDateTime::parse(input, &Rfc3339) {
        return Ok(at);
    }

    Date::parse(input, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_utc() + offset_into_day)
        .map_err(|_| format!("expected YYYY-MM-DD or an RFC 3339 timestamp, got '{input}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn service() -> PromptService {
        PromptService::new(Database::in_memory().expect("failed to create in-memory database"))
    }

    fn run(service: &mut PromptService, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("promptlib").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        execute(&cli.command, service, &Config::default(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn parse_start_accepts_plain_dates() {
        assert_eq!(parse_start("2024-03-01").unwrap(), datetime!(2024-03-01 0:00 UTC));
    }

    #[test]
    fn parse_end_covers_whole_day() {
        assert_eq!(
            parse_end("2024-03-01").unwrap(),
            datetime!(2024-03-02 0:00 UTC) - Duration::NANOSECOND
        );
    }

    #[test]
    fn parse_bound_accepts_rfc3339() {
        assert_eq!(
            parse_start("2024-03-01T12:30:00Z").unwrap(),
            datetime!(2024-03-01 12:30 UTC)
        );
        assert!(parse_start("March first").is_err());
    }

    #[test]
    fn add_with_tags_reports_id_and_tags() {
        let mut service = service();
        let args = ["add", "Review", "Explain this code", "-t", "code, review"];
        let output = run(&mut service, &args).unwrap();

        assert!(output.starts_with("Prompt created (id: "));
        assert!(output.trim_end().ends_with("with tags: code, review"));
    }

    #[test]
    fn add_with_suggest_applies_topic_tags() {
        let mut service = service();
        let args = ["add", "Hero", "Write a short story about a hero", "--suggest"];
        run(&mut service, &args).unwrap();

        let prompts = service.list_prompts().unwrap();
        assert_eq!(prompts[0].tags[0], "writing");
    }

    #[test]
    fn add_rejects_blank_content_as_user_error() {
        let mut service = service();
        let err = run(&mut service, &["add", "Title", "   "]).unwrap_err();
        assert!(is_user_error(&err));
        assert!(err.to_string().contains("Failed to create prompt"));
    }

    #[test]
    fn search_prints_matching_prompts() {
        let mut service = service();
        run(&mut service, &["seed"]).unwrap();

        let output = run(&mut service, &["search", "story"]).unwrap();
        assert_eq!(output, "example1  Creative Writing  [writing, creative]\n");

        let output = run(&mut service, &["search", "zzzzzzzz", "--no-fuzzy"]).unwrap();
        assert_eq!(output, "No prompts found.\n");
    }

    #[test]
    fn search_by_tags_requires_all() {
        let mut service = service();
        run(&mut service, &["seed"]).unwrap();

        let output = run(&mut service, &["search", "-t", "programming", "-t", "code"]).unwrap();
        assert!(output.starts_with("example2"));

        let output = run(&mut service, &["search", "-t", "programming", "-t", "writing"]).unwrap();
        assert_eq!(output, "No prompts found.\n");
    }

    #[test]
    fn history_lists_and_clears_queries() {
        let mut service = service();
        run(&mut service, &["search", "dragons"]).unwrap();
        run(&mut service, &["search", "castles"]).unwrap();

        assert_eq!(run(&mut service, &["history"]).unwrap(), "castles\ndragons\n");
        run(&mut service, &["history", "--clear"]).unwrap();
        assert_eq!(run(&mut service, &["history"]).unwrap(), "");
    }

    #[test]
    fn unknown_id_is_user_error() {
        let mut service = service();
        let err = run(&mut service, &["show", "missing"]).unwrap_err();
        assert!(is_user_error(&err));
    }

    #[test]
    fn analyze_text_prints_json() {
        let mut service = service();
        let output = run(&mut service, &["analyze", "--text", "Explain this code?"]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["intent"], "question");
        assert_eq!(json["suggestedTags"][0], "programming");
    }

    #[test]
    fn export_and_import_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        let path_arg = path.to_str().unwrap();

        let mut source = service();
        run(&mut source, &["seed"]).unwrap();
        run(&mut source, &["export", path_arg]).unwrap();

        let mut target = service();
        let output = run(&mut target, &["import", path_arg]).unwrap();
        assert_eq!(output, "Imported 2 of 2 prompts (0 already present)\n");
    }

    #[test]
    fn sort_arg_maps_to_sort_by() {
        assert_eq!(SortBy::from(SortArg::Title), SortBy::Title);
        assert_eq!(SortBy::from(SortArg::Date), SortBy::Date);
    }
}
