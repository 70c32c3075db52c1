//! placard-cli - Offline driver for the announcements block pipeline.
//!
//! Runs the same extraction, filtering, and rendering the page runs at
//! message time, but against local files (or a live configuration URL)
//! so authored blocks can be inspected and validated before publish.

use clap::{Parser, Subcommand};
use placard_core::session::{AnnouncementSession, RuntimeMessage};
use placard_core::{HttpConfigSource, StaticConfigSource, extract_from_markup, load_settings};
use placard_types::{BlockSettings, ConfigDocument, RuntimeContext};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser)]
#[command(name = "placard-cli", about = "Inspect and render announcement blocks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract announcement records from an authored block file
    Extract {
        /// Path to the authored block markup
        block: PathBuf,

        /// Emit records as JSON instead of a summary listing
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline once and print the rendered markup
    Render {
        /// Path to the authored block markup
        block: PathBuf,

        /// Runtime context as a JSON object file
        #[arg(long)]
        context: PathBuf,

        /// Configuration document file (JSON `{ "data": [...] }`)
        #[arg(long, conflicts_with = "config_url")]
        config: Option<PathBuf>,

        /// Fetch the configuration document from a URL instead
        #[arg(long)]
        config_url: Option<String>,

        /// Optional block settings TOML
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Check an authored block for structural problems
    Check {
        /// Path to the authored block markup
        block: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract { block, json } => run_extract(&block, json),
        Command::Render {
            block,
            context,
            config,
            config_url,
            settings,
        } => run_render(&block, &context, config.as_deref(), config_url.as_deref(), settings.as_deref()).await,
        Command::Check { block } => run_check(&block),
    }
}

fn read_file(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read file");
            None
        }
    }
}

fn run_extract(block: &Path, json: bool) -> ExitCode {
    let Some(markup) = read_file(block) else {
        return ExitCode::FAILURE;
    };
    let records = extract_from_markup(&markup);

    if json {
        match serde_json::to_string_pretty(&records) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize records");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    for record in &records {
        let id = record
            .id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let buttons = [&record.primary_button, &record.secondary_button]
            .into_iter()
            .flatten()
            .count();
        println!(
            "id={id:<8} buttons={buttons} title={:?}",
            record.title
        );
    }
    println!("{} record(s)", records.len());
    ExitCode::SUCCESS
}

async fn run_render(
    block: &Path,
    context: &Path,
    config: Option<&Path>,
    config_url: Option<&str>,
    settings_path: Option<&Path>,
) -> ExitCode {
    let settings = match settings_path {
        Some(path) => match load_settings(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!(error = %e, "failed to load settings");
                return ExitCode::FAILURE;
            }
        },
        None => BlockSettings::default(),
    };

    let Some(markup) = read_file(block) else {
        return ExitCode::FAILURE;
    };
    let Some(context_json) = read_file(context) else {
        return ExitCode::FAILURE;
    };
    let ctx: RuntimeContext = match serde_json::from_str(&context_json) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!(error = %e, "context file is not a JSON object of scalars");
            return ExitCode::FAILURE;
        }
    };

    let session = AnnouncementSession::from_markup(&markup, settings);
    let message = RuntimeMessage::new(ctx);

    let rendered = match (config, config_url) {
        (Some(path), _) => {
            let Some(config_json) = read_file(path) else {
                return ExitCode::FAILURE;
            };
            let document: ConfigDocument = match serde_json::from_str(&config_json) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::error!(error = %e, "configuration file is not valid JSON");
                    return ExitCode::FAILURE;
                }
            };
            session
                .handle_message(&message, &StaticConfigSource::new(document))
                .await
        }
        (None, Some(url)) => {
            session
                .handle_message(&message, &HttpConfigSource::new(url, ""))
                .await
        }
        (None, None) => {
            tracing::error!("render requires --config or --config-url");
            return ExitCode::FAILURE;
        }
    };

    match rendered {
        Ok(Some(html)) => {
            println!("{html}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            tracing::warn!("message was dropped by policy; nothing rendered");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "render failed");
            ExitCode::FAILURE
        }
    }
}

fn run_check(block: &Path) -> ExitCode {
    let Some(markup) = read_file(block) else {
        return ExitCode::FAILURE;
    };
    let records = extract_from_markup(&markup);

    if records.is_empty() {
        println!("no announcement rows found");
        return ExitCode::FAILURE;
    }

    let mut problems = 0usize;
    let mut seen_ids: Vec<i64> = Vec::new();
    for (row, record) in records.iter().enumerate() {
        let row = row + 1;
        match record.id {
            None => {
                problems += 1;
                println!("row {row}: missing or non-numeric id");
            }
            Some(id) if seen_ids.contains(&id) => {
                problems += 1;
                println!("row {row}: duplicate id {id} (matching is ambiguous)");
            }
            Some(id) => seen_ids.push(id),
        }
        if record.title.is_empty() {
            problems += 1;
            println!("row {row}: missing heading");
        }
        for (slot, button) in [
            ("primary", &record.primary_button),
            ("secondary", &record.secondary_button),
        ] {
            if let Some(button) = button
                && button.url_template.is_empty()
            {
                problems += 1;
                println!("row {row}: {slot} button {:?} has no URL", button.title);
            }
        }
    }

    if problems == 0 {
        println!("{} record(s), no problems", records.len());
        ExitCode::SUCCESS
    } else {
        println!("{problems} problem(s) in {} record(s)", records.len());
        ExitCode::FAILURE
    }
}
