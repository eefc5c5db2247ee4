use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use plans4you_client::{HttpRecommendationClient, RecommendationSource, StaticSource};
use plans4you_common::Plans4YouConfig;
use plans4you_core::form::FormDraft;
use plans4you_core::household::HouseholdSummary;
use plans4you_core::{normalize, render, Payload, RenderedView, SubmissionTracker};
use plans4you_tui::{plain_text, recommendation_lines};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plans4you")]
#[command(about = "Healthcare plan recommendations for your household")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override the recommendation endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Override the delay before each request, in milliseconds
    #[arg(long, global = true)]
    pub delay_ms: Option<u64>,

    /// Answer every request with the payload stored in this file
    #[arg(long, global = true)]
    pub payload_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive form and results view
    Interactive,
    /// Request recommendations for one household and print them
    Recommend {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        /// Total annual household income in USD
        #[arg(long)]
        income: String,
        #[arg(long, default_value = "0")]
        dependents: String,
        /// Two-letter state code
        #[arg(long)]
        state: String,
        /// Whether dental coverage is required (yes/no)
        #[arg(long, default_value = "no")]
        dental: String,
    },
    /// Normalize a saved payload and print the result
    Render {
        /// Path to a JSON or plain-text payload
        file: PathBuf,
    },
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_warnings) = Plans4YouConfig::from_env();
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(ms) = cli.delay_ms {
        config.response_delay_ms = ms;
    }

    // The terminal UI owns the screen, so interactive runs log to a file.
    let log_file = match cli.command {
        Some(Commands::Interactive) | None => Some(config.log_file()),
        _ => None,
    };
    init_logging(cli.debug, log_file)?;
    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    match cli.command {
        Some(Commands::Recommend {
            name,
            age,
            income,
            dependents,
            state,
            dental,
        }) => {
            let draft = FormDraft {
                name,
                age,
                income,
                dependents,
                state,
                dental,
            };
            let source = source_for(&config, cli.payload_file.as_deref()).await?;
            recommend(&draft, source.as_ref()).await?;
        }
        Some(Commands::Render { file }) => {
            let payload = read_payload(&file).await?;
            print_view(&render(&normalize(&payload)));
        }
        Some(Commands::Interactive) | None => {
            let source = source_for(&config, cli.payload_file.as_deref()).await?;
            plans4you_tui::run_interactive(source).await?;
        }
    }

    Ok(())
}

async fn recommend(draft: &FormDraft, source: &dyn RecommendationSource) -> Result<()> {
    let mut tracker = SubmissionTracker::new();
    let submission = tracker.submit(draft)?;

    let summary = HouseholdSummary::from_form(&submission.form);
    println!("{}\n", summary.describe(&submission.form.name));

    let payload = source.fetch(&submission.form).await;
    tracker.complete(&submission.id, &payload)?;
    print_view(&tracker.view());
    Ok(())
}

async fn source_for(
    config: &Plans4YouConfig,
    payload_file: Option<&Path>,
) -> Result<Arc<dyn RecommendationSource>> {
    match payload_file {
        Some(path) => Ok(Arc::new(StaticSource::new(read_payload(path).await?))),
        None => {
            let client = HttpRecommendationClient::new(config)?;
            tracing::info!("Using recommendation endpoint {}", client.endpoint());
            Ok(Arc::new(client))
        }
    }
}

async fn read_payload(path: &Path) -> Result<Payload> {
    let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read payload file {}", path.display()))?;
    Ok(Payload::from_body(&body))
}

fn print_view(view: &RenderedView) {
    let text = plain_text(&recommendation_lines(view));
    if !text.is_empty() {
        println!("{}", text.trim_end());
    }
}

/// Log to `log_file` when given, else stderr.
fn init_logging(debug: bool, log_file: Option<PathBuf>) -> Result<()> {
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let result = match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
    result.map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
