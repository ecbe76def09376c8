use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use author_notify::config::{Config, ConfigError, Token};
use author_notify::fetch::fetch_repo_index;
use author_notify::github::OctocrabClient;
use author_notify::index::build_index;
use author_notify::notify::{Dispatcher, SkipReason, read_event};
use author_notify::persistence::{load_mapping, save_mapping_atomic};

#[derive(Debug, Parser)]
#[command(name = "author-notify", version, about = "Notify script authors about discussion comments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rebuild the author mapping from the published script tree.
    Sync {
        /// Where to write the mapping. Defaults to AUTHOR_NOTIFY_MAPPING_PATH.
        #[arg(long)]
        output: Option<PathBuf>,

        /// URL of the gzip-compressed repo.json.
        #[arg(long)]
        source_url: Option<String>,
    },

    /// Forward one discussion comment event to the script's authors.
    Notify {
        /// Event payload. Defaults to GITHUB_EVENT_PATH.
        #[arg(long)]
        event: Option<PathBuf>,

        /// Mapping to read. Defaults to AUTHOR_NOTIFY_MAPPING_PATH.
        #[arg(long)]
        mapping: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "author_notify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let result = match Config::from_env() {
        Ok(config) => run(cli.command, &config).await,
        Err(e) => Err(e.into()),
    };

    ExitCode::from(exit_status(result))
}

/// Process exit status for a run: 0 on completion, including runs that had
/// nothing to do, and 1 on a fatal error.
fn exit_status(result: anyhow::Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{e:#}");
            1
        }
    }
}

async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Sync { output, source_url } => {
            let output = output.unwrap_or_else(|| config.mapping_path.clone());
            let url = source_url.as_deref().unwrap_or(&config.source_url);
            sync(url, &output).await
        }
        Command::Notify { event, mapping } => {
            let token = config.require_token()?;
            let event = event
                .or_else(|| config.event_path.clone())
                .ok_or(ConfigError::Missing("GITHUB_EVENT_PATH"))?;
            let mapping = mapping.unwrap_or_else(|| config.mapping_path.clone());
            notify(config, token, &event, &mapping).await
        }
    }
}

async fn sync(url: &str, output: &std::path::Path) -> anyhow::Result<()> {
    info!(url, "Fetching repository index");
    let document = fetch_repo_index(url)
        .await
        .context("failed to fetch repository index")?;

    let mapping = build_index(&document.indexes);
    let stats = mapping.stats();
    save_mapping_atomic(output, &mapping)
        .with_context(|| format!("failed to write {}", output.display()))?;

    info!(
        path = %output.display(),
        total = stats.total_paths,
        with_authors = stats.paths_with_authors,
        without_authors = stats.paths_without_authors,
        "Author mapping written"
    );
    Ok(())
}

async fn notify(
    config: &Config,
    token: &Token,
    event_path: &std::path::Path,
    mapping_path: &std::path::Path,
) -> anyhow::Result<()> {
    let event = read_event(event_path)?;

    let mapping = match load_mapping(mapping_path) {
        Ok(mapping) => mapping,
        Err(e) => {
            warn!(
                path = %mapping_path.display(),
                error = %e,
                reason = %SkipReason::MappingUnavailable,
                "Skipping event"
            );
            return Ok(());
        }
    };

    let client = OctocrabClient::from_token(token.expose(), config.repo.clone())
        .context("failed to build GitHub client")?
        .with_max_retries(config.github_retries);

    let report = Dispatcher::new(&client, &config.notify)
        .dispatch(&event, &mapping)
        .await;
    if report.skipped.is_none() {
        info!(
            notified = report.notified.len(),
            failed = report.failed.len(),
            "Done"
        );
    }
    Ok(())
}
