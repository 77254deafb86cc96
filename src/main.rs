//! batchwatch - submit Anthropic message batches and get notified when they end

#![allow(missing_docs)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use batchwatch::core::batch::{BatchOutcome, BatchResultItem, ContentBlock, error_message};
use batchwatch::utils::logging::init_logging;
use batchwatch::utils::truncate_string;
use batchwatch::{BatchStore, BatchWatch, Config, build_info};
use clap::{Parser, Subcommand};
use tracing::info;

/// Width of the text column printed by `results`
const PREVIEW_WIDTH: usize = 80;

#[derive(Parser)]
#[command(name = "batchwatch", version, about)]
struct Cli {
    /// YAML configuration file; environment variables override its values
    #[arg(short, long, env = "BATCHWATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit prompts as one batch and register it for monitoring
    Submit {
        #[arg(required = true)]
        prompts: Vec<String>,
    },
    /// Fetch and record the current status of a batch
    Status { batch_id: String },
    /// Print a summary of the results of an ended batch
    Results { batch_id: String },
    /// Print the prompts stored for a batch
    Messages { batch_id: String },
    /// List stored batches, newest first
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Monitor batches until Ctrl-C; stored unfinished batches are included
    Watch { batch_ids: Vec<String> },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;
    init_logging(&config.logging).context("failed to initialise logging")?;

    let build = build_info();
    info!("batchwatch {} ({})", build.version, build.git_hash);

    if !matches!(cli.command, Command::History { .. } | Command::Messages { .. }) {
        config.require_api_key()?;
    }

    let app = BatchWatch::new(config).await?;

    match cli.command {
        Command::Submit { prompts } => {
            let batch = app.submission().submit_prompts(&prompts).await?;
            println!("{}\t{}", batch.id, batch.processing_status);
        }
        Command::Status { batch_id } => {
            let status = app.submission().refresh_status(&batch_id).await?;
            println!("{}\t{}", batch_id, status);
        }
        Command::Results { batch_id } => {
            let results = app
                .submission()
                .fetch_results(&batch_id)
                .await
                .with_context(|| format!("failed to fetch results of {}", batch_id))?;
            for item in &results {
                println!("{}", summarize(item));
            }
        }
        Command::Messages { batch_id } => {
            let messages = app.submission().stored_messages(&batch_id).await?;
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
        Command::History { limit } => {
            let history = app.store().history().await?;
            for record in history.iter().take(limit.unwrap_or(usize::MAX)) {
                println!(
                    "{}\t{}\t{}",
                    record.id,
                    record.status,
                    record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
            }
        }
        Command::Watch { batch_ids } => {
            for batch_id in &batch_ids {
                app.registry().add(batch_id);
            }
            app.resume_unfinished().await?;
            info!("Monitoring {} batches", app.registry().len());

            let handle = app.registry().start();
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for Ctrl-C")?;

            info!("Shutting down");
            handle.stop();
            handle.stopped().await;
        }
    }

    Ok(())
}

/// One line per result: correlation id, outcome and a text preview
fn summarize(item: &BatchResultItem) -> String {
    let detail = match &item.result {
        BatchOutcome::Succeeded(message) => message
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other { .. } => None,
            })
            .collect::<Vec<_>>()
            .join(" "),
        BatchOutcome::Errored(detail) => error_message(detail),
        _ => String::new(),
    };

    format!(
        "{}\t{}\t{}",
        item.custom_id,
        item.result.kind(),
        truncate_string(&detail.replace('\n', " "), PREVIEW_WIDTH)
    )
}
