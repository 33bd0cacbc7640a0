//! Sprout caregiver CLI - Main entry point
//!
//! Terminal front end to the caregiver backend: show a child's progression
//! path, upload a recording as milestone evidence, or request a human review
//! override.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sprout_common::config::{TomlConfig, ENV_API_TOKEN, ENV_API_URL, ENV_CONFIG_PATH};
use sprout_common::human_time::format_bytes;
use sprout_common::{time, ChildId, MilestoneId};
use sprout_path::resolve_snapshot;
use sprout_studio::api::{ApiContext, BackendClient};
use sprout_studio::capture::Artifact;
use sprout_studio::logging;
use sprout_studio::presenter::render_progression;
use sprout_studio::upload::{content_type_for_extension, evidence_file_name};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt};

/// Command-line arguments for sprout
#[derive(Parser, Debug)]
#[command(name = "sprout")]
#[command(about = "Caregiver client for milestone progression and evidence capture")]
#[command(version)]
struct Args {
    /// Configuration file (default: platform config dir/sprout/sprout.toml)
    #[arg(short, long, env = ENV_CONFIG_PATH)]
    config: Option<PathBuf>,

    /// Backend API root, overrides the configuration file
    #[arg(long, env = ENV_API_URL)]
    base_url: Option<String>,

    /// Caregiver auth token, overrides the configuration file
    #[arg(long, env = ENV_API_TOKEN, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a child's milestone path, action queue and timeline
    Path {
        child_id: ChildId,
    },
    /// Upload a recording file as evidence for a milestone
    Upload {
        milestone_id: MilestoneId,
        file: PathBuf,
    },
    /// Ask the backend to complete a milestone's human review
    ForceReview {
        milestone_id: MilestoneId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing before config so resolution warnings are visible
    let (filter, filter_handle) = reload::Layer::new(logging::env_filter(logging::BOOTSTRAP_LEVEL));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = TomlConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?
        .with_cli_overrides(args.base_url, args.token)
        .context("Invalid command-line configuration")?;

    if !logging::rust_log_set() {
        filter_handle
            .reload(logging::env_filter(&config.logging.level))
            .context("Failed to apply configured log level")?;
    }

    info!(base_url = %config.api.base_url, "Using backend");

    let client = BackendClient::new(ApiContext::from(&config.api))
        .context("Failed to build backend client")?;

    match args.command {
        Command::Path { child_id } => show_path(&client, child_id).await,
        Command::Upload { milestone_id, file } => upload_file(&client, milestone_id, &file).await,
        Command::ForceReview { milestone_id } => force_review(&client, milestone_id).await,
    }
}

async fn show_path(client: &BackendClient, child_id: ChildId) -> Result<()> {
    let snapshot = client
        .fetch_snapshot(child_id)
        .await
        .with_context(|| format!("Failed to fetch child {}", child_id))?;

    let progression = resolve_snapshot(&snapshot);
    print!("{}", render_progression(&snapshot.child.name, &progression));
    Ok(())
}

async fn upload_file(client: &BackendClient, milestone_id: MilestoneId, file: &Path) -> Result<()> {
    let data = tokio::fs::read(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    if data.is_empty() {
        anyhow::bail!("{} is empty; nothing to upload", file.display());
    }

    let extension = file.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let artifact = Artifact::from_bytes(data, content_type_for_extension(extension), time::now());
    let file_name = evidence_file_name(milestone_id, artifact.content_type(), artifact.captured_at());

    info!(
        milestone_id = %milestone_id,
        file_name = %file_name,
        content_type = %artifact.content_type(),
        size = %format_bytes(artifact.len() as u64),
        "Uploading evidence"
    );

    client
        .upload_evidence(milestone_id, &artifact)
        .await
        .with_context(|| format!("Failed to upload evidence for milestone {}", milestone_id))?;

    println!("Uploaded {} for milestone {}", file_name, milestone_id);
    Ok(())
}

async fn force_review(client: &BackendClient, milestone_id: MilestoneId) -> Result<()> {
    warn!(
        milestone_id = %milestone_id,
        "Forcing human review; this bypasses the normal review gate"
    );
    client
        .force_human_review(milestone_id)
        .await
        .with_context(|| format!("Failed to force review of milestone {}", milestone_id))?;

    println!("Review completed for milestone {}", milestone_id);
    Ok(())
}
