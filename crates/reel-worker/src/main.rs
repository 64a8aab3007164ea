//! Promo video worker binary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_models::{Composition, VideoBrief};
use reel_storage::R2Client;
use reel_worker::{
    metrics, sample_frames, GeminiScriptWriter, HttpRenderBackend, LogAssetRepository,
    PipelineCoordinator, RenderConfig, RenderOrchestrator,
};

#[derive(Parser)]
#[command(name = "reel-worker", version, about = "Render promo videos from creative briefs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline for a brief and print the outcome as JSON.
    Render {
        /// Path to a VideoBrief JSON file
        brief: PathBuf,
    },
    /// Evaluate a composition and print sampled frame states as JSON.
    Frames {
        /// Path to a Composition JSON file
        composition: PathBuf,
        /// Sample every N-th frame
        #[arg(long, default_value_t = 15)]
        every: u64,
        /// Frame rate to evaluate at
        #[arg(long, default_value_t = reel_timeline::DEFAULT_FPS)]
        fps: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Render { brief } => render(brief).await,
        Command::Frames {
            composition,
            every,
            fps,
        } => frames(composition, every, fps),
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

fn init_tracing() -> Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reel=info".parse()?)
        .add_directive("hyper=warn".parse()?);

    // Logs go to stderr so stdout stays valid JSON.
    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

async fn render(brief_path: PathBuf) -> Result<()> {
    let brief: VideoBrief = read_json(&brief_path)?;

    if let Ok(addr) = std::env::var("METRICS_ADDR") {
        metrics::init_metrics(&addr)?;
    }

    let config = RenderConfig::from_env()?;
    info!(
        backend = config.has_backend(),
        poll_interval_secs = config.poll_interval.as_secs(),
        max_poll_attempts = config.max_poll_attempts,
        fps = config.fps,
        "Render config loaded"
    );

    let script_writer = Arc::new(GeminiScriptWriter::from_env()?);
    let mut pipeline = PipelineCoordinator::new(script_writer, Arc::new(LogAssetRepository));

    if let Some(backend) = HttpRenderBackend::from_config(&config)? {
        let store = R2Client::from_env()
            .await
            .context("Render backend is configured but R2 storage is not")?;
        let orchestrator = RenderOrchestrator::new(Arc::new(backend), Arc::new(store), config)?;
        pipeline = pipeline.with_orchestrator(orchestrator);
    } else {
        info!("RENDER_BACKEND_URL not set, rendering disabled");
    }

    let outcome = match pipeline.run(&brief).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(business_id = %brief.business_id, error = %e, "Pipeline failed");
            return Err(anyhow!(e.user_message()));
        }
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn frames(composition_path: PathBuf, every: u64, fps: u32) -> Result<()> {
    let composition: Composition = read_json(&composition_path)?;
    let frames = sample_frames(&composition, fps, every)?;
    info!(count = frames.len(), "Evaluated frames");
    println!("{}", serde_json::to_string_pretty(&frames)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
