//! CLI entrypoint for colloquy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod overrides;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colloquy_application::{ConversationDriver, ConversationFeed, FeedFollower};
use colloquy_domain::BoundedLog;
use colloquy_infrastructure::{ConfigLoader, Generators, JsonlTranscriptLogger};
use colloquy_presentation::{Cli, ConsoleFollower, OutputFormat, TickProgressReporter, formatter_for};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; stdout carries the conversation
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    overrides::apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    info!("Starting colloquy");

    // === Dependency Injection ===
    let log = Arc::new(BoundedLog::new(config.log.capacity)?);
    let generators = Generators::from_config(&config.generator)?;
    let topics = config.topics.to_seeds()?;
    let agents = config
        .driver
        .agent_pair()
        .ok_or_else(|| anyhow!("driver.agents must name exactly two agents"))?;
    let driver_config = config.driver.to_driver_config().with_max_ticks(cli.ticks);

    let mut driver = ConversationDriver::new(
        Arc::clone(&log),
        generators.text,
        generators.subtopics,
        topics,
        agents,
        driver_config,
    )?;

    if let Some(seed) = config.generator.seed {
        driver = driver.with_rng_seed(seed);
    }

    if let Some(path) = config.transcript.enabled_path() {
        let transcript = JsonlTranscriptLogger::open(path)
            .with_context(|| format!("Could not open transcript {}", path))?;
        info!(path, "Writing transcript");
        driver = driver.with_logger(Arc::new(transcript));
    }

    let reporter = (!cli.quiet && cli.output == OutputFormat::Text)
        .then(|| Arc::new(TickProgressReporter::new()));
    if let Some(reporter) = &reporter {
        driver = driver.with_progress(reporter.clone());
    }

    // === Run ===
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupted; stopping after the current tick");
                shutdown.cancel();
            }
        });
    }

    // The follower stops only once the driver has stopped, so the tick in
    // flight at Ctrl-C still reaches stdout
    let follow_token = CancellationToken::new();
    let driver_handle = driver.spawn(shutdown.clone());
    let driver_task = {
        let follow_token = follow_token.clone();
        tokio::spawn(async move {
            let summary = driver_handle.await;
            follow_token.cancel();
            summary
        })
    };

    if cli.quiet {
        let summary = driver_task.await??;
        info!(
            ticks = summary.ticks_completed,
            failed = summary.ticks_failed,
            entries = summary.entries_appended,
            "Conversation stopped"
        );
        return Ok(());
    }

    let feed = ConversationFeed::new(Arc::clone(&log));
    let mut follower = ConsoleFollower::new(
        FeedFollower::new(feed),
        formatter_for(cli.output),
        std::io::stdout(),
        Duration::from_millis(cli.poll_interval.max(1)),
    );
    if let Some(reporter) = &reporter {
        follower = follower.with_spinner(reporter.spinner());
    }

    let stats = follower.run(follow_token).await?;
    let summary = driver_task.await??;
    if let Some(reporter) = &reporter {
        reporter.finish();
    }

    if stats.messages_missed > 0 {
        warn!(missed = stats.messages_missed, "Some messages were evicted before they were shown");
    }
    let closing = follower.formatter().format_summary(&summary);
    follower.print_line(&closing)?;

    Ok(())
}
