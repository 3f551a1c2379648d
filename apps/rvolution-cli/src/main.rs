//! R_volution CLI - command-line control for R_volution media players.
//!
//! One-shot subcommands map onto the client façade; `watch` drives the
//! media-player entity in a polling loop until interrupted.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rvolution_core::{MediaPlayer, PlayerControl, RVolutionClient};
use tokio::signal;

use crate::config::CliConfig;

/// R_volution CLI - control an R_volution player over its HTTP command endpoint.
#[derive(Parser, Debug)]
#[command(name = "rvolution")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Player host or IP address (overrides config file and RVOLUTION_HOST).
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "warn", env = "RVOLUTION_LOG_LEVEL")]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the player status as JSON.
    Status,
    /// Start or resume playback.
    Play,
    /// Pause playback.
    Pause,
    /// Stop playback.
    Stop,
    /// Skip to the next track.
    Next,
    /// Return to the previous track.
    Previous,
    /// Set the absolute volume.
    Volume {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },
    /// Toggle mute.
    Mute {
        /// Request unmute instead of mute.
        #[arg(long)]
        off: bool,
    },
    /// Send an operation name or raw IR code with optional extra parameters.
    Send {
        operation: String,
        /// Extra query parameters as key=value.
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
    /// Poll the player and print state changes until interrupted.
    Watch,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    let mut config =
        CliConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = args.host {
        config.device.host = host;
    }

    let client = Arc::new(config.device.client(None).context(
        "Failed to create player client. \
         Please specify --host or set RVOLUTION_HOST to the player's address.",
    )?);
    log::info!(
        "Player: {} (timeout {:?})",
        client.base_url(),
        client.timeout()
    );

    let result = run(&client, args.command, &config).await;
    client.close();
    result
}

async fn run(client: &Arc<RVolutionClient>, command: Command, config: &CliConfig) -> Result<()> {
    let accepted = match command {
        Command::Status => {
            let status = client
                .try_get_status()
                .await
                .context("Failed to read player status")?;
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }
        Command::Play => client.play().await,
        Command::Pause => client.pause().await,
        Command::Stop => client.stop().await,
        Command::Next => client.next_track().await,
        Command::Previous => client.previous_track().await,
        Command::Volume { level } => client.set_volume(level).await,
        Command::Mute { off } => client.mute(!off).await,
        Command::Send { operation, params } => {
            let params: Vec<(&str, &str)> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            client
                .try_send_command(&operation, &params)
                .await
                .with_context(|| format!("Command '{operation}' failed"))?;
            return Ok(());
        }
        Command::Watch => {
            let interval = Duration::from_secs(config.poll_interval_secs.max(1));
            return watch(Arc::clone(client) as Arc<dyn PlayerControl>, config.device.host.trim(), interval).await;
        }
    };

    if !accepted {
        bail!("Player at {} did not accept the command", client.host());
    }
    Ok(())
}

/// Polls through a [`MediaPlayer`] and prints a JSON line whenever its
/// snapshot changes.
async fn watch(control: Arc<dyn PlayerControl>, host: &str, interval: Duration) -> Result<()> {
    let mut player = MediaPlayer::new(control, host);
    let mut ticker = tokio::time::interval(interval);
    let mut last = None;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    log::info!("Watching {} every {:?}", host, interval);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                if !player.update().await {
                    log::warn!("No status from {}", host);
                }
                let snapshot = player.snapshot();
                if last.as_ref() != Some(&snapshot) {
                    println!("{}", serde_json::to_string(&snapshot)?);
                    last = Some(snapshot);
                }
            }
        }
    }

    log::info!("Shutdown signal received, stopping watch");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
