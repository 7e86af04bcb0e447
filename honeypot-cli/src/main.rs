//! honeypot-cli: terminal frontend for the honeypot scam-baiting service
//!
//! # Subcommands
//! - `chat`                     — interactive multi-turn session (default)
//! - `send <message> [--json]`  — submit a single turn
//! - `metrics [--json]`         — fetch backend performance metrics once
//! - `health`                   — check the backend is up

mod chat;
mod render;

use clap::{Parser, Subcommand};
use honeypot_core::protocol::TelemetrySource;
use honeypot_core::{ConversationSession, HoneypotConfig, HttpApiClient, StatsAccumulator, TelemetryPoller};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "honeypot-cli", version, about = "Honeypot scam-baiting conversation client")]
struct Cli {
    #[arg(short, long, default_value = "honeypot.toml")]
    config: String,

    /// Backend URL (overrides service.base_url)
    #[arg(long, env = "HONEYPOT_URL")]
    server: Option<String>,

    /// API key sent as X-API-Key (overrides service.api_key)
    #[arg(long, env = "HONEYPOT_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Interactive conversation with live metrics
    Chat {
        /// Do not poll the metrics endpoint in the background
        #[arg(long)]
        no_telemetry: bool,
    },

    /// Send a single message and print the analysis
    Send {
        message: String,

        #[arg(long)]
        json: bool,
    },

    /// Fetch backend performance metrics once
    Metrics {
        #[arg(long)]
        json: bool,
    },

    /// Check backend health
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match HoneypotConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", cli.config, e);
            std::process::exit(1);
        }
    };
    if let Some(server) = cli.server {
        config.service.base_url = server;
    }
    if let Some(api_key) = cli.api_key {
        config.service.api_key = api_key;
    }
    config.validate()?;

    // Logs go to stderr so they never interleave with the transcript on stdout.
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.logging.level.parse()?))
        .init();

    let client = HttpApiClient::new(&config.service)?;

    match cli.command.unwrap_or(Commands::Chat { no_telemetry: false }) {
        Commands::Chat { no_telemetry } => {
            let telemetry = if config.telemetry.enabled && !no_telemetry {
                let poller = TelemetryPoller::new(Arc::new(client.clone()));
                Some(poller.spawn(config.telemetry.poll_interval()))
            } else {
                None
            };
            chat::run_chat(client, telemetry).await?;
        }
        Commands::Send { message, json } => {
            let mut session = ConversationSession::new();
            match session.submit_turn(&client, &message).await {
                Ok(outcome) if json => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Ok(outcome) => {
                    println!("Conversation: {}", outcome.conversation_id);
                    println!("{}", render::turn_card(&outcome));
                    if let Some(details) = render::intelligence_details(session.intelligence()) {
                        println!("{}", details);
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Turn failed");
                    eprintln!("honeypot-cli: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Metrics { json } => match client.fetch_metrics().await {
            Ok(snapshot) if json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            Ok(snapshot) => println!(
                "{}",
                render::metrics_panel(Some(&snapshot), &StatsAccumulator::new())
            ),
            Err(e) => {
                tracing::error!(error = %e, url = %client.base_url(), "Failed to load metrics");
                eprintln!("honeypot-cli: failed to load metrics from {}: {}", client.base_url(), e);
                std::process::exit(1);
            }
        },
        Commands::Health => match client.health().await {
            Ok(health) => {
                println!(
                    "✅ {} {} is {}",
                    health.service.as_deref().unwrap_or("backend"),
                    health.version.as_deref().unwrap_or(""),
                    health.status
                );
            }
            Err(e) => {
                tracing::error!(error = %e, url = %client.base_url(), "Health check failed");
                println!("❌ Health check against {} failed: {}", client.base_url(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
