//! VoiceBuddy worker
//!
//! Main application entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use VoiceBuddy::{
    agents::AgentKind,
    config::Settings,
    services::ServiceFactory,
    storage::format_history_context,
    utils::logging,
    worker::console,
};

#[derive(Parser, Debug)]
#[command(name = "voicebuddy", version, about = "Barista and wellness voice agents")]
struct Cli {
    /// Configuration file, without extension
    #[arg(long, default_value = "config")]
    config: std::path::PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one session locally: events on stdin, broadcasts on stdout
    Console {
        /// barista or wellness
        #[arg(long, default_value = "barista")]
        agent: AgentKind,
        /// Room name reported in logs
        #[arg(long)]
        room: Option<String>,
    },
    /// Print a room, identity and access token for the frontend
    ConnectionDetails {
        /// Agent to dispatch into the room
        #[arg(long)]
        agent_name: Option<String>,
    },
    /// Show the stored wellness history
    History,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::from_filename(".env.local").ok();
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load(&cli.config).context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", VoiceBuddy::info());

    let result = run(cli.command, &settings).await;
    if let Err(e) = &result {
        error!(error = %e, "Command failed");
    }
    result
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Command::Console { agent, room } => {
            let stats = console::run_console(agent, settings, room).await?;
            info!(sent = stats.sent, failed = stats.failed, "Console session closed");
        }
        Command::ConnectionDetails { agent_name } => {
            let issuer = ServiceFactory::token_issuer(settings)?;
            let details = issuer.connection_details(agent_name.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Command::History => {
            let services = ServiceFactory::new(settings);
            let history = services.wellness.load_history().await;
            println!("{}", serde_json::to_string_pretty(&history)?);
            println!("{}", format_history_context(&history));
        }
    }
    Ok(())
}
