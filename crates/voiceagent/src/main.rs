mod probe;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use voiceagent_common::{logger, AppConfig};

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "voiceagent")]
#[command(about = "Voice Agent - Speech-to-Text service backed by Google Cloud", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Exercise the endpoints of a running server
    Probe {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:3000")]
        base_url: String,

        /// Audio file to send to /api/speech-to-text
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Encoding of the audio file
        #[arg(long, default_value = "LINEAR16")]
        encoding: String,

        /// Sample rate of the audio file
        #[arg(long, default_value_t = 16000)]
        sample_rate: u32,
    },
}

async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(host) = host {
        config.server_host = host;
    }
    if let Some(port) = port {
        config.server_port = port;
    }

    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("Voice Agent starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Bind address: {}", config.server_bind_address());
    tracing::info!("  Speech API: {}", config.speech_endpoint);
    tracing::info!("  Timeout: {}s", config.speech_timeout_secs);

    voiceagent_server::start_server(config).await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // AppConfig::from_env() loads .env as well; the project-root file wins
    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(host, port).await?,
        Some(Commands::Probe { base_url, audio, encoding, sample_rate }) => {
            logger::setup_console_logging("info")?;
            probe::run(&base_url, audio.as_deref(), &encoding, sample_rate).await?;
        }
        None => serve(None, None).await?,
    }

    Ok(())
}
