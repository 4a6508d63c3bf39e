mod config_cmd;
mod identify_cmd;
mod mime;
mod status_cmd;
mod terminal_output;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use florascope_config::defaults::{DEFAULT_BIND, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use florascope_config::{config_file_path, load_and_prepare, validate, FloraConfig};
use florascope_gateway::{start_server, GatewayState};
use florascope_understanding::PlantIdentifier;

use identify_cmd::OutputFormat;

#[derive(Parser)]
#[command(name = "florascope")]
#[command(about = "Florascope: identify plants from photos with a vision model")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $FLORASCOPE_CONFIG or ~/.florascope/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Identify the plant in a local photo
    Identify {
        /// Path to the photo
        path: PathBuf,
        /// Media type, when the file extension does not tell
        #[arg(long)]
        mime: Option<String>,
        /// Print the raw provider answer and the record as JSON
        #[arg(long, conflicts_with = "raw")]
        json: bool,
        /// Print only the raw provider answer
        #[arg(long)]
        raw: bool,
    },
    /// Interpret a saved model answer (file, or stdin when omitted or "-")
    Interpret {
        path: Option<PathBuf>,
    },
    /// Print the effective configuration with secrets masked
    Config,
    /// Query the health endpoint of a running gateway
    Status {
        /// Gateway base URL (defaults to the configured port on localhost)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_file_path);
    let config = load_and_prepare(&config_path)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    florascope_logging::init_logger(&config.logging.clone().unwrap_or_default());
    // Findings from loading were emitted before any subscriber existed.
    validate(&config).log();

    match cli.command {
        Commands::Serve { port, bind } => run_server(config, port, bind).await?,
        Commands::Identify { path, mime, json, raw } => {
            let identifier = build_identifier(&config)?;
            let format = match (json, raw) {
                (true, _) => OutputFormat::Json,
                (_, true) => OutputFormat::Raw,
                _ => OutputFormat::Pretty,
            };
            identify_cmd::identify(&identifier, &path, mime, format).await?;
        }
        Commands::Interpret { path } => identify_cmd::interpret(path.as_deref()).await?,
        Commands::Config => config_cmd::run(&config, &config_path)?,
        Commands::Status { url } => {
            let url = url.unwrap_or_else(|| {
                let port = config.gateway.as_ref().and_then(|g| g.port).unwrap_or(DEFAULT_PORT);
                format!("http://127.0.0.1:{port}")
            });
            status_cmd::run(&url).await?;
        }
    }

    Ok(())
}

fn build_identifier(config: &FloraConfig) -> Result<PlantIdentifier> {
    PlantIdentifier::from_config(&config.vision.clone().unwrap_or_default())
}

async fn run_server(config: FloraConfig, port: Option<u16>, bind: Option<String>) -> Result<()> {
    let gateway = config.gateway.clone().unwrap_or_default();
    let bind = bind.or(gateway.bind).unwrap_or_else(|| DEFAULT_BIND.to_string());
    let port = port.or(gateway.port).unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {bind}:{port}"))?;

    let identifier = build_identifier(&config)?;
    let max_upload_bytes = gateway.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
    info!(addr = %addr, "Starting Florascope");

    start_server(addr, GatewayState::new(identifier, max_upload_bytes)).await
}
