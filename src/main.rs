use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use dhcpwire::address::from_hex;
use dhcpwire::{DhcpPacket, DhcpServer, Result, ServerConfig};

#[derive(Parser)]
#[command(name = "dhcpwire")]
#[command(author, version, about = "DHCP wire codec with a minimal reference server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "dhcpwire.json")]
    config: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve DHCP on the configured port
    Run,
    /// Print the effective configuration as JSON
    ShowConfig,
    /// Decode a hex-encoded packet and print every field
    Decode {
        /// Packet bytes as hex; whitespace is ignored
        hex: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = ServerConfig::load_or_create(&cli.config)?;
            info!("Starting DHCP server with config: {:?}", cli.config);
            let server = DhcpServer::new(config)?;

            tokio::select! {
                result = server.run() => {
                    if let Err(error) = &result {
                        error!("Server stopped: {}", error);
                    }
                    result
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server...");
                    Ok(())
                }
            }
        }
        Commands::ShowConfig => {
            let config = ServerConfig::load_or_create(&cli.config)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Decode { hex } => {
            let compact: String = hex.split_whitespace().collect();
            let packet = DhcpPacket::parse(&from_hex(&compact)?)?;
            println!("{}", packet);
            Ok(())
        }
    }
}
