use std::{net::IpAddr, path::PathBuf, process::ExitCode};

use clap::Parser;
use numeth_service::{ServerConfig, server};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// HTTP server for the numeth numerical methods.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with server settings.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Address to bind, overriding the config file.
    #[arg(long)]
    host: Option<IpAddr>,
    /// Port to bind, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    install_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ServerConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, "could not load config");
                return ExitCode::FAILURE;
            }
        },
        None => ServerConfig::default(),
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    server::serve(config).await;
    ExitCode::SUCCESS
}

fn install_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
