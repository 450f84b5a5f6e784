use clap::Parser;
use eyre::WrapErr;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use token_transfer_api::config::{load_config, InitMode};
use token_transfer_api::lifecycle::{wait_for_signal, Shutdown};
use token_transfer_api::observability::{logging, metrics};
use token_transfer_api::{AppContext, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "token-transfer-api", version, about = "ERC-20 balance and transfer API")]
struct Args {
    /// TOML config file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port, overrides config and PORT.
    #[arg(short, long)]
    port: Option<u16>,

    /// Bind a local listener even in production mode.
    #[arg(long)]
    listen: bool,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).wrap_err("failed to load configuration")?;
    if let Some(port) = args.port {
        config.listener.port = port;
    }

    logging::init_logging(&config).wrap_err("failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %config.blockchain.network_name,
        rpc_url = %config.blockchain.rpc_url,
        token = %config.token.address,
        decimals = config.token.decimals,
        production = config.runtime.production,
        "token-transfer-api starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .wrap_err("invalid metrics address")?;
        metrics::init_metrics(addr).wrap_err("failed to start metrics exporter")?;
    }

    let production = config.runtime.production;
    let bind_address = config.listener.bind_address();
    let context = Arc::new(AppContext::new(config));

    if context.init_mode() == InitMode::Eager {
        context
            .initialize()
            .await
            .wrap_err("failed to initialize chain context")?;
    }

    if production && !args.listen {
        tracing::info!("Production mode without --listen; not binding a local listener");
        return Ok(());
    }

    let listener = TcpListener::bind(&bind_address)
        .await
        .wrap_err_with(|| format!("failed to bind {}", bind_address))?;

    let shutdown = Shutdown::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));

    HttpServer::new(context).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
