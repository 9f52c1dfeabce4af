use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launchpad_monitor::{
    InitializeEvent, LogMonitor, MonitorConfig, RpcLedgerClient, TransactionProcessor,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Watch Raydium Launchpad for new pools and decode their `initialize` calls.
#[derive(Parser)]
#[command(name = "launchpad-monitor", version, about)]
struct Cli {
    /// JSON-RPC endpoint used for transaction and account reads.
    #[arg(
        long,
        global = true,
        env = "RPC_URL",
        default_value = "https://api.mainnet-beta.solana.com"
    )]
    rpc_url: String,

    /// WebSocket endpoint used for the log subscription.
    #[arg(
        long,
        global = true,
        env = "WS_URL",
        default_value = "wss://api.mainnet-beta.solana.com"
    )]
    ws_url: String,

    /// TOML monitor settings; built-in defaults when omitted.
    #[arg(long, global = true, env = "MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Subscribe to program logs and print every decoded event until Ctrl-C.
    Monitor,
    /// Process one known transaction signature.
    Process { signature: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = match &cli.config {
        Some(path) => MonitorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => MonitorConfig::default(),
    };
    let client = Arc::new(RpcLedgerClient::new(cli.rpc_url.clone(), config.commitment));
    let processor = TransactionProcessor::new(client, &config)?;

    match cli.command {
        Command::Monitor => monitor(processor, &config, &cli.ws_url).await,
        Command::Process { signature } => {
            let event = processor.process(&signature).await?;
            emit(&event)
        }
    }
}

async fn monitor(
    processor: TransactionProcessor<RpcLedgerClient>,
    config: &MonitorConfig,
    ws_url: &str,
) -> Result<()> {
    let (monitor, mut events) = LogMonitor::new(processor, config);
    let cancel = CancellationToken::new();

    let consumer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            if let Err(e) = emit(&event) {
                warn!(signature = %event.signature, error = %e, "failed to write event");
            }
        }
    });

    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, stopping");
            on_signal.cancel();
        }
    });

    let exit = monitor.run_subscription(ws_url, &cancel).await?;
    info!(%exit, stats = ?monitor.stats(), "monitor stopped");

    drop(monitor);
    consumer.await?;
    Ok(())
}

#[expect(clippy::print_stdout, reason = "events are the program output")]
fn emit(event: &InitializeEvent) -> Result<()> {
    println!("{}", event.to_json()?);
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
