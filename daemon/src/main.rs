//! Reclaim daemon: serves the reward ledger over HTTP.

mod config;
mod persistence;

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use config::DaemonConfig;
use reclaim_credit::{CreditLedger, InMemoryCreditLedger};
use reclaim_rpc::{RpcMetrics, RpcServer};
use reclaim_utils::{init_logging, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "reclaim-daemon", about = "Recycling reward ledger daemon")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "RECLAIM_CONFIG")]
    config: Option<PathBuf>,

    /// Address the RPC server binds to.
    #[arg(long, env = "RECLAIM_BIND_ADDRESS")]
    bind_address: Option<IpAddr>,

    /// RPC server port.
    #[arg(long, env = "RECLAIM_RPC_PORT")]
    rpc_port: Option<u16>,

    /// Owner identity.
    #[arg(long, env = "RECLAIM_OWNER")]
    owner: Option<String>,

    /// Initial admins (comma-separated).
    #[arg(long, env = "RECLAIM_ADMINS", value_delimiter = ',')]
    admins: Vec<String>,

    /// Verified quantity units per credit unit.
    #[arg(long, env = "RECLAIM_EXCHANGE_RATE")]
    exchange_rate: Option<u64>,

    /// Decimal places of the external credit token.
    #[arg(long, env = "RECLAIM_CREDIT_DECIMALS")]
    credit_decimals: Option<u32>,

    /// Whole credit units available for redemptions.
    #[arg(long, env = "RECLAIM_TREASURY_RESERVE")]
    treasury_reserve: Option<u64>,

    /// Snapshot file, loaded at start and written on shutdown.
    #[arg(long, env = "RECLAIM_SNAPSHOT_PATH")]
    snapshot_path: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "RECLAIM_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "RECLAIM_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Overlay flags and env vars on top of `base`.
    fn apply(self, base: DaemonConfig) -> DaemonConfig {
        DaemonConfig {
            bind_address: self.bind_address.unwrap_or(base.bind_address),
            rpc_port: self.rpc_port.unwrap_or(base.rpc_port),
            owner: self.owner.unwrap_or(base.owner),
            admins: if self.admins.is_empty() {
                base.admins
            } else {
                self.admins
            },
            exchange_rate: self.exchange_rate.unwrap_or(base.exchange_rate),
            credit_decimals: self.credit_decimals.unwrap_or(base.credit_decimals),
            treasury_reserve: self.treasury_reserve.unwrap_or(base.treasury_reserve),
            snapshot_path: self.snapshot_path.or(base.snapshot_path),
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.unwrap_or(base.log_level),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cli = Cli::parse();

    let base = match cli.config.take() {
        Some(path) => DaemonConfig::from_toml_file(&path)?,
        None => DaemonConfig::default(),
    };
    let config = cli.apply(base);
    config.validate()?;

    init_logging(config.log_format, &config.log_level);

    let params = config.params()?;
    let credit: Arc<dyn CreditLedger> = Arc::new(InMemoryCreditLedger::new(config.treasury()?));
    let ledger = Arc::new(persistence::open_ledger(
        config.snapshot_path.as_deref(),
        params,
        config.owner(),
        config.admins(),
        credit,
    )?);
    let metrics = Arc::new(RpcMetrics::new()?);

    tracing::info!(
        addr = %config.rpc_addr(),
        owner = %ledger.owner(),
        exchange_rate = params.exchange_rate,
        credit_decimals = params.credit_decimals,
        accounts = ledger.account_count()?,
        "starting reclaim daemon"
    );

    let server = RpcServer::new(config.rpc_addr(), Arc::clone(&ledger), metrics);
    server
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;

    tracing::info!("shutdown signal received, stopping daemon");
    if let Some(path) = &config.snapshot_path {
        persistence::save_snapshot(&ledger, path)?;
    }
    tracing::info!("reclaim daemon exited cleanly");
    Ok(())
}
