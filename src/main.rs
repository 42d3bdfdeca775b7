//! delayed-tx: announce, inspect and execute delayed Safe transactions.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI ──▶ workflow ──▶ codec (transaction / hash images)
//!              │   ├───▶ store (IPFS block API, read-through cache)
//!              │   ├───▶ events (log reconciliation) ──▶ gate (delay check)
//!              │   └───▶ blockchain (JSON-RPC reader, proposal writer)
//!              └─ cache (JSON file, saved after every command)
//! ```
//!
//! Transactions are never signed here. Every prepared transaction is printed as a
//! JSON line on stdout for a wallet to sign and send.

use alloy::primitives::{Address, Bytes, U256};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use delayed_tx::blockchain::{BlockchainClient, ModuleReader, ProposalWriter};
use delayed_tx::cache::{ContentCache, ExecutionCache, FileStore, KeyValueStore, MemoryStore};
use delayed_tx::codec::{AnnouncementDetails, ContentDigest, Operation};
use delayed_tx::config::load_config;
use delayed_tx::observability::{logging, metrics};
use delayed_tx::store::{IpfsHttpTransport, StoreClient};
use delayed_tx::workflow::{unix_now, unix_now_ms, PendingMonitor, Workflow, WorkflowError};
use delayed_tx::RelayConfig;

#[derive(Parser)]
#[command(name = "delayed-tx")]
#[command(about = "Announce and execute delayed Safe transactions", long_about = None)]
struct Cli {
    /// Configuration file.
    #[arg(short, long, default_value = "delayed-tx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the module name and whether the safe has it enabled
    Status {
        #[arg(long)]
        safe: Option<Address>,
    },
    /// List rescuers allowed to announce for a safe
    Rescuers {
        #[arg(long)]
        safe: Option<Address>,
    },
    /// List safes an announcer may rescue
    Targets {
        #[arg(long)]
        announcer: Option<Address>,
    },
    /// Propose adding (or re-configuring) a rescuer
    AddRescuer {
        announcer: Address,
        /// Delay in seconds. Defaults to module.default_rescuer_delay_secs.
        #[arg(long)]
        delay: Option<u64>,
    },
    /// Propose removing a rescuer
    RemoveRescuer { announcer: Address },
    /// List pending announcements made by an announcer
    Pending {
        #[arg(long)]
        announcer: Option<Address>,
    },
    /// Publish details and propose an announcement
    Announce {
        #[arg(long)]
        executor: Address,
        #[arg(long)]
        to: Address,
        #[arg(long, default_value = "0")]
        value: U256,
        #[arg(long, default_value = "0x")]
        data: Bytes,
        /// 0 = call, 1 = delegate call
        #[arg(long, default_value_t = 0)]
        operation: u8,
        /// Defaults to the current time in milliseconds.
        #[arg(long)]
        nonce: Option<U256>,
    },
    /// Announce adding an owner to a safe being rescued
    Recover {
        target: Address,
        /// Defaults to module.safe_address.
        #[arg(long)]
        new_owner: Option<Address>,
    },
    /// Propose executing an announcement whose delay has elapsed
    Execute { tx_hash: ContentDigest },
    /// Resolve the details behind an announcement
    Show { tx_hash: ContentDigest },
    /// Propose enabling the module on a safe
    EnableModule {
        #[arg(long)]
        safe: Option<Address>,
    },
    /// Poll pending announcements until interrupted
    Watch {
        #[arg(long)]
        announcer: Option<Address>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    logging::init(&config.observability.log_level);

    tracing::info!(config = %cli.config.display(), "delayed-tx v0.1.0 starting");

    let persistent = match &config.cache.path {
        Some(path) => Some(Arc::new(FileStore::load_from_file(path)?)),
        None => None,
    };
    let kv: Arc<dyn KeyValueStore> = match &persistent {
        Some(store) => store.clone(),
        None => Arc::new(MemoryStore::new()),
    };

    let workflow = build_workflow(&config, kv).await?;
    let result = run(cli.command, &config, workflow, persistent.clone()).await;

    if let Some(store) = &persistent {
        if let Err(e) = store.save_to_file() {
            tracing::error!(path = %store.path().display(), error = %e, "Failed to save cache");
        }
    }

    result
}

async fn build_workflow(
    config: &RelayConfig,
    kv: Arc<dyn KeyValueStore>,
) -> Result<Workflow, Box<dyn std::error::Error>> {
    let module: Address = config.module.module_address.parse()?;

    let client = BlockchainClient::new(config.blockchain.clone())?;
    match client.verify_chain_id().await {
        Ok(()) => tracing::info!(
            rpc_url = %config.blockchain.rpc_url,
            chain_id = config.blockchain.chain_id,
            "Blockchain client initialized"
        ),
        Err(e) => tracing::warn!(error = %e, "Blockchain client initialized but chain verification failed"),
    }

    let transport = IpfsHttpTransport::new(&config.store)?;
    let store = StoreClient::new(Arc::new(transport), ContentCache::new(kv.clone()));

    Ok(Workflow::new(
        module,
        Arc::new(ModuleReader::new(client, module)),
        Arc::new(ProposalWriter::stdout()),
        store,
        ExecutionCache::new(kv),
    )
    .with_rescuer_policy(
        config.module.default_rescuer_delay_secs,
        config.module.require_executor,
    ))
}

async fn run(
    command: Commands,
    config: &RelayConfig,
    workflow: Workflow,
    persistent: Option<Arc<FileStore>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let safe = || default_account(config);

    match command {
        Commands::Status { safe: s } => print(&workflow.module_status(s.map_or_else(safe, Ok)?).await?),
        Commands::Rescuers { safe: s } => print(&workflow.list_rescuers(s.map_or_else(safe, Ok)?).await?),
        Commands::Targets { announcer } => {
            print(&workflow.list_rescue_targets(announcer.map_or_else(safe, Ok)?).await?)
        }
        Commands::AddRescuer { announcer, delay } => print(&workflow.add_rescuer(announcer, delay).await?),
        Commands::RemoveRescuer { announcer } => print(&workflow.remove_rescuer(announcer).await?),
        Commands::Pending { announcer } => {
            print(&workflow.list_pending(announcer.map_or_else(safe, Ok)?, unix_now()).await?)
        }
        Commands::Announce {
            executor,
            to,
            value,
            data,
            operation,
            nonce,
        } => {
            let details = AnnouncementDetails {
                executor,
                to,
                value,
                data,
                operation: Operation::try_from(operation)?,
                nonce: nonce.unwrap_or_else(|| U256::from(unix_now_ms())),
            };
            print(&workflow.announce(&details).await?)
        }
        Commands::Recover { target, new_owner } => {
            let new_owner = new_owner.map_or_else(safe, Ok)?;
            print(&workflow.announce_owner_recovery(target, new_owner, unix_now_ms()).await?)
        }
        Commands::Execute { tx_hash } => print(&workflow.execute(&tx_hash, unix_now()).await?),
        Commands::Show { tx_hash } => print(&workflow.details(&tx_hash).await?),
        Commands::EnableModule { safe: s } => print(&workflow.enable_module(s.map_or_else(safe, Ok)?).await?),
        Commands::Watch { announcer } => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(e) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        error = %e,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let mut monitor = PendingMonitor::new(workflow, announcer.map_or_else(safe, Ok)?, config.monitor.clone());
            if let Some(store) = persistent {
                monitor = monitor.with_checkpoint(store);
            }
            monitor
                .run(async {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                        std::future::pending::<()>().await;
                    }
                })
                .await;
            Ok(())
        }
    }
}

fn default_account(config: &RelayConfig) -> Result<Address, WorkflowError> {
    config.module.safe_address.parse().map_err(|_| {
        WorkflowError::InvalidInput("no account given and module.safe_address is not set".to_string())
    })
}

fn print<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
