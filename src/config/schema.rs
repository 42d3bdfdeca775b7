//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Ledger RPC settings.
    pub blockchain: BlockchainConfig,

    /// Delayed transaction module and the safe it guards.
    pub module: ModuleConfig,

    /// Content-addressed store settings.
    pub store: StoreConfig,

    /// Local persistent cache.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Settings for the `watch` loop.
    pub monitor: MonitorConfig,
}

/// Ledger RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// First block scanned for module events (module deployment block).
    pub from_block: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
            from_block: 0,
        }
    }
}

/// Module configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Address of the delayed transaction module.
    pub module_address: String,

    /// Safe operated on by default.
    pub safe_address: String,

    /// Delay given to newly added rescuers, in seconds.
    pub default_rescuer_delay_secs: u64,

    /// Whether only the executor may trigger execution of announcements by new rescuers.
    pub require_executor: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            module_address: String::new(),
            safe_address: String::new(),
            default_rescuer_delay_secs: 60,
            require_executor: true,
        }
    }
}

/// Content-addressed store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the IPFS HTTP RPC API.
    pub api_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Pin pushed blocks on the node.
    pub pin: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5001".to_string(),
            request_timeout_secs: 30,
            pin: true,
        }
    }
}

/// Local cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// JSON file persisting the cache. In-memory only when unset.
    pub path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint (watch mode).
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Watch loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between pending listings.
    pub poll_interval_secs: u64,

    /// Base delay for exponential backoff after failed polls, in milliseconds.
    pub backoff_base_ms: u64,

    /// Maximum backoff delay in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 30,
            backoff_base_ms: 1_000,
            backoff_max_ms: 60_000,
        }
    }
}
