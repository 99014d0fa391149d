//! ChainMux CLI — the command-line interface for ChainMux.
//!
//! # Commands
//! ```
//! chainmux encode-call   --signature <sig> --args <json>
//! chainmux decode-output --types <t1,t2> --data <hex>
//! chainmux aggregate     --rpc <url> --chain-id <num> --calls <path.json>
//! chainmux fetch-abi     --chain-id <num> --address <addr>
//! chainmux balances      --rpc <url> --chain-id <num> --token <addr> --owners <addr>...
//! chainmux metadata      --rpc <url> --contract <addr> --token-id <id>
//! chainmux chains        --chain-id <num>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use chainmux_abi::codec;
use chainmux_connect::{AbiCache, ChainRegistry, SqliteStore};
use chainmux_core::{chain::chains, AbiValue, Call, ChainDescriptor, MemoryStore, RetryConfig};
use chainmux_multicall::Multicall;
use chainmux_rpc::{HttpClientConfig, HttpRpcClient, RpcTransport};
use chainmux_tokens::{Erc20, Erc721, MetadataFetcher};

#[derive(Parser)]
#[command(
    name = "chainmux",
    about = "Batched contract reads, token wrappers, and ABI tooling — ChainMux CLI",
    long_about = "
ChainMux CLI: encode and decode contract calls, run aggregate batches
through Multicall3, fetch ABIs from block explorers, and query token
contracts. Built on alloy-rs.

ENVIRONMENT VARIABLES:
  RUST_LOG    tracing filter (overrides --verbose)
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a function call to ABI calldata
    #[command(name = "encode-call")]
    EncodeCall {
        /// Canonical signature, e.g. 'transfer(address,uint256)'
        #[arg(long)]
        signature: String,
        /// JSON array of arguments, e.g.
        /// '[{"type":"address","value":"0xabc..."},{"type":"uint","value":1}]'
        #[arg(long, default_value = "[]")]
        args: String,
    },

    /// Decode returned bytes against output types
    #[command(name = "decode-output")]
    DecodeOutput {
        /// Comma-separated solidity types, e.g. 'uint256,address'
        #[arg(long)]
        types: String,
        /// Returned data (0x-prefixed hex)
        #[arg(long)]
        data: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a batch of read calls through the aggregator
    Aggregate {
        /// JSON-RPC endpoint URL
        #[arg(long)]
        rpc: String,
        /// EVM chain ID (resolves the Multicall3 deployment)
        #[arg(long, default_value_t = 1)]
        chain_id: u64,
        /// Aggregator address override (required for unlisted chains)
        #[arg(long)]
        multicall: Option<String>,
        /// Calls per aggregate submission
        #[arg(long, default_value_t = 50)]
        batch_size: usize,
        /// Path to a JSON file holding an array of calls
        #[arg(long)]
        calls: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a contract ABI from the chain's block explorer
    #[command(name = "fetch-abi")]
    FetchAbi {
        /// EVM chain ID (default: 1 = Ethereum mainnet)
        #[arg(long, default_value_t = 1)]
        chain_id: u64,
        /// Contract address
        #[arg(long)]
        address: String,
        /// Bypass the cache and overwrite the entry
        #[arg(long)]
        force: bool,
        /// SQLite cache database (default: in-memory, no persistence)
        #[arg(long)]
        cache: Option<String>,
    },

    /// ERC-20 balances for one or more owners
    Balances {
        /// JSON-RPC endpoint URL
        #[arg(long)]
        rpc: String,
        /// EVM chain ID (for the Multicall3 deployment)
        #[arg(long, default_value_t = 1)]
        chain_id: u64,
        /// Token contract address
        #[arg(long)]
        token: String,
        /// Owner addresses
        #[arg(long, num_args = 1..)]
        owners: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch and normalize ERC-721 token metadata
    Metadata {
        /// JSON-RPC endpoint URL
        #[arg(long)]
        rpc: String,
        /// NFT contract address
        #[arg(long)]
        contract: String,
        /// Token id (decimal)
        #[arg(long)]
        token_id: String,
        /// IPFS gateway prefix
        #[arg(long, default_value = chainmux_tokens::DEFAULT_IPFS_GATEWAY)]
        gateway: String,
    },

    /// Look up a chain descriptor
    Chains {
        /// EVM chain ID
        #[arg(long)]
        chain_id: u64,
        /// Re-fetch the chain list before the lookup
        #[arg(long)]
        refresh: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command {
        Commands::EncodeCall { signature, args } => cmd_encode_call(&signature, &args),

        Commands::DecodeOutput { types, data, json } => cmd_decode_output(&types, &data, json),

        Commands::Aggregate {
            rpc,
            chain_id,
            multicall,
            batch_size,
            calls,
            json,
        } => cmd_aggregate(&rpc, chain_id, multicall.as_deref(), batch_size, &calls, json).await,

        Commands::FetchAbi {
            chain_id,
            address,
            force,
            cache,
        } => cmd_fetch_abi(chain_id, &address, force, cache.as_deref()).await,

        Commands::Balances {
            rpc,
            chain_id,
            token,
            owners,
            json,
        } => cmd_balances(&rpc, chain_id, &token, &owners, json).await,

        Commands::Metadata {
            rpc,
            contract,
            token_id,
            gateway,
        } => cmd_metadata(&rpc, &contract, &token_id, &gateway).await,

        Commands::Chains { chain_id, refresh } => cmd_chains(chain_id, refresh).await,
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// One-shot commands bound their retries instead of inheriting the
/// library's retry-forever default.
fn cli_retry() -> RetryConfig {
    RetryConfig::bounded(3, Duration::from_secs(1))
}

fn transport(rpc: &str) -> Arc<dyn RpcTransport> {
    let config = HttpClientConfig {
        retry: cli_retry(),
        ..Default::default()
    };
    Arc::new(HttpRpcClient::new(rpc, config))
}

fn well_known() -> [ChainDescriptor; 6] {
    [
        chains::ethereum(),
        chains::polygon(),
        chains::arbitrum(),
        chains::base(),
        chains::optimism(),
        chains::bsc(),
    ]
}

fn registry() -> ChainRegistry {
    ChainRegistry::new()
        .with_retry(cli_retry())
        .with_descriptors(well_known())
}

/// Resolve a descriptor, pulling the live feed for chains beyond the
/// bundled well-known set.
async fn resolve_chain(registry: &ChainRegistry, chain_id: u64) -> Result<ChainDescriptor> {
    match registry.descriptor(chain_id).await {
        Ok(descriptor) => Ok(descriptor),
        Err(_) => {
            registry.refresh().await?;
            Ok(registry.descriptor(chain_id).await?)
        }
    }
}

fn parse_hex(data: &str) -> Result<Vec<u8>> {
    hex::decode(data.strip_prefix("0x").unwrap_or(data)).context("invalid hex")
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_encode_call(signature: &str, args_json: &str) -> Result<()> {
    let args: Vec<AbiValue> = serde_json::from_str(args_json).context("parse args JSON")?;
    let calldata = codec::encode_call(signature, &args)?;
    println!("0x{}", hex::encode(&calldata));
    Ok(())
}

fn cmd_decode_output(types_csv: &str, data: &str, as_json: bool) -> Result<()> {
    let types: Vec<String> = types_csv
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    let bytes = parse_hex(data)?;
    let values = codec::decode_outputs(&types, &bytes)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for (ty, value) in types.iter().zip(&values) {
            println!("{ty}: {value}");
        }
    }
    Ok(())
}

async fn cmd_aggregate(
    rpc: &str,
    chain_id: u64,
    multicall: Option<&str>,
    batch_size: usize,
    calls_path: &str,
    as_json: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(calls_path)
        .with_context(|| format!("read calls file '{calls_path}'"))?;
    let calls: Vec<Call> = serde_json::from_str(&content).context("parse calls JSON")?;
    let count = calls.len();

    let engine = match multicall {
        Some(address) => Multicall::new(transport(rpc), address),
        None => Multicall::for_chain(transport(rpc), chain_id)?,
    }
    .with_batch_size(batch_size);

    let results = engine.run(calls).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{count} calls, {} results:", results.len());
        for (i, value) in results.iter().enumerate() {
            println!("  [{i}] {value}");
        }
    }
    Ok(())
}

async fn cmd_fetch_abi(
    chain_id: u64,
    address: &str,
    force: bool,
    cache_path: Option<&str>,
) -> Result<()> {
    let chain = resolve_chain(&registry(), chain_id).await?;

    let cache = match cache_path {
        Some(path) => {
            let store =
                SqliteStore::open(path).with_context(|| format!("open cache db '{path}'"))?;
            AbiCache::new(Arc::new(store))
        }
        None => AbiCache::new(Arc::new(MemoryStore::new())),
    }
    .with_retry(cli_retry());

    let abi = cache.abi(&chain, address, force).await?;
    println!("{abi}");
    Ok(())
}

async fn cmd_balances(
    rpc: &str,
    chain_id: u64,
    token: &str,
    owners: &[String],
    as_json: bool,
) -> Result<()> {
    let transport = transport(rpc);
    let mut erc20 = Erc20::new(token, transport.clone());
    // Aggregate when the chain has a known deployment, else fall back
    // to concurrent reads
    if let Ok(engine) = Multicall::for_chain(transport, chain_id) {
        erc20 = erc20.with_multicall(engine);
    }

    let refs: Vec<&str> = owners.iter().map(String::as_str).collect();
    let balances = erc20.balances_of(&refs).await?;

    if as_json {
        let entries: Vec<serde_json::Value> = balances
            .iter()
            .map(|(owner, balance)| serde_json::json!({ "owner": owner, "balance": balance }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for (owner, balance) in &balances {
            println!("{owner}  {balance}");
        }
    }
    Ok(())
}

async fn cmd_metadata(rpc: &str, contract: &str, token_id: &str, gateway: &str) -> Result<()> {
    let erc721 = Erc721::new(contract, transport(rpc))
        .with_fetcher(MetadataFetcher::new().with_gateway(gateway));
    let metadata = erc721.metadata(token_id).await?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

async fn cmd_chains(chain_id: u64, refresh: bool) -> Result<()> {
    let registry = registry();
    if refresh {
        let count = registry.refresh().await?;
        eprintln!("chain list refreshed: {count} descriptors");
    }
    let descriptor = resolve_chain(&registry, chain_id).await?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}
