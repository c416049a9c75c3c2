//! Swap quote executor CLI
//!
//! Reads a JSON swap quote and either prints its calldata record or submits
//! it to the exchange configured in the TOML settings.

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::H256;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use swap_quote_executor::config::Settings;
use swap_quote_executor::{
    build_calldata, metrics, CoordinatorClient, EthersChain, ExecutionOptions, ProgressCallback,
    Route, Settlement, SubmissionError, SwapQuote, SwapQuoteConsumer, TxParams,
};

#[derive(Parser)]
#[command(name = "swap-quote-executor")]
#[command(about = "Build calldata for, or execute, 0x swap quotes", long_about = None)]
struct Args {
    /// Configuration file (defaults to $SWAP_EXECUTOR_CONFIG or config/default.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the calldata record for a quote as JSON
    ///
    /// Works offline: no RPC url or private key is needed.
    Calldata {
        /// Path to the quote JSON
        quote: PathBuf,
    },
    /// Submit a quote and print the transaction hash
    ///
    /// Needs `consumer.rpc_url`, plus the key named by `consumer.private_key_env`
    /// when signing locally. With `use_coordinator = true` this command always
    /// fails: the coordinator relay client is not built into this binary, so
    /// run `calldata` and submit the result through the relay instead.
    #[command(after_help = COORDINATOR_NOTE)]
    Execute {
        /// Path to the quote JSON
        quote: PathBuf,

        /// Taker address (defaults to the provider's sender)
        #[arg(long)]
        taker: Option<String>,

        /// Gas limit, decimal or 0x-hex
        #[arg(long)]
        gas_limit: Option<String>,

        /// Wei to attach instead of the quote's protocol fee
        #[arg(long)]
        eth_amount: Option<String>,
    },
}

const COORDINATOR_NOTE: &str = "Note: when use_coordinator = true, execute is always refused \
(no coordinator relay client attached). Use `calldata` and submit through the relay.";

/// Coordinator route as seen from this binary: the relay's approval
/// handshake lives outside it, so fills are refused rather than sent.
struct DetachedCoordinator;

#[async_trait]
impl CoordinatorClient for DetachedCoordinator {
    async fn send_fill(
        &self,
        _call: &swap_quote_executor::abi::FillCall,
        _on_progress: &ProgressCallback,
        _timestamp_secs: u64,
        _tx: &TxParams,
    ) -> Result<H256, SubmissionError> {
        Err(SubmissionError::Rejected(
            "no coordinator relay client attached; use `calldata` and submit through the relay"
                .to_string(),
        ))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    let args = Args::parse();

    info!("Starting swap quote executor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    match args.command {
        Command::Calldata { quote } => {
            // Build calldata offline
            let quote = read_quote(&quote)?;
            let info = build_calldata(&settings.contract_addresses()?, settings.route(), &quote)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Execute {
            quote,
            taker,
            gas_limit,
            eth_amount,
        } => {
            let quote = read_quote(&quote)?;
            let opts = ExecutionOptions {
                taker_address: taker,
                gas_limit,
                eth_amount,
            };

            // Connect to the chain
            let rpc_url = settings.rpc_url()?;
            let provider = Provider::<Http>::try_from(rpc_url)
                .with_context(|| format!("Invalid RPC url: {}", rpc_url))?
                .interval(Duration::from_millis(100));

            // Attach the local signer, if configured
            match settings.consumer.private_key_env.as_deref() {
                Some(var) => {
                    let key = std::env::var(var)
                        .with_context(|| format!("Private key env var {} is not set", var))?;
                    let wallet = key
                        .parse::<LocalWallet>()
                        .with_context(|| "Invalid private key")?
                        .with_chain_id(settings.consumer.chain_id);
                    info!("Signing locally as {:?}", wallet.address());
                    let client = Arc::new(SignerMiddleware::new(provider, wallet));
                    execute(&settings, client, &quote, &opts).await?;
                }
                None => {
                    execute(&settings, Arc::new(provider), &quote, &opts).await?;
                }
            }
        }
    }

    debug!("Metrics:\n{}", metrics::render());
    Ok(())
}

async fn execute<M: Middleware + 'static>(
    settings: &Settings,
    client: Arc<M>,
    quote: &SwapQuote,
    opts: &ExecutionOptions,
) -> Result<()> {
    let addresses = settings.contract_addresses()?;
    let chain = Arc::new(EthersChain::new(
        client,
        settings.consumer.chain_id,
        addresses.exchange,
    ));

    // Select settlement route
    let settlement = match settings.route() {
        Route::Coordinator => {
            warn!("Coordinator settlement configured; execution requires an external relay client");
            Settlement::Coordinator(Arc::new(DetachedCoordinator))
        }
        Route::Direct => Settlement::Direct(chain.clone()),
    };

    // Submit the swap
    let consumer = SwapQuoteConsumer::new(settings.consumer.chain_id, addresses, chain, settlement);
    let tx_hash = consumer.execute(quote, opts).await?;
    println!("{:?}", tx_hash);

    Ok(())
}

fn read_quote(path: &Path) -> Result<SwapQuote> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read quote file: {:?}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse quote: {:?}", path))
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,swap_quote_executor=debug,hyper=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true).with_writer(std::io::stderr))
        .init();
}
