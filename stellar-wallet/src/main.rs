//! stellar-wallet command line

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{ArgGroup, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stellar_wallet::account::{SearchHistory, SourceInfo};
use stellar_wallet::config::WalletConfig;
use stellar_wallet::crypto::keys::stellar;
use stellar_wallet::transaction::{format_xlm, HorizonClient, Payload, TransactionQuery};
use stellar_wallet::{recover_multi_chain, sign};

#[derive(Parser)]
#[command(name = "stellar-wallet")]
#[command(about = "Multi-chain key recovery and Stellar account tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use the SDF test network
    #[arg(long, global = true)]
    testnet: bool,

    /// Horizon URL override
    #[arg(long, global = true)]
    horizon_url: Option<String>,

    /// Search history file override
    #[arg(long, global = true)]
    history_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive BTC, FLO and XLM keys; generates a new key when none is given
    Derive {
        /// Stellar secret, WIF or hex private key
        key: Option<String>,
    },
    /// Sign a payload with a hex ed25519 seed
    #[command(group(ArgGroup::new("payload").required(true).args(["base64", "hex"])))]
    Sign {
        #[arg(long)]
        seed_hex: String,
        /// Payload as standard base64
        #[arg(long)]
        base64: Option<String>,
        /// Payload as hex
        #[arg(long)]
        hex: Option<String>,
    },
    /// Show an account balance and record it in the history
    Balance {
        /// "G..." account id, or a private key to derive it from
        address_or_key: String,
    },
    /// List an account's transactions
    Transactions {
        address: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Submit a base64 transaction envelope
    Submit { xdr: String },
    /// Manage the lookup history
    History {
        #[command(subcommand)]
        action: Option<HistoryCommands>,
    },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Show the most recent lookups
    List,
    /// Delete one record
    Delete { id: u64 },
    /// Delete every record
    Clear,
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = WalletConfig::from_env(cli.testnet);
    if let Some(url) = &cli.horizon_url {
        config = config.with_horizon_url(url.clone());
    }
    if let Some(path) = &cli.history_file {
        config = config.with_history_path(path.clone());
    }
    info!(horizon = %config.horizon.url, "stellar-wallet v{}", stellar_wallet::VERSION);

    match cli.command {
        Commands::Derive { key } => {
            let result = recover_multi_chain(key.as_deref().unwrap_or(""))?;
            print_json(&result)?;
        }
        Commands::Sign { seed_hex, base64, hex } => {
            let signature = match (base64, hex) {
                (Some(text), _) => sign(Payload::Base64(&text), &seed_hex)?,
                (None, Some(text)) => {
                    let bytes = ::hex::decode(text.trim()).context("Invalid payload hex")?;
                    sign(Payload::Bytes(&bytes), &seed_hex)?
                }
                (None, None) => bail!("either --base64 or --hex is required"),
            };
            println!("{}", ::hex::encode(signature));
        }
        Commands::Balance { address_or_key } => {
            let (address, source) = if stellar::is_valid_address(address_or_key.trim()) {
                (address_or_key.trim().to_string(), None)
            } else {
                let keys = recover_multi_chain(&address_or_key)?;
                let source = SourceInfo {
                    btc_address: Some(keys.btc.address.clone()),
                    flo_address: Some(keys.flo.address.clone()),
                };
                match keys.xlm.material() {
                    Some(material) => (material.address.clone(), Some(source)),
                    None => bail!("could not derive a Stellar address from the given key"),
                }
            };

            let client = HorizonClient::new(config.horizon.clone())?;
            let balance = client.get_balance(&address).await?;

            let mut history = SearchHistory::load(&config.history_path)?;
            history.record_now(&address, balance.balance_xlm, source);
            history.save(&config.history_path)?;

            info!(
                "{} holds {} XLM (minimum {} XLM)",
                address,
                format_xlm(balance.balance_xlm),
                format_xlm(balance.min_balance_xlm)
            );
            print_json(&balance)?;
        }
        Commands::Transactions { address, limit, cursor } => {
            let client = HorizonClient::new(config.horizon.clone())?;
            let query = TransactionQuery {
                limit,
                cursor,
                ..TransactionQuery::default()
            };
            print_json(&client.get_transactions(&address, &query).await?)?;
        }
        Commands::Submit { xdr } => {
            let client = HorizonClient::new(config.horizon.clone())?;
            print_json(&client.submit_transaction(&xdr).await?)?;
        }
        Commands::History { action } => {
            let mut history = SearchHistory::load(&config.history_path)?;
            match action.unwrap_or(HistoryCommands::List) {
                HistoryCommands::List => print_json(&history.recent())?,
                HistoryCommands::Delete { id } => {
                    if !history.delete(id) {
                        bail!("no history record with id {}", id);
                    }
                    history.save(&config.history_path)?;
                }
                HistoryCommands::Clear => {
                    history.clear();
                    history.save(&config.history_path)?;
                }
            }
        }
    }

    Ok(())
}
