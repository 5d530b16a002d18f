//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    client::ChainClient,
    commands::{deploy_all, deploy_treasury, query},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_BLOCKS_NEEDED_FOR_QUEUE, DEFAULT_CHAIN_ID,
        DEFAULT_DAO_ADDRESS, DEFAULT_GAS_ADJUSTMENT, DEFAULT_GAS_DENOM, DEFAULT_GAS_PRICE,
        DEFAULT_LCD_URL, DEFAULT_TREASURY_SEED_FUNDS,
    },
    errors::ScriptError,
    wallet::GasConfig,
};

/// Deploy and wire the Lumen contracts on a Terra chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// LCD endpoint of the chain
    #[arg(short, long, env = "LCD_URL", default_value = DEFAULT_LCD_URL)]
    pub lcd_url: String,

    /// Chain ID transactions are signed for
    #[arg(long, env = "CHAIN_ID", default_value = DEFAULT_CHAIN_ID)]
    pub chain_id: String,

    /// Path to a JSON file in which to record deployed addresses
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// Signing options
    #[command(flatten)]
    pub signer: SignerArgs,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The deployer key and fee settings
#[derive(Args)]
pub struct SignerArgs {
    /// Mnemonic of the deployer
    #[arg(long, env = "MNEMONIC", hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// File holding the mnemonic of the deployer, preferred over `--mnemonic`
    #[arg(long, env = "MNEMONIC_FILE")]
    pub mnemonic_file: Option<PathBuf>,

    /// Price of a unit of gas
    #[arg(long, default_value = DEFAULT_GAS_PRICE, value_parser = parse_positive_f64)]
    pub gas_price: f64,

    /// Denomination fees are paid in
    #[arg(long, default_value = DEFAULT_GAS_DENOM)]
    pub gas_denom: String,

    /// Multiplier applied to the simulated gas usage
    #[arg(long, default_value = DEFAULT_GAS_ADJUSTMENT, value_parser = parse_positive_f64)]
    pub gas_adjustment: f64,
}

impl SignerArgs {
    /// The fee configuration
    pub fn gas_config(&self) -> GasConfig {
        GasConfig {
            price: self.gas_price,
            denom: self.gas_denom.clone(),
            adjustment: self.gas_adjustment,
        }
    }
}

/// The available scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the treasury, staked token, distributor, staking and bond contracts and wire them
    DeployAll(DeployArgs),
    /// Deploy the treasury alone, funding it at instantiation
    DeployTreasury(DeployTreasuryArgs),
    /// Run a smart query against a contract
    Query(QueryArgs),
}

impl Command {
    /// Run the script
    pub async fn run(
        self,
        client: &impl ChainClient,
        signer: &SignerArgs,
        deployments_path: Option<PathBuf>,
    ) -> Result<(), ScriptError> {
        match self {
            Command::DeployAll(args) => deploy_all(args, client, signer, deployments_path).await,
            Command::DeployTreasury(args) => {
                deploy_treasury(args, client, signer, deployments_path).await
            }
            Command::Query(args) => query(args, client).await,
        }
    }
}

/// Options shared by the deployment scripts
#[derive(Args)]
pub struct DeployArgs {
    /// Directory holding the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// DAO address receiving bond fees
    #[arg(long, default_value = DEFAULT_DAO_ADDRESS)]
    pub dao: String,

    /// Number of blocks a treasury permission stays queued before it can be toggled.
    ///
    /// Permissions are toggled right after being queued, so any non-zero value makes
    /// the role grants fail.
    #[arg(long, default_value_t = DEFAULT_BLOCKS_NEEDED_FOR_QUEUE)]
    pub blocks_needed_for_queue: u64,
}

/// Deploy the treasury alone
#[derive(Args)]
pub struct DeployTreasuryArgs {
    /// Directory holding the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Number of blocks a treasury permission stays queued before it can be toggled
    #[arg(long, default_value_t = DEFAULT_BLOCKS_NEEDED_FOR_QUEUE)]
    pub blocks_needed_for_queue: u64,

    /// Funds sent along with the instantiation, e.g. `10000000uluna,1000000ukrw`
    #[arg(long, default_value = DEFAULT_TREASURY_SEED_FUNDS)]
    pub funds: String,
}

/// Parse a gas price or adjustment, which must be finite and positive
fn parse_positive_f64(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("expected a positive number, got {}", s));
    }

    Ok(value)
}

/// Run a smart query
#[derive(Args)]
pub struct QueryArgs {
    /// Address of the contract to query
    #[arg(short, long)]
    pub contract: String,

    /// The query message, in JSON
    #[arg(short, long)]
    pub msg: String,
}
