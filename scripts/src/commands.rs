//! Implementations of the various deploy scripts

use std::{io, path::PathBuf};

use serde_json::Value;
use tracing::info;

use crate::{
    cli::{DeployArgs, DeployTreasuryArgs, QueryArgs, SignerArgs},
    client::ChainClient,
    deployment::{self, DeployParams, Deployer},
    errors::ScriptError,
    types::parse_coins,
    utils::{now_millis, setup_wallet},
    wallet::Wallet,
};

/// Deploy and wire the full contract suite
pub async fn deploy_all(
    args: DeployArgs,
    client: &impl ChainClient,
    signer: &SignerArgs,
    deployments_path: Option<PathBuf>,
) -> Result<(), ScriptError> {
    let wallet = wallet_from_args(signer)?;
    let params = deploy_params(args, deployments_path);

    let deployer = Deployer::new(&wallet, client, &params);
    deployment::deploy_all(&deployer, &mut io::stdout()).await?;

    info!("deployment complete");
    Ok(())
}

/// Deploy the treasury alone, funding it at instantiation
pub async fn deploy_treasury(
    args: DeployTreasuryArgs,
    client: &impl ChainClient,
    signer: &SignerArgs,
    deployments_path: Option<PathBuf>,
) -> Result<(), ScriptError> {
    let wallet = wallet_from_args(signer)?;
    let mut params = DeployParams::new(now_millis());
    params.artifacts_dir = args.artifacts_dir;
    params.blocks_needed_for_queue = args.blocks_needed_for_queue;
    params.treasury_funds = parse_coins(&args.funds)?;
    params.deployments_path = deployments_path;

    let deployer = Deployer::new(&wallet, client, &params);
    deployment::deploy_treasury_only(&deployer, &mut io::stdout()).await?;

    Ok(())
}

/// Run a smart query and pretty-print the response
pub async fn query(args: QueryArgs, client: &impl ChainClient) -> Result<(), ScriptError> {
    let msg: Value =
        serde_json::from_str(&args.msg).map_err(|e| ScriptError::Serde(e.to_string()))?;

    let response = client.query(&args.contract, &msg).await?;
    let pretty =
        serde_json::to_string_pretty(&response).map_err(|e| ScriptError::Serde(e.to_string()))?;
    println!("{}", pretty);

    Ok(())
}

/// Derive the deployer wallet
fn wallet_from_args(signer: &SignerArgs) -> Result<Wallet, ScriptError> {
    setup_wallet(
        signer.mnemonic.as_deref(),
        signer.mnemonic_file.as_deref(),
        signer.gas_config(),
    )
}

/// Build the deployment parameters, starting the first epoch now
fn deploy_params(args: DeployArgs, deployments_path: Option<PathBuf>) -> DeployParams {
    let mut params = DeployParams::new(now_millis());
    params.artifacts_dir = args.artifacts_dir;
    params.dao = args.dao;
    params.blocks_needed_for_queue = args.blocks_needed_for_queue;
    params.deployments_path = deployments_path;
    params
}
