//! Utilities for the deploy scripts.

use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use json::JsonValue;
use tracing::{info, warn};

use crate::{
    client::LcdClient,
    constants::DEPLOYMENTS_KEY,
    errors::ScriptError,
    wallet::{GasConfig, Wallet},
};

/// Sets up the LCD client, checking that the node serves the expected chain
pub async fn setup_client(lcd_url: &str, chain_id: &str) -> Result<LcdClient, ScriptError> {
    let client = LcdClient::new(lcd_url, chain_id)?;

    let network = client
        .node_network()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    if network != chain_id {
        return Err(ScriptError::ClientInitialization(format!(
            "{} serves chain {}, expected {}",
            lcd_url, network, chain_id
        )));
    }

    info!("connected to {} ({})", lcd_url, chain_id);
    Ok(client)
}

/// Sets up the deployer wallet from a mnemonic file, or an inline mnemonic if no file is given
pub fn setup_wallet(
    mnemonic: Option<&str>,
    mnemonic_file: Option<&Path>,
    gas: GasConfig,
) -> Result<Wallet, ScriptError> {
    let mnemonic = match (mnemonic_file, mnemonic) {
        (Some(path), _) => fs::read_to_string(path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", path.display(), e)))?,
        (None, Some(mnemonic)) => mnemonic.to_string(),
        (None, None) => {
            return Err(ScriptError::KeyDerivation(
                "no mnemonic provided, set MNEMONIC or pass --mnemonic-file".to_string(),
            ))
        }
    };

    let wallet = Wallet::from_mnemonic(&mnemonic, gas)?;
    info!("deployer: {}", wallet.address());
    Ok(wallet)
}

/// The current time in milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            warn!("system clock before the Unix epoch: {}", e);
            0
        })
}

/// Read a JSON file
pub fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?;

    json::parse(&file_contents).map_err(|e| ScriptError::ReadFile(e.to_string()))
}

/// Read a deployed address from the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<String, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ScriptError::ReadFile(format!(
                "no address for {} in {}",
                contract_key,
                file_path.display()
            ))
        })
}

/// Record a deployed address in the deployments file, creating the file if needed
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: &str,
) -> Result<(), ScriptError> {
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(address.to_string());

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;

    Ok(())
}
