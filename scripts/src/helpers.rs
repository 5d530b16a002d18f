//! Helpers for sending transactions: the single-message transaction path, the contract
//! lifecycle (store / instantiate / execute) and the treasury permission workflow

use std::path::Path;

use cosmrs::{
    cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgStoreCode},
    tx::Msg,
    AccountId, Any,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    client::ChainClient,
    constants::{
        CODE_ID_ATTRIBUTE, CONTRACT_ADDRESS_ATTRIBUTE, INSTANTIATE_CONTRACT_EVENT,
        STORE_CODE_EVENT, WASMD_CONTRACT_ADDRESS_ATTRIBUTE, WASMD_INSTANTIATE_EVENT,
    },
    errors::ScriptError,
    msgs::TreasuryExecuteMsg,
    types::{Coin, Managing, TxResult},
    wallet::{to_cosmos_coins, Wallet},
};

// ----------------
// | Transactions |
// ----------------

/// Sign and broadcast a transaction holding exactly `msg`, waiting for its result.
///
/// Fails with [`ScriptError::Transaction`] if the chain rejects the transaction.
pub async fn send_tx(
    wallet: &Wallet,
    client: &impl ChainClient,
    msg: Any,
) -> Result<TxResult, ScriptError> {
    let type_url = msg.type_url.clone();
    let tx_bytes = wallet.create_and_sign_tx(client, msg).await?;
    let result = client.broadcast_and_confirm(tx_bytes).await?;

    if !result.is_success() {
        return Err(ScriptError::Transaction {
            code: result.code,
            codespace: result.codespace,
            raw_log: result.raw_log,
        });
    }

    debug!("{} included in tx {} at height {}", type_url, result.txhash, result.height);
    Ok(result)
}

// ----------------------
// | Contract lifecycle |
// ----------------------

/// Upload the wasm artifact at `path`, returning its code ID
pub async fn store_code(
    wallet: &Wallet,
    client: &impl ChainClient,
    path: &Path,
) -> Result<u64, ScriptError> {
    let wasm_byte_code = std::fs::read(path)
        .map_err(|e| ScriptError::ReadArtifact(format!("{}: {}", path.display(), e)))?;
    info!("storing {} ({} bytes)", path.display(), wasm_byte_code.len());

    let msg = MsgStoreCode {
        sender: wallet.account_id().clone(),
        wasm_byte_code,
        instantiate_permission: None,
    }
    .to_any()
    .map_err(|e| ScriptError::TxConstruction(e.to_string()))?;

    let result = send_tx(wallet, client, msg).await?;
    parse_code_id(&result)
}

/// Instantiate a contract from `code_id`, with the wallet as admin, returning its address
pub async fn instantiate_contract(
    wallet: &Wallet,
    client: &impl ChainClient,
    code_id: u64,
    label: &str,
    init_msg: &impl Serialize,
    funds: &[Coin],
) -> Result<String, ScriptError> {
    let msg = MsgInstantiateContract {
        sender: wallet.account_id().clone(),
        admin: Some(wallet.account_id().clone()),
        code_id,
        label: Some(label.to_string()),
        msg: encode_msg(init_msg)?,
        funds: to_cosmos_coins(funds)?,
    }
    .to_any()
    .map_err(|e| ScriptError::TxConstruction(e.to_string()))?;

    let result = send_tx(wallet, client, msg).await?;
    parse_contract_address(&result)
}

/// Execute `execute_msg` on `contract`
pub async fn execute_contract(
    wallet: &Wallet,
    client: &impl ChainClient,
    contract: &str,
    execute_msg: &impl Serialize,
    funds: &[Coin],
) -> Result<TxResult, ScriptError> {
    let msg = MsgExecuteContract {
        sender: wallet.account_id().clone(),
        contract: parse_account_id(contract)?,
        msg: encode_msg(execute_msg)?,
        funds: to_cosmos_coins(funds)?,
    }
    .to_any()
    .map_err(|e| ScriptError::TxConstruction(e.to_string()))?;

    send_tx(wallet, client, msg).await
}

/// Read the code ID out of a store code result
pub fn parse_code_id(result: &TxResult) -> Result<u64, ScriptError> {
    let missing = || ScriptError::MissingEvent {
        event: STORE_CODE_EVENT.to_string(),
        attribute: CODE_ID_ATTRIBUTE.to_string(),
    };

    result
        .first_attribute(STORE_CODE_EVENT, CODE_ID_ATTRIBUTE)
        .and_then(|code_id| code_id.trim().parse::<u64>().ok())
        .filter(|code_id| *code_id > 0)
        .ok_or_else(missing)
}

/// Read the contract address out of an instantiate result
pub fn parse_contract_address(result: &TxResult) -> Result<String, ScriptError> {
    [
        (INSTANTIATE_CONTRACT_EVENT, CONTRACT_ADDRESS_ATTRIBUTE),
        (WASMD_INSTANTIATE_EVENT, WASMD_CONTRACT_ADDRESS_ATTRIBUTE),
    ]
    .into_iter()
    .find_map(|(event, attribute)| {
        result
            .first_attribute(event, attribute)
            .filter(|address| !address.is_empty())
    })
    .map(str::to_string)
    .ok_or_else(|| ScriptError::MissingEvent {
        event: INSTANTIATE_CONTRACT_EVENT.to_string(),
        attribute: CONTRACT_ADDRESS_ATTRIBUTE.to_string(),
    })
}

/// Serialize a contract message to JSON bytes
fn encode_msg(msg: &impl Serialize) -> Result<Vec<u8>, ScriptError> {
    serde_json::to_vec(msg).map_err(|e| ScriptError::Serde(e.to_string()))
}

/// Parse a bech32 address
fn parse_account_id(address: &str) -> Result<AccountId, ScriptError> {
    address
        .parse::<AccountId>()
        .map_err(|e| ScriptError::TxConstruction(format!("invalid address {}: {}", address, e)))
}

// ---------------
// | Permissions |
// ---------------

/// Grant `role` to `grantee` on the treasury: queue the grant, then toggle it on.
///
/// The toggle is sent right after the queue is included, so it only succeeds when the
/// treasury was instantiated with `blocks_needed_for_queue` set to zero.
pub async fn queue_and_toggle(
    wallet: &Wallet,
    client: &impl ChainClient,
    treasury: &str,
    role: Managing,
    grantee: &str,
) -> Result<(), ScriptError> {
    info!("granting {} to {}", role, grantee);

    let queue = TreasuryExecuteMsg::Queue {
        managing: role.index(),
        address: grantee.to_string(),
    };
    execute_contract(wallet, client, treasury, &queue, &[]).await?;

    let toggle = TreasuryExecuteMsg::Toggle {
        managing: role.index(),
        address: grantee.to_string(),
    };
    execute_contract(wallet, client, treasury, &toggle, &[]).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_code_id, parse_contract_address};
    use crate::{errors::ScriptError, types::TxResult};

    /// A result carrying a single event attribute
    fn result_with(event: &str, attribute: &str, value: &str) -> TxResult {
        let mut result = TxResult::default();
        result
            .events
            .entry(event.to_string())
            .or_default()
            .insert(attribute.to_string(), vec![value.to_string()]);
        result
    }

    #[test]
    fn test_parse_code_id() {
        assert_eq!(parse_code_id(&result_with("store_code", "code_id", "5")).unwrap(), 5);
    }

    #[test]
    fn test_parse_code_id_missing_or_invalid() {
        for result in [
            TxResult::default(),
            result_with("store_code", "code_id", "abc"),
            result_with("store_code", "code_id", "0"),
            result_with("instantiate", "code_id", "5"),
        ] {
            assert!(matches!(
                parse_code_id(&result),
                Err(ScriptError::MissingEvent { .. })
            ));
        }
    }

    #[test]
    fn test_parse_terra_contract_address() {
        let result = result_with("instantiate_contract", "contract_address", "terra1abc");
        assert_eq!(parse_contract_address(&result).unwrap(), "terra1abc");
    }

    #[test]
    fn test_parse_wasmd_contract_address() {
        let result = result_with("instantiate", "_contract_address", "terra1def");
        assert_eq!(parse_contract_address(&result).unwrap(), "terra1def");
    }

    #[test]
    fn test_empty_terra_address_falls_back_to_wasmd() {
        let mut result = result_with("instantiate_contract", "contract_address", "");
        result
            .events
            .entry("instantiate".to_string())
            .or_default()
            .insert("_contract_address".to_string(), vec!["terra1good".to_string()]);

        assert_eq!(parse_contract_address(&result).unwrap(), "terra1good");
    }

    #[test]
    fn test_parse_contract_address_empty() {
        let result = result_with("instantiate_contract", "contract_address", "");
        assert!(matches!(
            parse_contract_address(&result),
            Err(ScriptError::MissingEvent { .. })
        ));
    }
}
