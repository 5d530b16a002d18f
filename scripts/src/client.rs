//! The chain client used by the deploy scripts, and its LCD implementation

use std::time::Duration;

use base64::prelude::*;
use reqwest::{Client as HttpClient, ClientBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    constants::{BROADCAST_MODE, TX_POLL_ATTEMPTS, TX_POLL_INTERVAL_MS},
    errors::ScriptError,
    types::{AccountInfo, EventsByType, TxResult},
};

/// The operations the scripts need from a chain node
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// The chain ID transactions are signed for
    fn chain_id(&self) -> &str;

    /// Fetch the account number and current sequence of an account
    async fn account(&self, address: &str) -> Result<AccountInfo, ScriptError>;

    /// Simulate a signed transaction, returning the gas it used
    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, ScriptError>;

    /// Broadcast a signed transaction and wait until it is included or rejected
    async fn broadcast_and_confirm(&self, tx_bytes: Vec<u8>) -> Result<TxResult, ScriptError>;

    /// Run a smart query against a contract
    async fn query(&self, contract: &str, query: &Value) -> Result<Value, ScriptError>;
}

// --------------
// | LCD client |
// --------------

/// A [`ChainClient`] speaking the Cosmos SDK LCD (REST) API
#[derive(Clone, Debug)]
pub struct LcdClient {
    /// The HTTP client
    http: HttpClient,
    /// The LCD base URL, without a trailing slash
    url: String,
    /// The chain ID
    chain_id: String,
    /// The interval between two polls for a broadcast transaction
    poll_interval: Duration,
    /// The number of polls before giving up on a broadcast transaction
    poll_attempts: usize,
}

impl LcdClient {
    /// Create a client for the given endpoint and chain ID
    pub fn new(url: &str, chain_id: &str) -> Result<Self, ScriptError> {
        let http = ClientBuilder::new()
            .build()
            .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(LcdClient {
            http,
            url: url.trim_end_matches('/').to_string(),
            chain_id: chain_id.to_string(),
            poll_interval: Duration::from_millis(TX_POLL_INTERVAL_MS),
            poll_attempts: TX_POLL_ATTEMPTS,
        })
    }

    /// Override how broadcast transactions are polled for
    pub fn with_polling(mut self, poll_interval: Duration, poll_attempts: usize) -> Self {
        self.poll_interval = poll_interval;
        self.poll_attempts = poll_attempts;
        self
    }

    /// The network name the node reports
    pub async fn node_network(&self) -> Result<String, ScriptError> {
        let info: NodeInfoResponse = self
            .get_json("/cosmos/base/tendermint/v1beta1/node_info")
            .await?;
        Ok(info.default_node_info.network)
    }

    /// GET a path and decode the JSON body, failing on a non-success status
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ScriptError> {
        let response = self
            .http
            .get(format!("{}{}", self.url, path))
            .send()
            .await
            .map_err(|e| ScriptError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScriptError::Network(format!("GET {}: {} {}", path, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| ScriptError::Serde(e.to_string()))
    }

    /// POST a JSON body to a path and decode the JSON response
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ScriptError> {
        let response = self
            .http
            .post(format!("{}{}", self.url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| ScriptError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScriptError::Network(format!("POST {}: {} {}", path, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| ScriptError::Serde(e.to_string()))
    }

    /// Look up a transaction by hash, `None` while it is not yet included
    async fn find_tx(&self, txhash: &str) -> Result<Option<TxResult>, ScriptError> {
        let response = self
            .http
            .get(format!("{}/cosmos/tx/v1beta1/txs/{}", self.url, txhash))
            .send()
            .await
            .map_err(|e| ScriptError::Network(e.to_string()))?;

        // Older nodes answer 400 rather than 404 for unknown hashes
        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => return Ok(None),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(ScriptError::Network(format!("GET tx {}: {} {}", txhash, status, body)));
            }
            _ => {}
        }

        let envelope: TxResponseEnvelope = response
            .json()
            .await
            .map_err(|e| ScriptError::Serde(e.to_string()))?;
        Ok(Some(envelope.tx_response.into()))
    }
}

impl ChainClient for LcdClient {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn account(&self, address: &str) -> Result<AccountInfo, ScriptError> {
        let response: AccountResponse = self
            .get_json(&format!("/cosmos/auth/v1beta1/accounts/{}", address))
            .await?;
        parse_account(&response.account)
    }

    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, ScriptError> {
        let body = SimulateRequest {
            tx_bytes: BASE64_STANDARD.encode(tx_bytes),
        };
        let response: SimulateResponse = self.post_json("/cosmos/tx/v1beta1/simulate", &body).await?;

        response
            .gas_info
            .gas_used
            .parse()
            .map_err(|_| ScriptError::Serde(format!("invalid gas_used: {}", response.gas_info.gas_used)))
    }

    async fn broadcast_and_confirm(&self, tx_bytes: Vec<u8>) -> Result<TxResult, ScriptError> {
        let body = BroadcastRequest {
            tx_bytes: BASE64_STANDARD.encode(&tx_bytes),
            mode: BROADCAST_MODE,
        };
        let envelope: TxResponseEnvelope = self.post_json("/cosmos/tx/v1beta1/txs", &body).await?;
        let check_tx: TxResult = envelope.tx_response.into();

        // Rejected before reaching a block
        if !check_tx.is_success() {
            return Ok(check_tx);
        }

        debug!("broadcast tx {}, waiting for inclusion", check_tx.txhash);
        let mut remaining_attempts = self.poll_attempts;
        while remaining_attempts > 0 {
            if let Some(result) = self.find_tx(&check_tx.txhash).await? {
                return Ok(result);
            }

            tokio::time::sleep(self.poll_interval).await;
            remaining_attempts -= 1;
        }

        Err(ScriptError::ConfirmationTimeout(check_tx.txhash))
    }

    async fn query(&self, contract: &str, query: &Value) -> Result<Value, ScriptError> {
        let path = smart_query_path(contract, query)?;
        let response: SmartQueryResponse = self
            .get_json(&path)
            .await
            .map_err(|e| ScriptError::Query(e.to_string()))?;
        Ok(response.data)
    }
}

// ----------------
// | LCD payloads |
// ----------------

/// The body of a simulate request
#[derive(Serialize)]
struct SimulateRequest {
    /// The base64-encoded signed transaction
    tx_bytes: String,
}

/// The body of a broadcast request
#[derive(Serialize)]
struct BroadcastRequest {
    /// The base64-encoded signed transaction
    tx_bytes: String,
    /// The broadcast mode
    mode: &'static str,
}

/// The response to a simulate request
#[derive(Deserialize)]
struct SimulateResponse {
    /// The gas accounting of the simulation
    gas_info: GasInfo,
}

/// Gas accounting of a simulated transaction
#[derive(Deserialize)]
struct GasInfo {
    /// The gas used, rendered as a decimal string
    gas_used: String,
}

/// The response to an account lookup
#[derive(Deserialize)]
struct AccountResponse {
    /// The account, whose shape depends on its `@type`
    account: Value,
}

/// The response to a smart query
#[derive(Deserialize)]
struct SmartQueryResponse {
    /// The contract's answer
    data: Value,
}

/// The response to a node info request
#[derive(Deserialize)]
struct NodeInfoResponse {
    /// The node's p2p info
    default_node_info: DefaultNodeInfo,
}

/// The p2p info of a node
#[derive(Deserialize)]
struct DefaultNodeInfo {
    /// The chain ID the node serves
    network: String,
}

/// The wrapper around a `TxResponse` returned by broadcast and lookup
#[derive(Deserialize)]
struct TxResponseEnvelope {
    /// The transaction response
    tx_response: LcdTxResponse,
}

/// A `TxResponse` as rendered by the LCD
#[derive(Deserialize, Default)]
struct LcdTxResponse {
    /// The transaction hash
    #[serde(default)]
    txhash: String,
    /// The inclusion height, `0` for a check-tx response
    #[serde(default)]
    height: String,
    /// The result code, `0` on success
    #[serde(default)]
    code: u32,
    /// The module the result code belongs to
    #[serde(default)]
    codespace: String,
    /// The raw log, the error message on failure
    #[serde(default)]
    raw_log: String,
    /// Per-message logs, absent on newer nodes
    #[serde(default)]
    logs: Option<Vec<LcdLog>>,
    /// The flat event list
    #[serde(default)]
    events: Option<Vec<LcdEvent>>,
}

/// The log of a single message
#[derive(Deserialize)]
struct LcdLog {
    /// The events the message emitted
    #[serde(default)]
    events: Vec<LcdEvent>,
}

/// An ABCI event
#[derive(Deserialize)]
struct LcdEvent {
    /// The event type, e.g. `store_code`
    #[serde(rename = "type")]
    kind: String,
    /// The event attributes
    #[serde(default)]
    attributes: Vec<LcdAttribute>,
}

/// A key / value attribute of an event
#[derive(Deserialize)]
struct LcdAttribute {
    /// The attribute key
    key: String,
    /// The attribute value
    #[serde(default)]
    value: Option<String>,
}

impl From<LcdTxResponse> for TxResult {
    fn from(response: LcdTxResponse) -> Self {
        // Per-message logs were dropped in SDK 0.50, fall back to the flat event list
        let events = response
            .logs
            .and_then(|logs| logs.into_iter().next())
            .map(|log| log.events)
            .filter(|events| !events.is_empty())
            .or(response.events)
            .unwrap_or_default();

        TxResult {
            txhash: response.txhash,
            height: response.height.parse().unwrap_or_default(),
            code: response.code,
            codespace: response.codespace,
            raw_log: response.raw_log,
            events: events_by_type(events),
        }
    }
}

/// The LCD path of a smart query, carrying the query as base64url JSON
fn smart_query_path(contract: &str, query: &Value) -> Result<String, ScriptError> {
    let query_bytes = serde_json::to_vec(query).map_err(|e| ScriptError::Serde(e.to_string()))?;
    Ok(format!(
        "/cosmwasm/wasm/v1/contract/{}/smart/{}",
        contract,
        BASE64_URL_SAFE.encode(query_bytes)
    ))
}

/// Index a list of events by type then attribute key, merging events of the same type
fn events_by_type(events: Vec<LcdEvent>) -> EventsByType {
    let mut indexed = EventsByType::new();
    for event in events {
        let attributes = indexed.entry(event.kind).or_default();
        for attribute in event.attributes {
            attributes
                .entry(attribute.key)
                .or_default()
                .push(attribute.value.unwrap_or_default());
        }
    }

    indexed
}

/// Read the account number and sequence, looking through vesting account wrappers
fn parse_account(account: &Value) -> Result<AccountInfo, ScriptError> {
    let base = [
        &account["base_vesting_account"]["base_account"],
        &account["base_account"],
        account,
    ]
    .into_iter()
    .find(|candidate| !candidate["account_number"].is_null())
    .ok_or_else(|| ScriptError::Serde(format!("no account number in {}", account)))?;

    Ok(AccountInfo {
        account_number: parse_u64_field(base, "account_number")?,
        sequence: parse_u64_field(base, "sequence")?,
    })
}

/// Parse a u64 the LCD renders either as a string or a number, absent meaning zero
fn parse_u64_field(value: &Value, field: &str) -> Result<u64, ScriptError> {
    match &value[field] {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ScriptError::Serde(format!("invalid {}: {}", field, n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| ScriptError::Serde(format!("invalid {}: {}", field, s))),
        other => Err(ScriptError::Serde(format!("invalid {}: {}", field, other))),
    }
}
