//! A mock chain and fixtures shared by the integration tests
#![allow(dead_code)]

use std::{fs, sync::Mutex};

use cosmrs::{
    cosmwasm::{MsgExecuteContract, MsgInstantiateContract, MsgStoreCode},
    tx::Msg,
    AccountId, Tx,
};
use scripts::{
    client::ChainClient,
    constants::{
        BOND_ARTIFACT, DISTRIBUTOR_ARTIFACT, STAKED_TOKEN_ARTIFACT, STAKING_ARTIFACT,
        TREASURY_ARTIFACT,
    },
    errors::ScriptError,
    types::{AccountInfo, TxResult},
    wallet::{GasConfig, Wallet},
};
use serde_json::{json, Value};
use tempfile::TempDir;

/// The `test1` key of LocalTerra
pub const TEST_MNEMONIC: &str = "notice oak worry limit wrap speak medal online prefer cluster roof addict wrist behave treat actual wasp year salad speed social layer crew genius";

/// The chain ID of the mock chain
pub const MOCK_CHAIN_ID: &str = "localterra";

/// The account number of the deployer on the mock chain
pub const MOCK_ACCOUNT_NUMBER: u64 = 7;

/// The gas every transaction uses on the mock chain
pub const MOCK_GAS_USED: u64 = 100_000;

/// The first code ID handed out by the mock chain
pub const FIRST_CODE_ID: u64 = 5;

/// The first byte of the addresses handed out by the mock chain
pub const FIRST_ADDRESS_BYTE: u8 = 0xAA;

/// A message received by the mock chain
#[derive(Debug, Clone, PartialEq)]
pub enum SentMsg {
    /// A store code message
    StoreCode {
        /// The size of the uploaded bytecode
        size: usize,
    },
    /// An instantiate message
    Instantiate {
        /// The code ID
        code_id: u64,
        /// The label
        label: String,
        /// The admin
        admin: Option<String>,
        /// The init message
        msg: Value,
        /// The attached funds, as `(denom, amount)`
        funds: Vec<(String, u128)>,
    },
    /// An execute message
    Execute {
        /// The contract
        contract: String,
        /// The execute message
        msg: Value,
    },
}

impl SentMsg {
    /// The variant name of an execute message, e.g. `queue`
    pub fn action(&self) -> Option<String> {
        match self {
            SentMsg::Execute { msg, .. } => msg
                .as_object()
                .and_then(|obj| obj.keys().next())
                .cloned(),
            _ => None,
        }
    }

    /// The body of an execute message
    pub fn body(&self) -> Option<&Value> {
        match self {
            SentMsg::Execute { msg, .. } => msg.as_object().and_then(|obj| obj.values().next()),
            _ => None,
        }
    }
}

/// A predicate deciding whether a message fails, and with which code and log
type FailureFn = Box<dyn Fn(&SentMsg) -> Option<(u32, String)>>;

/// The mutable state of the mock chain
struct MockState {
    /// The deployer's next sequence
    sequence: u64,
    /// The next code ID to hand out
    next_code_id: u64,
    /// The byte the next contract address is made of
    next_address_byte: u8,
    /// Every message broadcast, in order
    sent: Vec<SentMsg>,
}

/// A chain that decodes the signed transactions it receives and answers like a wasm chain
pub struct MockChain {
    /// The mutable state
    state: Mutex<MockState>,
    /// Decides which messages fail
    failure: Option<FailureFn>,
    /// Whether results carry events
    emit_events: bool,
}

impl MockChain {
    /// A chain on which every transaction succeeds
    pub fn new() -> Self {
        MockChain {
            state: Mutex::new(MockState {
                sequence: 0,
                next_code_id: FIRST_CODE_ID,
                next_address_byte: FIRST_ADDRESS_BYTE,
                sent: Vec::new(),
            }),
            failure: None,
            emit_events: true,
        }
    }

    /// Fail the messages matching `failure`
    pub fn fail_when(mut self, failure: impl Fn(&SentMsg) -> Option<(u32, String)> + 'static) -> Self {
        self.failure = Some(Box::new(failure));
        self
    }

    /// Answer successful transactions without any event
    pub fn without_events(mut self) -> Self {
        self.emit_events = false;
        self
    }

    /// Every message broadcast so far
    pub fn sent(&self) -> Vec<SentMsg> {
        self.state.lock().unwrap().sent.clone()
    }

    /// The actions of the execute messages broadcast so far
    pub fn actions(&self) -> Vec<String> {
        self.sent().iter().filter_map(SentMsg::action).collect()
    }
}

/// The address the mock chain hands out for a given byte
pub fn mock_address(byte: u8) -> String {
    AccountId::new("terra", &[byte; 20]).unwrap().to_string()
}

/// Decode the single message of a signed transaction
fn decode_msg(tx: &Tx) -> SentMsg {
    assert_eq!(tx.body.messages.len(), 1, "expected exactly one message");
    let any = &tx.body.messages[0];

    if let Ok(msg) = MsgStoreCode::from_any(any) {
        SentMsg::StoreCode {
            size: msg.wasm_byte_code.len(),
        }
    } else if let Ok(msg) = MsgInstantiateContract::from_any(any) {
        SentMsg::Instantiate {
            code_id: msg.code_id,
            label: msg.label.unwrap_or_default(),
            admin: msg.admin.map(|admin| admin.to_string()),
            msg: serde_json::from_slice(&msg.msg).unwrap(),
            funds: msg
                .funds
                .iter()
                .map(|coin| (coin.denom.to_string(), coin.amount))
                .collect(),
        }
    } else if let Ok(msg) = MsgExecuteContract::from_any(any) {
        SentMsg::Execute {
            contract: msg.contract.to_string(),
            msg: serde_json::from_slice(&msg.msg).unwrap(),
        }
    } else {
        panic!("unexpected message type {}", any.type_url)
    }
}

/// A result carrying a single event attribute
fn result_with_event(txhash: String, event: &str, attribute: &str, value: String) -> TxResult {
    let mut result = TxResult {
        txhash,
        height: 1,
        ..Default::default()
    };
    result
        .events
        .entry(event.to_string())
        .or_default()
        .insert(attribute.to_string(), vec![value]);
    result
}

impl ChainClient for MockChain {
    fn chain_id(&self) -> &str {
        MOCK_CHAIN_ID
    }

    async fn account(&self, _address: &str) -> Result<AccountInfo, ScriptError> {
        Ok(AccountInfo {
            account_number: MOCK_ACCOUNT_NUMBER,
            sequence: self.state.lock().unwrap().sequence,
        })
    }

    async fn simulate(&self, tx_bytes: &[u8]) -> Result<u64, ScriptError> {
        Tx::from_bytes(tx_bytes).map_err(|e| ScriptError::Serde(e.to_string()))?;
        Ok(MOCK_GAS_USED)
    }

    async fn broadcast_and_confirm(&self, tx_bytes: Vec<u8>) -> Result<TxResult, ScriptError> {
        let tx = Tx::from_bytes(&tx_bytes).map_err(|e| ScriptError::Serde(e.to_string()))?;
        let sent = decode_msg(&tx);

        let mut state = self.state.lock().unwrap();
        assert_eq!(
            tx.auth_info.signer_infos[0].sequence, state.sequence,
            "tx signed with a stale sequence"
        );
        state.sequence += 1;
        state.sent.push(sent.clone());
        let txhash = format!("{:064X}", state.sequence);

        if let Some((code, raw_log)) = self.failure.as_ref().and_then(|fail| fail(&sent)) {
            return Ok(TxResult {
                txhash,
                code,
                codespace: "wasm".to_string(),
                raw_log,
                ..Default::default()
            });
        }

        if !self.emit_events {
            return Ok(TxResult {
                txhash,
                height: 1,
                ..Default::default()
            });
        }

        let result = match sent {
            SentMsg::StoreCode { .. } => {
                let code_id = state.next_code_id;
                state.next_code_id += 1;
                result_with_event(txhash, "store_code", "code_id", code_id.to_string())
            }
            SentMsg::Instantiate { .. } => {
                let byte = state.next_address_byte;
                state.next_address_byte += 1;
                result_with_event(
                    txhash,
                    "instantiate_contract",
                    "contract_address",
                    mock_address(byte),
                )
            }
            SentMsg::Execute { contract, .. } => {
                result_with_event(txhash, "wasm", "contract_address", contract)
            }
        };

        Ok(result)
    }

    async fn query(&self, contract: &str, query: &Value) -> Result<Value, ScriptError> {
        Ok(json!({ "contract": contract, "query": query }))
    }
}

/// The deployer wallet used in the tests
pub fn test_wallet() -> Wallet {
    Wallet::from_mnemonic(
        TEST_MNEMONIC,
        GasConfig {
            price: 0.15,
            denom: "uluna".to_string(),
            adjustment: 1.75,
        },
    )
    .unwrap()
}

/// A directory holding a fake artifact for every contract
pub fn write_artifacts() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (i, artifact) in [
        TREASURY_ARTIFACT,
        STAKED_TOKEN_ARTIFACT,
        DISTRIBUTOR_ARTIFACT,
        STAKING_ARTIFACT,
        BOND_ARTIFACT,
    ]
    .iter()
    .enumerate()
    {
        let mut bytecode = b"\0asm\x01\0\0\0".to_vec();
        bytecode.extend(std::iter::repeat(0u8).take(i * 16));
        fs::write(dir.path().join(artifact), bytecode).unwrap();
    }

    dir
}
