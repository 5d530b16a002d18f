//! Tests for the transaction helpers against the mock chain

mod common;

use common::{
    mock_address, test_wallet, write_artifacts, MockChain, SentMsg, FIRST_ADDRESS_BYTE,
    FIRST_CODE_ID,
};
use eyre::Result;
use scripts::{
    constants::TREASURY_ARTIFACT,
    errors::ScriptError,
    helpers::{execute_contract, instantiate_contract, queue_and_toggle, store_code},
    msgs::TreasuryExecuteMsg,
    types::{Coin, Managing},
};
use serde_json::json;

#[tokio::test]
async fn test_store_code_returns_code_id() -> Result<()> {
    let chain = MockChain::new();
    let wallet = test_wallet();
    let artifacts = write_artifacts();

    let code_id = store_code(&wallet, &chain, &artifacts.path().join(TREASURY_ARTIFACT)).await?;

    assert_eq!(code_id, FIRST_CODE_ID);
    assert_eq!(chain.sent(), vec![SentMsg::StoreCode { size: 8 }]);
    Ok(())
}

#[tokio::test]
async fn test_store_code_without_event() -> Result<()> {
    let chain = MockChain::new().without_events();
    let wallet = test_wallet();
    let artifacts = write_artifacts();

    let res = store_code(&wallet, &chain, &artifacts.path().join(TREASURY_ARTIFACT)).await;

    assert!(matches!(res, Err(ScriptError::MissingEvent { .. })));
    Ok(())
}

#[tokio::test]
async fn test_store_code_missing_artifact() -> Result<()> {
    let chain = MockChain::new();
    let wallet = test_wallet();
    let artifacts = write_artifacts();

    let res = store_code(&wallet, &chain, &artifacts.path().join("missing.wasm")).await;

    assert!(matches!(res, Err(ScriptError::ReadArtifact(_))));
    assert!(chain.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_instantiate_contract() -> Result<()> {
    let chain = MockChain::new();
    let wallet = test_wallet();
    let funds = vec![Coin {
        denom: "uluna".to_string(),
        amount: 42,
    }];

    let address = instantiate_contract(
        &wallet,
        &chain,
        FIRST_CODE_ID,
        "lumen-treasury",
        &json!({ "admin": wallet.address() }),
        &funds,
    )
    .await?;

    assert_eq!(address, mock_address(FIRST_ADDRESS_BYTE));
    assert_eq!(
        chain.sent(),
        vec![SentMsg::Instantiate {
            code_id: FIRST_CODE_ID,
            label: "lumen-treasury".to_string(),
            admin: Some(wallet.address()),
            msg: json!({ "admin": wallet.address() }),
            funds: vec![("uluna".to_string(), 42)],
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_instantiate_reports_code() -> Result<()> {
    let chain = MockChain::new().fail_when(|msg| match msg {
        SentMsg::Instantiate { .. } => Some((5, "out of gas".to_string())),
        _ => None,
    });
    let wallet = test_wallet();

    let res = instantiate_contract(&wallet, &chain, FIRST_CODE_ID, "x", &json!({}), &[]).await;

    match res {
        Err(ScriptError::Transaction { code, raw_log, .. }) => {
            assert_eq!(code, 5);
            assert_eq!(raw_log, "out of gas");
        }
        other => panic!("expected a transaction error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_execute_invalid_contract_address() -> Result<()> {
    let chain = MockChain::new();
    let wallet = test_wallet();

    let res = execute_contract(&wallet, &chain, "not-an-address", &json!({}), &[]).await;

    assert!(matches!(res, Err(ScriptError::TxConstruction(_))));
    assert!(chain.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_consecutive_txs_use_fresh_sequences() -> Result<()> {
    let chain = MockChain::new();
    let wallet = test_wallet();
    let contract = mock_address(0x01);

    // The mock chain rejects any tx signed with a stale sequence
    for amount in 0..3 {
        let msg = TreasuryExecuteMsg::Deposit {
            amount,
            profit: 0,
            depositor: wallet.address(),
        };
        execute_contract(&wallet, &chain, &contract, &msg, &[]).await?;
    }

    assert_eq!(chain.actions(), vec!["deposit", "deposit", "deposit"]);
    Ok(())
}

#[tokio::test]
async fn test_queue_and_toggle() -> Result<()> {
    let chain = MockChain::new();
    let wallet = test_wallet();
    let treasury = mock_address(0x01);
    let grantee = mock_address(0x02);

    queue_and_toggle(&wallet, &chain, &treasury, Managing::RewardManager, &grantee).await?;

    let sent = chain.sent();
    assert_eq!(chain.actions(), vec!["queue", "toggle"]);
    for msg in &sent {
        assert!(matches!(msg, SentMsg::Execute { contract, .. } if contract == &treasury));
        assert_eq!(msg.body(), Some(&json!({ "managing": 8, "address": grantee })));
    }
    Ok(())
}

#[tokio::test]
async fn test_failed_queue_skips_toggle() -> Result<()> {
    let chain = MockChain::new().fail_when(|msg| {
        (msg.action().as_deref() == Some("queue")).then(|| (4, "unauthorized".to_string()))
    });
    let wallet = test_wallet();
    let treasury = mock_address(0x01);

    let res =
        queue_and_toggle(&wallet, &chain, &treasury, Managing::ReserveSpender, &wallet.address())
            .await;

    assert!(matches!(res, Err(ScriptError::Transaction { code: 4, .. })));
    assert_eq!(chain.actions(), vec!["queue"]);
    Ok(())
}
