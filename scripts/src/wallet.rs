//! The signing identity of the deployer

use std::str::FromStr;

use cosmrs::{
    bip32::DerivationPath,
    crypto::secp256k1::SigningKey,
    tendermint::chain::Id as ChainId,
    tx::{Body, Fee, SignDoc, SignerInfo},
    AccountId, Any, Coin as CosmosCoin, Denom,
};
use tracing::debug;

use crate::{
    client::ChainClient,
    constants::{ACCOUNT_PREFIX, SIMULATION_GAS_LIMIT, TERRA_HD_PATH},
    errors::ScriptError,
    types::{AccountInfo, Coin},
};

/// How transaction fees are computed from the simulated gas usage
#[derive(Debug, Clone, PartialEq)]
pub struct GasConfig {
    /// The price of a unit of gas, in `denom`
    pub price: f64,
    /// The denomination fees are paid in
    pub denom: String,
    /// The multiplier applied to the simulated gas usage
    pub adjustment: f64,
}

impl GasConfig {
    /// The gas limit to request for a transaction that used `gas_used` in simulation
    pub fn gas_limit(&self, gas_used: u64) -> u64 {
        (gas_used as f64 * self.adjustment).ceil() as u64
    }

    /// The fee amount to pay for the given gas limit
    pub fn fee_amount(&self, gas_limit: u64) -> u128 {
        (gas_limit as f64 * self.price).ceil() as u128
    }
}

/// A wallet derived from a mnemonic, signing for a single Terra account
pub struct Wallet {
    /// The secp256k1 signing key
    signing_key: SigningKey,
    /// The account address
    address: AccountId,
    /// The fee configuration
    gas: GasConfig,
}

impl Wallet {
    /// Derive the wallet from a BIP-39 mnemonic on the Terra HD path
    pub fn from_mnemonic(mnemonic: &str, gas: GasConfig) -> Result<Self, ScriptError> {
        let normalized = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");
        let seed = bip39::Mnemonic::parse_normalized(&normalized)
            .map_err(|e| ScriptError::KeyDerivation(e.to_string()))?
            .to_seed_normalized("");

        let path = DerivationPath::from_str(TERRA_HD_PATH)
            .map_err(|e| ScriptError::KeyDerivation(e.to_string()))?;
        let signing_key = SigningKey::derive_from_path(seed, &path)
            .map_err(|e| ScriptError::KeyDerivation(e.to_string()))?;
        let address = signing_key
            .public_key()
            .account_id(ACCOUNT_PREFIX)
            .map_err(|e| ScriptError::KeyDerivation(e.to_string()))?;

        Ok(Wallet {
            signing_key,
            address,
            gas,
        })
    }

    /// The account address
    pub fn account_id(&self) -> &AccountId {
        &self.address
    }

    /// The account address as a string
    pub fn address(&self) -> String {
        self.address.to_string()
    }

    /// Build a transaction holding exactly `msg`, estimate its fee and sign it
    pub async fn create_and_sign_tx(
        &self,
        client: &impl ChainClient,
        msg: Any,
    ) -> Result<Vec<u8>, ScriptError> {
        let account = client.account(self.address.as_ref()).await?;
        let chain_id = ChainId::from_str(client.chain_id())
            .map_err(|e| ScriptError::TxConstruction(e.to_string()))?;
        let body = Body::new(vec![msg], "", 0u32);

        let simulation_tx = self.sign(&body, &chain_id, account, 0, SIMULATION_GAS_LIMIT)?;
        let gas_used = client.simulate(&simulation_tx).await?;

        let gas_limit = self.gas.gas_limit(gas_used);
        let fee_amount = self.gas.fee_amount(gas_limit);
        debug!(
            "gas used {}, limit {}, fee {}{}",
            gas_used, gas_limit, fee_amount, self.gas.denom
        );

        self.sign(&body, &chain_id, account, fee_amount, gas_limit)
    }

    /// Sign a transaction body with SIGN_MODE_DIRECT
    fn sign(
        &self,
        body: &Body,
        chain_id: &ChainId,
        account: AccountInfo,
        fee_amount: u128,
        gas_limit: u64,
    ) -> Result<Vec<u8>, ScriptError> {
        let fee = Fee::from_amount_and_gas(
            CosmosCoin {
                denom: parse_denom(&self.gas.denom)?,
                amount: fee_amount,
            },
            gas_limit,
        );
        let auth_info =
            SignerInfo::single_direct(Some(self.signing_key.public_key()), account.sequence)
                .auth_info(fee);

        SignDoc::new(body, &auth_info, chain_id, account.account_number)
            .and_then(|doc| doc.sign(&self.signing_key))
            .and_then(|raw| raw.to_bytes())
            .map_err(|e| ScriptError::TxConstruction(e.to_string()))
    }
}

/// Convert coins into their protobuf representation
pub fn to_cosmos_coins(coins: &[Coin]) -> Result<Vec<CosmosCoin>, ScriptError> {
    coins
        .iter()
        .map(|coin| {
            Ok(CosmosCoin {
                denom: parse_denom(&coin.denom)?,
                amount: coin.amount,
            })
        })
        .collect()
}

/// Parse a denomination
fn parse_denom(denom: &str) -> Result<Denom, ScriptError> {
    denom
        .parse::<Denom>()
        .map_err(|e| ScriptError::TxConstruction(e.to_string()))
}
