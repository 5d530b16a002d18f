//! Type definitions used throughout the scripts

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
};

use crate::{
    constants::{
        BOND_ARTIFACT, DISTRIBUTOR_ARTIFACT, STAKED_TOKEN_ARTIFACT, STAKING_ARTIFACT,
        TREASURY_ARTIFACT,
    },
    errors::ScriptError,
};

/// The contracts making up a Lumen deployment
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContractKind {
    /// The treasury contract, which also acts as the LUM token
    Treasury,
    /// The staked token (sLUM) contract
    StakedToken,
    /// The reward distributor contract
    Distributor,
    /// The staking contract
    Staking,
    /// The bond depository contract
    Bond,
}

impl ContractKind {
    /// The file name of the compiled artifact
    pub fn artifact(&self) -> &'static str {
        match self {
            ContractKind::Treasury => TREASURY_ARTIFACT,
            ContractKind::StakedToken => STAKED_TOKEN_ARTIFACT,
            ContractKind::Distributor => DISTRIBUTOR_ARTIFACT,
            ContractKind::Staking => STAKING_ARTIFACT,
            ContractKind::Bond => BOND_ARTIFACT,
        }
    }

    /// The name under which the address is reported, e.g. `TREASURY_ADDRESS`
    pub fn report_name(&self) -> &'static str {
        match self {
            ContractKind::Treasury => "TREASURY_ADDRESS",
            ContractKind::StakedToken => "SLUM_ADDRESS",
            ContractKind::Distributor => "DISTRIBUTOR_ADDRESS",
            ContractKind::Staking => "STAKING_ADDRESS",
            ContractKind::Bond => "BOND_ADDRESS",
        }
    }
}

impl Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractKind::Treasury => write!(f, "lumen-treasury"),
            ContractKind::StakedToken => write!(f, "s-lumen"),
            ContractKind::Distributor => write!(f, "lumen-distributor"),
            ContractKind::Staking => write!(f, "lumen-staking"),
            ContractKind::Bond => write!(f, "lumen-bond-depository"),
        }
    }
}

/// A stored and instantiated contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDescriptor {
    /// The code ID the contract was instantiated from
    pub code_id: u64,
    /// The bech32 address of the contract instance
    pub address: String,
}

/// The treasury permissions granted during deployment, as the role indices taken by the
/// treasury's `queue` / `toggle` messages
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum Managing {
    /// May deposit reserve assets
    ReserveDepositor = 0,
    /// May spend reserves
    ReserveSpender = 1,
    /// May deposit liquidity tokens
    LiquidityDepositor = 4,
    /// May mint rewards
    RewardManager = 8,
}

impl Managing {
    /// The role index sent to the treasury
    pub fn index(self) -> u8 {
        self as u8
    }
}

impl Display for Managing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Managing::ReserveDepositor => write!(f, "reserve depositor"),
            Managing::ReserveSpender => write!(f, "reserve spender"),
            Managing::LiquidityDepositor => write!(f, "liquidity depositor"),
            Managing::RewardManager => write!(f, "reward manager"),
        }
    }
}

/// An amount of a native denomination, e.g. `10000000uluna`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coin {
    /// The denomination
    pub denom: String,
    /// The amount, in the smallest unit of the denomination
    pub amount: u128,
}

impl FromStr for Coin {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ScriptError::Serde(format!("coin `{}` has no denomination", s)))?;
        let (amount, denom) = s.split_at(split);

        let amount = amount
            .parse::<u128>()
            .map_err(|e| ScriptError::Serde(format!("coin `{}`: {}", s, e)))?;

        Ok(Coin {
            denom: denom.to_string(),
            amount,
        })
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Parse a comma-separated list of coins, e.g. `10000000uluna,1000000ukrw`
pub fn parse_coins(s: &str) -> Result<Vec<Coin>, ScriptError> {
    s.split(',')
        .filter(|c| !c.trim().is_empty())
        .map(Coin::from_str)
        .collect()
}

/// The account number and sequence of an on-chain account
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    /// The account number
    pub account_number: u64,
    /// The sequence, i.e. the number of transactions the account has sent
    pub sequence: u64,
}

/// Events of a transaction, indexed as `event type -> attribute key -> values`
pub type EventsByType = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// The outcome of a broadcast transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxResult {
    /// The transaction hash
    pub txhash: String,
    /// The height the transaction was included at, zero if it never was
    pub height: i64,
    /// The ABCI result code, zero on success
    pub code: u32,
    /// The module namespace of a non-zero code
    pub codespace: String,
    /// The raw log returned by the node
    pub raw_log: String,
    /// The events emitted by the transaction
    pub events: EventsByType,
}

impl TxResult {
    /// Whether the chain accepted the transaction
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// All values of the given attribute in the given event
    pub fn attribute_values(&self, event: &str, attribute: &str) -> Option<&[String]> {
        self.events
            .get(event)
            .and_then(|attrs| attrs.get(attribute))
            .map(Vec::as_slice)
    }

    /// The first value of the given attribute in the given event
    pub fn first_attribute(&self, event: &str, attribute: &str) -> Option<&str> {
        self.attribute_values(event, attribute)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
