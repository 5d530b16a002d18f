//! Definitions of the contract messages sent during deployment

use serde::Serialize;

// ------------
// | Treasury |
// ------------

/// Instantiates the treasury
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TreasuryInstantiateMsg {
    /// The treasury admin
    pub admin: String,
    /// The staked token address
    #[serde(rename = "sLUM")]
    pub slum: String,
    /// The number of blocks a permission stays queued before it can be toggled
    pub blocks_needed_for_queue: u64,
}

/// Treasury execute messages
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TreasuryExecuteMsg {
    /// Propose a permission grant
    Queue {
        /// The role index
        managing: u8,
        /// The grantee
        address: String,
    },
    /// Activate a queued permission grant
    Toggle {
        /// The role index
        managing: u8,
        /// The grantee
        address: String,
    },
    /// Deposit reserves, minting LUM
    Deposit {
        /// The deposited amount
        amount: u64,
        /// The amount kept by the treasury as profit
        profit: u64,
        /// The depositor
        depositor: String,
    },
}

// ----------------
// | Staked token |
// ----------------

/// Instantiates the staked token
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StakedTokenInstantiateMsg {
    /// The token name
    pub name: String,
    /// The token symbol
    pub symbol: String,
    /// The token decimals
    pub decimals: u8,
    /// The token admin
    pub admin: String,
}

/// Staked token execute messages
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StakedTokenExecuteMsg {
    /// Bind the token to the staking contract
    Initialize {
        /// The staking contract
        staking_contract_addr: String,
    },
}

// ---------------
// | Distributor |
// ---------------

/// Instantiates the distributor
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DistributorInstantiateMsg {
    /// The LUM token, i.e. the treasury
    pub lum: String,
    /// The epoch length, in blocks
    pub epoch_length: u64,
    /// When the next epoch starts
    pub next_epoch: u64,
}

/// Distributor execute messages
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum DistributorExecuteMsg {
    /// Register a reward recipient
    AddRecipient {
        /// The recipient
        recipient: String,
        /// The reward rate, in ten-thousandths of a percent
        reward_rate: u64,
    },
}

// -----------
// | Staking |
// -----------

/// Instantiates the staking contract
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StakingInstantiateMsg {
    /// Bond contracts allowed to stake on behalf of users
    pub bonds: Vec<String>,
    /// The staking admin
    pub admin: String,
    /// The LUM token, i.e. the treasury
    pub lum: String,
    /// The staked token
    pub slum: String,
    /// The distributor
    pub distributor: String,
    /// The epoch the staking contract starts at
    pub epoch_number: u64,
    /// When the first epoch ends
    pub epoch_block: u64,
}

// --------
// | Bond |
// --------

/// Instantiates the bond depository
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BondInstantiateMsg {
    /// The bond admin
    pub admin: String,
    /// The treasury
    pub treasury: String,
    /// The DAO receiving bond fees
    pub dao: String,
    /// The staking contract
    pub staking: String,
    /// The debt the bond starts with
    pub total_debt: u64,
    /// The last block debt decayed at
    pub last_decay: u64,
}

/// Bond depository execute messages
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BondExecuteMsg {
    /// Set the bond terms
    Init {
        /// Scales the bond price
        control_variable: u64,
        /// The vesting term, in blocks
        vesting_term: u64,
        /// The minimum bond price
        minimum_price: u64,
        /// The maximum payout, in thousandths of a percent of supply
        max_payout: u64,
        /// The DAO fee, in hundredths of a percent
        fee: u64,
        /// The maximum debt
        max_debt: u64,
        /// The initial debt
        initial_debt: u64,
    },
    /// Set the staking contract and its helper
    SetStaking {
        /// The staking contract
        staking: String,
        /// The staking helper
        helper: String,
    },
}
