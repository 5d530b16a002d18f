//! The deployment sequence of the Lumen contracts.
//!
//! Every step reads the addresses it depends on from a [`DeploymentState`] and records the
//! contracts it creates there, so steps run strictly in order and a failure aborts the rest.
//! Contracts created before a failure stay on chain; nothing is rolled back.

use std::{io::Write, path::PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    client::ChainClient,
    constants::{
        BOND_CONTROL_VARIABLE, BOND_FEE, BOND_INITIAL_DEBT, BOND_MAX_DEBT, BOND_MAX_PAYOUT,
        BOND_MINIMUM_PRICE, BOND_VESTING_TERM, DEFAULT_ARTIFACTS_DIR,
        DEFAULT_BLOCKS_NEEDED_FOR_QUEUE, DEFAULT_DAO_ADDRESS, EPOCH_LENGTH,
        INITIAL_DEPOSIT_AMOUNT, INITIAL_DEPOSIT_PROFIT, STAKED_TOKEN_DECIMALS, STAKED_TOKEN_NAME,
        STAKED_TOKEN_SYMBOL, STAKING_EPOCH_NUMBER, STAKING_REWARD_RATE,
    },
    errors::ScriptError,
    helpers::{execute_contract, instantiate_contract, queue_and_toggle, store_code},
    msgs::{
        BondExecuteMsg, BondInstantiateMsg, DistributorExecuteMsg, DistributorInstantiateMsg,
        StakedTokenExecuteMsg, StakedTokenInstantiateMsg, StakingInstantiateMsg,
        TreasuryExecuteMsg, TreasuryInstantiateMsg,
    },
    types::{Coin, ContractDescriptor, ContractKind, Managing},
    utils::write_deployed_address,
    wallet::Wallet,
};

/// The parameters of a deployment that are not fixed by the protocol
#[derive(Debug, Clone)]
pub struct DeployParams {
    /// The directory holding the compiled artifacts
    pub artifacts_dir: PathBuf,
    /// The DAO receiving bond fees
    pub dao: String,
    /// The number of blocks a treasury permission stays queued
    pub blocks_needed_for_queue: u64,
    /// The start time of the first epoch, in milliseconds since the Unix epoch
    pub epoch_start_ms: u64,
    /// The funds sent along with the treasury instantiation
    pub treasury_funds: Vec<Coin>,
    /// Where to record deployed addresses, if anywhere
    pub deployments_path: Option<PathBuf>,
}

impl DeployParams {
    /// The default parameters, starting the first epoch at `epoch_start_ms`
    pub fn new(epoch_start_ms: u64) -> Self {
        DeployParams {
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            dao: DEFAULT_DAO_ADDRESS.to_string(),
            blocks_needed_for_queue: DEFAULT_BLOCKS_NEEDED_FOR_QUEUE,
            epoch_start_ms,
            treasury_funds: Vec::new(),
            deployments_path: None,
        }
    }

    /// The path of a contract's artifact
    pub fn artifact_path(&self, kind: ContractKind) -> PathBuf {
        self.artifacts_dir.join(kind.artifact())
    }
}

/// The contracts deployed so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentState {
    /// The treasury
    pub treasury: Option<ContractDescriptor>,
    /// The staked token
    pub staked_token: Option<ContractDescriptor>,
    /// The reward distributor
    pub distributor: Option<ContractDescriptor>,
    /// The staking contract
    pub staking: Option<ContractDescriptor>,
    /// The bond depository
    pub bond: Option<ContractDescriptor>,
}

impl DeploymentState {
    /// The descriptor of a contract, if deployed
    pub fn get(&self, kind: ContractKind) -> Option<&ContractDescriptor> {
        match kind {
            ContractKind::Treasury => self.treasury.as_ref(),
            ContractKind::StakedToken => self.staked_token.as_ref(),
            ContractKind::Distributor => self.distributor.as_ref(),
            ContractKind::Staking => self.staking.as_ref(),
            ContractKind::Bond => self.bond.as_ref(),
        }
    }

    /// The address of a contract a step depends on
    pub fn require(&self, kind: ContractKind) -> Result<String, ScriptError> {
        self.get(kind)
            .map(|contract| contract.address.clone())
            .ok_or_else(|| ScriptError::MissingDependency(kind.to_string()))
    }

    /// Record a deployed contract
    fn set(&mut self, kind: ContractKind, contract: ContractDescriptor) {
        let slot = match kind {
            ContractKind::Treasury => &mut self.treasury,
            ContractKind::StakedToken => &mut self.staked_token,
            ContractKind::Distributor => &mut self.distributor,
            ContractKind::Staking => &mut self.staking,
            ContractKind::Bond => &mut self.bond,
        };
        *slot = Some(contract);
    }
}

/// Everything a deployment step needs besides the state
pub struct Deployer<'a, C: ChainClient> {
    /// The deployer wallet
    pub wallet: &'a Wallet,
    /// The chain client
    pub client: &'a C,
    /// The deployment parameters
    pub params: &'a DeployParams,
}

impl<'a, C: ChainClient> Deployer<'a, C> {
    /// Create a deployer
    pub fn new(wallet: &'a Wallet, client: &'a C, params: &'a DeployParams) -> Self {
        Deployer {
            wallet,
            client,
            params,
        }
    }

    /// Store a contract's artifact, instantiate it and record it in the state
    async fn store_and_instantiate(
        &self,
        state: &mut DeploymentState,
        kind: ContractKind,
        init_msg: &impl Serialize,
        funds: &[Coin],
    ) -> Result<String, ScriptError> {
        let code_id = store_code(self.wallet, self.client, &self.params.artifact_path(kind)).await?;
        let address = instantiate_contract(
            self.wallet,
            self.client,
            code_id,
            &kind.to_string(),
            init_msg,
            funds,
        )
        .await?;
        info!("{} instantiated from code {} at {}", kind, code_id, address);

        if let Some(path) = &self.params.deployments_path {
            write_deployed_address(path, &kind.to_string(), &address)?;
        }

        state.set(
            kind,
            ContractDescriptor {
                code_id,
                address: address.clone(),
            },
        );
        Ok(address)
    }
}

// ---------
// | Steps |
// ---------

/// Store and instantiate the treasury, with the deployer standing in for sLUM
pub async fn deploy_treasury(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &mut DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let init_msg = TreasuryInstantiateMsg {
        admin: deployer.wallet.address(),
        slum: deployer.wallet.address(),
        blocks_needed_for_queue: deployer.params.blocks_needed_for_queue,
    };
    let address = deployer
        .store_and_instantiate(
            state,
            ContractKind::Treasury,
            &init_msg,
            &deployer.params.treasury_funds,
        )
        .await?;

    report(out, &format!("{}: \"{}\"", ContractKind::Treasury.report_name(), address))
}

/// Store and instantiate the staked token
pub async fn deploy_staked_token(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &mut DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let init_msg = StakedTokenInstantiateMsg {
        name: STAKED_TOKEN_NAME.to_string(),
        symbol: STAKED_TOKEN_SYMBOL.to_string(),
        decimals: STAKED_TOKEN_DECIMALS,
        admin: deployer.wallet.address(),
    };
    deployer
        .store_and_instantiate(state, ContractKind::StakedToken, &init_msg, &[])
        .await?;

    report(out, "SLUM Instantiated")
}

/// Store and instantiate the reward distributor
pub async fn deploy_distributor(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &mut DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let init_msg = DistributorInstantiateMsg {
        lum: state.require(ContractKind::Treasury)?,
        epoch_length: EPOCH_LENGTH,
        next_epoch: deployer.params.epoch_start_ms,
    };
    deployer
        .store_and_instantiate(state, ContractKind::Distributor, &init_msg, &[])
        .await?;

    report(out, "Distributor Instantiated")
}

/// Store and instantiate the staking contract
pub async fn deploy_staking(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &mut DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let init_msg = StakingInstantiateMsg {
        bonds: Vec::new(),
        admin: deployer.wallet.address(),
        lum: state.require(ContractKind::Treasury)?,
        slum: state.require(ContractKind::StakedToken)?,
        distributor: state.require(ContractKind::Distributor)?,
        epoch_number: STAKING_EPOCH_NUMBER,
        epoch_block: deployer.params.epoch_start_ms,
    };
    deployer
        .store_and_instantiate(state, ContractKind::Staking, &init_msg, &[])
        .await?;

    report(out, "Staking Instantiated")
}

/// Bind the staked token to the staking contract
pub async fn initialize_staked_token(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let msg = StakedTokenExecuteMsg::Initialize {
        staking_contract_addr: state.require(ContractKind::Staking)?,
    };
    let staked_token = state.require(ContractKind::StakedToken)?;
    execute_contract(deployer.wallet, deployer.client, &staked_token, &msg, &[]).await?;

    report(out, "SLUM Initialized")
}

/// Store and instantiate the bond depository
pub async fn deploy_bond(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &mut DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let init_msg = BondInstantiateMsg {
        admin: deployer.wallet.address(),
        treasury: state.require(ContractKind::Treasury)?,
        dao: deployer.params.dao.clone(),
        staking: state.require(ContractKind::Staking)?,
        total_debt: 0,
        last_decay: 0,
    };
    deployer
        .store_and_instantiate(state, ContractKind::Bond, &init_msg, &[])
        .await?;

    report(out, "Bond Instantiated")
}

/// Set the bond terms, then point the bond at the staking contract
pub async fn initialize_bond(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let bond = state.require(ContractKind::Bond)?;
    let staking = state.require(ContractKind::Staking)?;

    let init = BondExecuteMsg::Init {
        control_variable: BOND_CONTROL_VARIABLE,
        vesting_term: BOND_VESTING_TERM,
        minimum_price: BOND_MINIMUM_PRICE,
        max_payout: BOND_MAX_PAYOUT,
        fee: BOND_FEE,
        max_debt: BOND_MAX_DEBT,
        initial_debt: BOND_INITIAL_DEBT,
    };
    execute_contract(deployer.wallet, deployer.client, &bond, &init, &[]).await?;
    report(out, "Bond Initialized")?;

    let set_staking = BondExecuteMsg::SetStaking {
        staking: staking.clone(),
        helper: staking,
    };
    execute_contract(deployer.wallet, deployer.client, &bond, &set_staking, &[]).await?;
    report(out, "Set staking in Bond")
}

/// Grant the deployer, the bond and the distributor their treasury roles
pub async fn grant_treasury_roles(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    if deployer.params.blocks_needed_for_queue != 0 {
        warn!(
            "treasury queues permissions for {} blocks but toggles are sent immediately",
            deployer.params.blocks_needed_for_queue
        );
    }

    let treasury = state.require(ContractKind::Treasury)?;
    let deployer_address = deployer.wallet.address();
    let bond = state.require(ContractKind::Bond)?;
    let distributor = state.require(ContractKind::Distributor)?;

    let (wallet, client) = (deployer.wallet, deployer.client);

    queue_and_toggle(wallet, client, &treasury, Managing::ReserveSpender, &deployer_address).await?;
    report(out, "QUEUE AND TOGGLE DEPLOYER AS RESERVE SPENDER")?;

    for role in [Managing::ReserveDepositor, Managing::LiquidityDepositor] {
        queue_and_toggle(wallet, client, &treasury, role, &deployer_address).await?;
    }
    report(out, "QUEUE & TOGGLE DEPLOYER in TREASURY as RESERVE/LIQUIDITY DEPOSITOR")?;

    for role in [Managing::ReserveDepositor, Managing::LiquidityDepositor] {
        queue_and_toggle(wallet, client, &treasury, role, &bond).await?;
    }
    report(out, "QUEUE & TOGGLE BOND in TREASURY as RESERVE/LIQUIDITY DEPOSITOR")?;

    queue_and_toggle(wallet, client, &treasury, Managing::RewardManager, &distributor).await?;
    report(out, "QUEUE AND TOGGLE DISTRIBUTOR AS REWARDS MANAGER")
}

/// Register the staking contract as a reward recipient of the distributor
pub async fn register_staking_rewards(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let distributor = state.require(ContractKind::Distributor)?;
    let msg = DistributorExecuteMsg::AddRecipient {
        recipient: state.require(ContractKind::Staking)?,
        reward_rate: STAKING_REWARD_RATE,
    };
    execute_contract(deployer.wallet, deployer.client, &distributor, &msg, &[]).await?;

    report(out, "Added staking as recipient to distributor")
}

/// Make the initial reserve deposit into the treasury
pub async fn seed_treasury(
    deployer: &Deployer<'_, impl ChainClient>,
    state: &DeploymentState,
    out: &mut impl Write,
) -> Result<(), ScriptError> {
    let treasury = state.require(ContractKind::Treasury)?;
    let msg = TreasuryExecuteMsg::Deposit {
        amount: INITIAL_DEPOSIT_AMOUNT,
        profit: INITIAL_DEPOSIT_PROFIT,
        depositor: deployer.wallet.address(),
    };
    execute_contract(deployer.wallet, deployer.client, &treasury, &msg, &[]).await?;

    report(out, "Deposited into treasury")
}

/// Print the deployed addresses, ready to paste into a frontend config
pub fn print_summary(state: &DeploymentState, out: &mut impl Write) -> Result<(), ScriptError> {
    for kind in [
        ContractKind::StakedToken,
        ContractKind::Staking,
        ContractKind::Treasury,
        ContractKind::Bond,
        ContractKind::Distributor,
    ] {
        let address = state.require(kind)?;
        report(out, &format!("{}: \"{}\",", kind.report_name(), address))?;
    }

    Ok(())
}

// -----------------
// | Orchestration |
// -----------------

/// Deploy and wire the whole suite
pub async fn deploy_all(
    deployer: &Deployer<'_, impl ChainClient>,
    out: &mut impl Write,
) -> Result<DeploymentState, ScriptError> {
    let mut state = DeploymentState::default();
    report(out, "Big Bang")?;

    deploy_treasury(deployer, &mut state, out).await?;
    deploy_staked_token(deployer, &mut state, out).await?;
    deploy_distributor(deployer, &mut state, out).await?;
    deploy_staking(deployer, &mut state, out).await?;
    initialize_staked_token(deployer, &state, out).await?;
    deploy_bond(deployer, &mut state, out).await?;
    initialize_bond(deployer, &state, out).await?;
    grant_treasury_roles(deployer, &state, out).await?;
    register_staking_rewards(deployer, &state, out).await?;
    seed_treasury(deployer, &state, out).await?;

    print_summary(&state, out)?;
    Ok(state)
}

/// Deploy the treasury alone
pub async fn deploy_treasury_only(
    deployer: &Deployer<'_, impl ChainClient>,
    out: &mut impl Write,
) -> Result<DeploymentState, ScriptError> {
    let mut state = DeploymentState::default();
    deploy_treasury(deployer, &mut state, out).await?;
    Ok(state)
}

/// Write a report line
fn report(out: &mut impl Write, line: &str) -> Result<(), ScriptError> {
    writeln!(out, "{}", line).map_err(|e| ScriptError::WriteFile(e.to_string()))
}
