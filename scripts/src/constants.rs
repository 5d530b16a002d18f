//! Constants used in the deploy scripts

// -----------
// | Network |
// -----------

/// The default LCD endpoint, a LocalTerra node
pub const DEFAULT_LCD_URL: &str = "http://localhost:1317";

/// The default chain ID, matching LocalTerra
pub const DEFAULT_CHAIN_ID: &str = "localterra";

/// The bech32 prefix of Terra account addresses
pub const ACCOUNT_PREFIX: &str = "terra";

/// The BIP-44 derivation path for Terra keys (coin type 330)
pub const TERRA_HD_PATH: &str = "m/44'/330'/0'/0/0";

/// The default price of a unit of gas, in `DEFAULT_GAS_DENOM`
pub const DEFAULT_GAS_PRICE: &str = "0.15";

/// The default denomination in which fees are paid
pub const DEFAULT_GAS_DENOM: &str = "uluna";

/// The default multiplier applied to the simulated gas usage
pub const DEFAULT_GAS_ADJUSTMENT: &str = "1.75";

/// The gas limit placed in the transaction used for simulation
pub const SIMULATION_GAS_LIMIT: u64 = 0;

/// The broadcast mode used when submitting transactions
pub const BROADCAST_MODE: &str = "BROADCAST_MODE_SYNC";

/// The interval between two polls for a broadcast transaction, in milliseconds
pub const TX_POLL_INTERVAL_MS: u64 = 1_000;

/// The number of times a broadcast transaction is polled for before giving up
pub const TX_POLL_ATTEMPTS: usize = 60;

// -------------
// | Artifacts |
// -------------

/// The default directory containing the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "../artifacts";

/// The treasury contract artifact
pub const TREASURY_ARTIFACT: &str = "lumen_treasury.wasm";

/// The staked token (sLUM) contract artifact
pub const STAKED_TOKEN_ARTIFACT: &str = "s_lumen_cw20.wasm";

/// The reward distributor contract artifact
pub const DISTRIBUTOR_ARTIFACT: &str = "lumen_distributor.wasm";

/// The staking contract artifact
pub const STAKING_ARTIFACT: &str = "lumen_staking.wasm";

/// The bond depository contract artifact
pub const BOND_ARTIFACT: &str = "lumen_bond_depository.wasm";

// ----------
// | Events |
// ----------

/// The event emitted when code is stored
pub const STORE_CODE_EVENT: &str = "store_code";

/// The attribute of the store code event holding the code ID
pub const CODE_ID_ATTRIBUTE: &str = "code_id";

/// The event emitted by Terra when a contract is instantiated
pub const INSTANTIATE_CONTRACT_EVENT: &str = "instantiate_contract";

/// The attribute of the Terra instantiate event holding the contract address
pub const CONTRACT_ADDRESS_ATTRIBUTE: &str = "contract_address";

/// The event emitted by wasmd when a contract is instantiated
pub const WASMD_INSTANTIATE_EVENT: &str = "instantiate";

/// The attribute of the wasmd instantiate event holding the contract address
pub const WASMD_CONTRACT_ADDRESS_ATTRIBUTE: &str = "_contract_address";

// -------------------------
// | Deployment parameters |
// -------------------------

/// The default DAO address the bond depository sends fees to
pub const DEFAULT_DAO_ADDRESS: &str = "terra17lmam6zguazs5q5u6z5mmx76uj63gldnse2pdp";

/// The default number of blocks a treasury permission stays queued before it can be toggled
pub const DEFAULT_BLOCKS_NEEDED_FOR_QUEUE: u64 = 0;

/// The funds sent along with the standalone treasury instantiation
pub const DEFAULT_TREASURY_SEED_FUNDS: &str = "10000000uluna,1000000ukrw";

/// The name of the staked token
pub const STAKED_TOKEN_NAME: &str = "Staked Lumen";

/// The symbol of the staked token
pub const STAKED_TOKEN_SYMBOL: &str = "sLUM";

/// The decimals of the staked token
pub const STAKED_TOKEN_DECIMALS: u8 = 9;

/// The length of a rebase epoch, in blocks
pub const EPOCH_LENGTH: u64 = 28_800;

/// The epoch the staking contract starts at
pub const STAKING_EPOCH_NUMBER: u64 = 1;

/// The bond control variable
pub const BOND_CONTROL_VARIABLE: u64 = 369;

/// The bond vesting term, in blocks
pub const BOND_VESTING_TERM: u64 = 28_800;

/// The minimum bond price
pub const BOND_MINIMUM_PRICE: u64 = 50_000;

/// The maximum bond payout, in thousandths of a percent of supply
pub const BOND_MAX_PAYOUT: u64 = 50;

/// The bond fee paid to the DAO, in hundredths of a percent
pub const BOND_FEE: u64 = 1_000;

/// The maximum debt the bond can take on
pub const BOND_MAX_DEBT: u64 = 1_000_000_000_000_000;

/// The debt the bond starts with
pub const BOND_INITIAL_DEBT: u64 = 0;

/// The reward rate of the staking contract in the distributor
pub const STAKING_REWARD_RATE: u64 = 3_000;

/// The amount of the initial treasury deposit
pub const INITIAL_DEPOSIT_AMOUNT: u64 = 9_000_000_000_000;

/// The profit of the initial treasury deposit
pub const INITIAL_DEPOSIT_PROFIT: u64 = 8_400;

// ---------------
// | Deployments |
// ---------------

/// The top-level key of the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";
