//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// Error reading a compiled contract artifact
    ReadArtifact(String),
    /// Error reading a file other than an artifact, e.g. the mnemonic or deployments file
    ReadFile(String),
    /// Error writing the deployments file
    WriteFile(String),
    /// Error initializing the LCD client
    ClientInitialization(String),
    /// Error deriving the signing key from the mnemonic
    KeyDerivation(String),
    /// Error building or signing a transaction
    TxConstruction(String),
    /// Error talking to the LCD endpoint
    Network(String),
    /// Error de/serializing a contract message or an LCD payload
    Serde(String),
    /// The chain accepted the broadcast but rejected the transaction
    Transaction {
        /// The ABCI error code
        code: u32,
        /// The module namespace of the error code
        codespace: String,
        /// The raw log returned by the node
        raw_log: String,
    },
    /// An otherwise successful transaction did not emit the expected event attribute
    MissingEvent {
        /// The event type that was looked up
        event: String,
        /// The attribute key that was looked up
        attribute: String,
    },
    /// A deployment step needs a contract that has not been deployed yet
    MissingDependency(String),
    /// The transaction was not included within the polling window
    ConfirmationTimeout(String),
    /// Error returned by a smart query
    Query(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::ReadArtifact(s) => write!(f, "error reading artifact: {}", s),
            ScriptError::ReadFile(s) => write!(f, "error reading file: {}", s),
            ScriptError::WriteFile(s) => write!(f, "error writing file: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::KeyDerivation(s) => write!(f, "error deriving signing key: {}", s),
            ScriptError::TxConstruction(s) => write!(f, "error constructing transaction: {}", s),
            ScriptError::Network(s) => write!(f, "network error: {}", s),
            ScriptError::Serde(s) => write!(f, "error de/serializing payload: {}", s),
            ScriptError::Transaction {
                code,
                codespace,
                raw_log,
            } => write!(
                f,
                "transaction failed. code: {}, codespace: {}, raw_log: {}",
                code, codespace, raw_log
            ),
            ScriptError::MissingEvent { event, attribute } => {
                write!(f, "missing event attribute: {}.{}", event, attribute)
            }
            ScriptError::MissingDependency(s) => write!(f, "contract not deployed yet: {}", s),
            ScriptError::ConfirmationTimeout(s) => {
                write!(f, "transaction not confirmed in time: {}", s)
            }
            ScriptError::Query(s) => write!(f, "error querying contract: {}", s),
        }
    }
}

impl Error for ScriptError {}
