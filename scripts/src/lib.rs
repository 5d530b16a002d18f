//! Scripts for deploying and initializing the Lumen smart contracts on Terra.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
mod commands;
pub mod client;
pub mod constants;
pub mod deployment;
pub mod errors;
pub mod helpers;
pub mod msgs;
pub mod types;
pub mod utils;
pub mod wallet;
