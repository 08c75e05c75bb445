//! Chain configuration

use crate::constants::entry_point;
use alloy_chains::Chain;
use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Immutable description of the chain a wallet operates on
///
/// Every client keeps its own copy; nothing mutates it after setup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChainSpec {
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Bundler JSON-RPC endpoint
    pub bundler_url: String,
    /// Execution client JSON-RPC endpoint
    pub rpc_url: String,
    /// Entry point the wallet submits user operations to
    #[serde(default = "default_entry_point")]
    pub entry_point: Address,
}

fn default_entry_point() -> Address {
    entry_point::ADDRESS.parse().expect("Entry point address constant is valid")
}

impl ChainSpec {
    pub fn new(chain_id: u64, bundler_url: impl Into<String>, rpc_url: impl Into<String>) -> Self {
        Self {
            chain_id,
            bundler_url: bundler_url.into(),
            rpc_url: rpc_url.into(),
            entry_point: default_entry_point(),
        }
    }

    /// Sets the entry point address
    pub fn entry_point(mut self, entry_point: Address) -> Self {
        self.entry_point = entry_point;
        self
    }

    /// Chain as known by `alloy-chains` (named when possible)
    pub fn chain(&self) -> Chain {
        Chain::from_id(self.chain_id)
    }
}
