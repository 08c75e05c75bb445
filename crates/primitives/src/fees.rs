//! Fee parameters of a user operation

use crate::constants::fees::FEE_BUFFER_DIVISOR;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Max fee and max priority fee per gas (EIP-1559 style)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPrice {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

impl GasPrice {
    /// Uses a single legacy gas price for both fields
    pub fn legacy(gas_price: U256) -> Self {
        Self { max_fee_per_gas: gas_price, max_priority_fee_per_gas: gas_price }
    }

    /// Pads the suggested priority fee and uses the padded value for both fields
    pub fn from_priority_fee(priority_fee: U256) -> Self {
        let padded = priority_fee.saturating_add(priority_fee / U256::from(FEE_BUFFER_DIVISOR));
        Self { max_fee_per_gas: padded, max_priority_fee_per_gas: padded }
    }
}
