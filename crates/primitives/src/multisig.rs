//! Multi-signature module adapter interface
//!
//! Some accounts are validated by a secondary on-chain module instead of the account itself. Such
//! a module expects its own calldata shape, its own hash and its own signature container. An
//! adapter implementing [MultisigAdapter] is injected into the calldata encoder, the user
//! operation hash and the signer; without one, all three work in direct mode.

use crate::{UserOperationHash, UserOperationSigned};
use ethers::types::{Address, Bytes, H256, U256, U64};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Whether the wrapped payload carries one call or a batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Single = 0,
    Batch = 1,
}

impl From<OperationKind> for U256 {
    fn from(kind: OperationKind) -> Self {
        U256::from(kind as u8)
    }
}

/// A single call made by the account
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Call {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Recent block the signature container is bound to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    pub number: U64,
    pub hash: H256,
}

pub trait MultisigAdapter: Debug + Send + Sync {
    /// Re-encodes the account calls as a call to the module
    fn wrap_call_data(&self, calls: &[Call], kind: OperationKind) -> Bytes;

    /// Wraps a raw signature into the container the module verifies
    fn wrap_signature(&self, signature: Bytes, block: &BlockContext) -> Bytes;

    /// Hash the module expects to be signed
    fn hash_user_operation(
        &self,
        user_operation: &UserOperationSigned,
        entry_point: &Address,
        chain_id: u64,
    ) -> UserOperationHash;
}
