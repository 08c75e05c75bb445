//! Safe 4337 module adapter
//!
//! Safe accounts validate user operations through the 4337 module. The module executes calls via
//! `executeUserOpWithErrorString` delegating to the multi-send contract, signs an EIP-712 `SafeOp`
//! and expects the signature bound to a recent block.

use crate::gen::{multi_send_api::MultiSendCall, safe_module_api::ExecuteUserOpWithErrorStringCall};
use ethers::{
    abi::{encode, AbiEncode, Token},
    types::{transaction::eip712::EIP712Domain, Address, Bytes, H256, U256},
    utils::keccak256,
};
use opkit_primitives::{
    constants::safe::{MODULE_ADDRESS, MULTI_SEND_ADDRESS},
    BlockContext, Call, MultisigAdapter, OperationKind, UserOperationHash, UserOperationSigned,
};

/// Type string of the struct signed for the module
pub const SAFE_OP_TYPE: &str =
    "SafeOp(address safe,address to,uint256 value,uint256 nonce,bytes data)";

/// Multi-send operation byte for a plain call
const MULTI_SEND_CALL: u8 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SafeAdapter {
    module: Address,
    multi_send: Address,
}

impl Default for SafeAdapter {
    fn default() -> Self {
        Self::new(
            MODULE_ADDRESS.parse().expect("Safe module address should be valid"),
            MULTI_SEND_ADDRESS.parse().expect("Multi-send address should be valid"),
        )
    }
}

impl SafeAdapter {
    pub fn new(module: Address, multi_send: Address) -> Self {
        Self { module, multi_send }
    }

    pub fn module(&self) -> Address {
        self.module
    }

    pub fn multi_send(&self) -> Address {
        self.multi_send
    }

    /// EIP-712 domain separator, `EIP712Domain(uint256 chainId,address verifyingContract)`
    pub fn domain_separator(&self, chain_id: u64) -> H256 {
        EIP712Domain {
            name: None,
            version: None,
            chain_id: Some(U256::from(chain_id)),
            verifying_contract: Some(self.module),
            salt: None,
        }
        .separator()
        .into()
    }

    /// Hash of the `SafeOp` struct for the user operation
    pub fn struct_hash(&self, user_operation: &UserOperationSigned) -> H256 {
        keccak256(encode(&[
            Token::FixedBytes(keccak256(SAFE_OP_TYPE).to_vec()),
            Token::Address(user_operation.sender),
            Token::Address(self.multi_send),
            Token::Uint(U256::zero()),
            Token::Uint(user_operation.nonce),
            Token::FixedBytes(keccak256(&user_operation.call_data).to_vec()),
        ]))
        .into()
    }
}

/// Packs calls into the multi-send transaction list
///
/// Every call is `uint8 operation ‖ address to ‖ uint256 value ‖ uint256 data length ‖ data`
/// without padding.
pub fn pack_multi_send(calls: &[Call]) -> Bytes {
    let mut packed = Vec::new();
    let mut word = [0u8; 32];

    for call in calls {
        packed.push(MULTI_SEND_CALL);
        packed.extend_from_slice(call.to.as_bytes());
        call.value.to_big_endian(&mut word);
        packed.extend_from_slice(&word);
        U256::from(call.data.len()).to_big_endian(&mut word);
        packed.extend_from_slice(&word);
        packed.extend_from_slice(&call.data);
    }

    packed.into()
}

impl MultisigAdapter for SafeAdapter {
    fn wrap_call_data(&self, calls: &[Call], kind: OperationKind) -> Bytes {
        let transactions = pack_multi_send(calls);
        ExecuteUserOpWithErrorStringCall {
            to: vec![self.multi_send],
            value: U256::zero(),
            data: MultiSendCall { transactions }.encode().into(),
            operation: kind.into(),
        }
        .encode()
        .into()
    }

    fn wrap_signature(&self, signature: Bytes, block: &BlockContext) -> Bytes {
        encode(&[
            Token::Uint(U256::from(block.number.as_u64())),
            Token::FixedBytes(block.hash.as_bytes().to_vec()),
            Token::Bytes(signature.to_vec()),
        ])
        .into()
    }

    fn hash_user_operation(
        &self,
        user_operation: &UserOperationSigned,
        _entry_point: &Address,
        chain_id: u64,
    ) -> UserOperationHash {
        let mut digest = Vec::with_capacity(66);
        digest.extend_from_slice(&[0x19, 0x01]);
        digest.extend_from_slice(self.domain_separator(chain_id).as_bytes());
        digest.extend_from_slice(self.struct_hash(user_operation).as_bytes());
        keccak256(digest).into()
    }
}
