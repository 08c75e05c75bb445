//! Account abstraction (ERC-4337) client primitive types
//!
//! This crate contains the user operation model and its hash, the chain configuration, fee
//! parameters, the signer dispatcher and the multi-signature adapter interface.

pub mod chain;
pub mod constants;
pub mod fees;
pub mod multisig;
pub mod signer;
mod user_operation;
mod utils;

pub use chain::ChainSpec;
pub use fees::GasPrice;
pub use multisig::{BlockContext, Call, MultisigAdapter, OperationKind};
pub use signer::{
    HashSigner, MnemonicSigner, PassKeyRecord, SignOptions, Signer, SignerBuilder, SignerError,
    SignerKind,
};
pub use user_operation::{
    UserOperation, UserOperationByHash, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt, UserOperationRequest, UserOperationSigned,
};
