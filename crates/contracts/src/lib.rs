//! Account abstraction (ERC-4337) smart account and module calldata

pub mod account;
mod error;
mod gen;
pub mod safe;

pub use account::{encode_batch_call, encode_single_call, CallDataEncoder};
pub use error::EncodeError;
pub use gen::{
    multi_send_api::MultiSendCall,
    safe_module_api::ExecuteUserOpWithErrorStringCall,
    simple_account_api::{ExecuteBatchCall, ExecuteCall},
};
pub use safe::SafeAdapter;
