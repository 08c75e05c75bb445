//! Account abstraction (ERC-4337) bundler and execution JSON-RPC clients

mod bundler;
mod bundler_api;
mod error;
mod execution;
pub mod transport;

pub use bundler::{BundlerClient, SendUserOperationResponse};
pub use bundler_api::BundlerApiClient;
pub use error::ClientError;
pub use execution::ExecutionClient;
