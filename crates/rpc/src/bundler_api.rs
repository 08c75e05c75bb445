use ethers::types::{Address, U64};
use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use opkit_primitives::{
    UserOperationByHash, UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
    UserOperationRequest, UserOperationSigned,
};

/// The ERC-4337 `eth` namespace methods consumed from a bundler
#[rpc(client, namespace = "eth")]
pub trait BundlerApi {
    /// Retrieve the current [EIP-155](https://eips.ethereum.org/EIPS/eip-155) chain ID.
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;

    /// Get the entry points the bundler accepts user operations for.
    #[method(name = "supportedEntryPoints")]
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>>;

    /// Send a signed user operation.
    ///
    /// # Arguments
    /// * `user_operation: UserOperationSigned` - The signed user operation.
    /// * `entry_point: Address` - The address of the entry point.
    ///
    /// # Returns
    /// * `RpcResult<UserOperationHash>` - The hash of the sent user operation.
    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    /// Estimate the gas limits of a user operation.
    ///
    /// # Arguments
    /// * `user_operation: UserOperationRequest` - A user operation with optional gas fields.
    /// * `entry_point: Address` - The address of the entry point.
    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperationRequest,
        entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation>;

    /// Retrieve the receipt of a user operation, `None` while it is not included.
    #[method(name = "getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>>;

    /// Retrieve a user operation by its hash.
    #[method(name = "getUserOperationByHash")]
    async fn get_user_operation_by_hash(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationByHash>>;
}
