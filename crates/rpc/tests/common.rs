#![allow(dead_code)]

use async_trait::async_trait;
use ethers::types::{Address, H256, U256, U64};
use jsonrpsee::{
    core::RpcResult,
    proc_macros::rpc,
    server::{ServerBuilder, ServerHandle},
    types::ErrorObject,
    RpcModule,
};
use opkit_primitives::{
    UserOperationByHash, UserOperationGasEstimation, UserOperationHash, UserOperationReceipt,
    UserOperationRequest, UserOperationSigned,
};
use serde_json::{json, Value};
use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

// Testing key
pub const KEY_PHRASE: &str = "test test test test test test test test test test test junk";

pub const CHAIN_ID: u64 = 11155111;

pub const ENTRY_POINT: &str = "0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Starts a JSON-RPC server on a free local port
///
/// # Returns
/// * `(ServerHandle, String)` - The handle keeping the server alive and its HTTP URL.
pub async fn start_server<T: Send + Sync + 'static>(
    module: RpcModule<T>,
) -> eyre::Result<(ServerHandle, String)> {
    let server = ServerBuilder::default().build("127.0.0.1:0").await?;
    let url = format!("http://{}", server.local_addr()?);
    let handle = server.start(module);
    Ok((handle, url))
}

#[rpc(server, namespace = "eth")]
pub trait MockBundler {
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;

    #[method(name = "supportedEntryPoints")]
    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>>;

    #[method(name = "sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    #[method(name = "estimateUserOperationGas")]
    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperationRequest,
        entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation>;

    #[method(name = "getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>>;

    #[method(name = "getUserOperationByHash")]
    async fn get_user_operation_by_hash(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationByHash>>;
}

/// In-memory bundler recording what it receives
#[derive(Clone, Debug)]
pub struct MockBundlerImpl {
    pub chain_id: u64,
    pub entry_point: Address,
    pub estimation: UserOperationGasEstimation,
    pub chain_id_calls: Arc<AtomicUsize>,
    pub estimated: Arc<Mutex<Vec<UserOperationRequest>>>,
    pub sent: Arc<Mutex<Vec<(UserOperationHash, UserOperationSigned)>>>,
    pub included: Arc<Mutex<HashSet<UserOperationHash>>>,
    pub rejection: Option<String>,
}

impl MockBundlerImpl {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            entry_point: ENTRY_POINT.parse().unwrap(),
            estimation: UserOperationGasEstimation {
                pre_verification_gas: 48_000.into(),
                verification_gas_limit: 110_000.into(),
                call_gas_limit: 33_100.into(),
            },
            chain_id_calls: Arc::new(AtomicUsize::new(0)),
            estimated: Arc::new(Mutex::new(vec![])),
            sent: Arc::new(Mutex::new(vec![])),
            included: Arc::new(Mutex::new(HashSet::new())),
            rejection: None,
        }
    }

    pub fn reject_with(mut self, reason: &str) -> Self {
        self.rejection = Some(reason.into());
        self
    }

    /// Marks a sent user operation as included in a block
    pub fn include(&self, user_operation_hash: UserOperationHash) {
        self.included.lock().unwrap().insert(user_operation_hash);
    }

    fn check_entry_point(&self, entry_point: Address) -> RpcResult<()> {
        if entry_point != self.entry_point {
            return Err(ErrorObject::owned(
                -32602,
                format!("entry point {entry_point:?} is not supported"),
                None::<()>,
            ));
        }
        Ok(())
    }

    fn find(&self, user_operation_hash: &UserOperationHash) -> Option<UserOperationSigned> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .find(|(hash, _)| hash == user_operation_hash)
            .map(|(_, uo)| uo.clone())
    }
}

#[async_trait]
impl MockBundlerServer for MockBundlerImpl {
    async fn chain_id(&self) -> RpcResult<U64> {
        self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain_id.into())
    }

    async fn supported_entry_points(&self) -> RpcResult<Vec<Address>> {
        Ok(vec![self.entry_point])
    }

    async fn send_user_operation(
        &self,
        user_operation: UserOperationSigned,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash> {
        self.check_entry_point(entry_point)?;
        if let Some(reason) = &self.rejection {
            return Err(ErrorObject::owned(-32500, reason.clone(), None::<()>));
        }

        let user_operation_hash = user_operation.hash(&entry_point, self.chain_id);
        self.sent.lock().unwrap().push((user_operation_hash, user_operation));
        Ok(user_operation_hash)
    }

    async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperationRequest,
        entry_point: Address,
    ) -> RpcResult<UserOperationGasEstimation> {
        self.check_entry_point(entry_point)?;
        self.estimated.lock().unwrap().push(user_operation);
        Ok(self.estimation.clone())
    }

    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>> {
        if !self.included.lock().unwrap().contains(&user_operation_hash) {
            return Ok(None);
        }

        Ok(self.find(&user_operation_hash).map(|uo| UserOperationReceipt {
            user_operation_hash,
            sender: uo.sender,
            nonce: uo.nonce,
            paymaster: None,
            actual_gas_cost: 1_000_000.into(),
            actual_gas_used: 100_000.into(),
            success: true,
            reason: String::new(),
            logs: vec![],
            tx_receipt: Default::default(),
        }))
    }

    async fn get_user_operation_by_hash(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationByHash>> {
        Ok(self.find(&user_operation_hash).map(|user_operation| UserOperationByHash {
            user_operation,
            entry_point: self.entry_point,
            transaction_hash: H256::repeat_byte(0x01),
            block_hash: H256::repeat_byte(0x02),
            block_number: 100.into(),
        }))
    }
}

#[rpc(server, namespace = "eth")]
pub trait MockEth {
    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;

    #[method(name = "blockNumber")]
    async fn block_number(&self) -> RpcResult<U64>;

    #[method(name = "gasPrice")]
    async fn gas_price(&self) -> RpcResult<U256>;

    #[method(name = "maxPriorityFeePerGas")]
    async fn max_priority_fee_per_gas(&self) -> RpcResult<U256>;

    #[method(name = "estimateGas")]
    async fn estimate_gas(&self, request: Value) -> RpcResult<U256>;

    #[method(name = "getBlockByNumber")]
    async fn get_block_by_number(&self, block: String, full: bool) -> RpcResult<Option<Value>>;
}

/// Execution endpoint with fixed answers
#[derive(Clone, Debug)]
pub struct MockEthImpl {
    pub chain_id: u64,
    pub block_number: U64,
    pub block_hash: H256,
    pub gas_price: U256,
    /// `None` answers `eth_maxPriorityFeePerGas` with an error
    pub priority_fee: Option<U256>,
    pub gas_estimate: U256,
    pub estimate_requests: Arc<Mutex<Vec<Value>>>,
}

impl MockEthImpl {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            block_number: 5_000_000.into(),
            block_hash: H256::repeat_byte(0xbb),
            gas_price: 30_000_000_000u64.into(),
            priority_fee: Some(1_300_000_000u64.into()),
            gas_estimate: 21_000.into(),
            estimate_requests: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn without_priority_fee(mut self) -> Self {
        self.priority_fee = None;
        self
    }
}

#[async_trait]
impl MockEthServer for MockEthImpl {
    async fn chain_id(&self) -> RpcResult<U64> {
        Ok(self.chain_id.into())
    }

    async fn block_number(&self) -> RpcResult<U64> {
        Ok(self.block_number)
    }

    async fn gas_price(&self) -> RpcResult<U256> {
        Ok(self.gas_price)
    }

    async fn max_priority_fee_per_gas(&self) -> RpcResult<U256> {
        self.priority_fee
            .ok_or_else(|| ErrorObject::owned(-32601, "Method not found", None::<()>))
    }

    async fn estimate_gas(&self, request: Value) -> RpcResult<U256> {
        self.estimate_requests.lock().unwrap().push(request);
        Ok(self.gas_estimate)
    }

    async fn get_block_by_number(&self, block: String, full: bool) -> RpcResult<Option<Value>> {
        if block != "latest" || full {
            return Ok(None);
        }

        Ok(Some(json!({
            "number": self.block_number,
            "hash": self.block_hash,
            "parentHash": H256::zero(),
            "timestamp": "0x65a0b2c0",
        })))
    }
}
