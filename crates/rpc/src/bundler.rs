//! Bundler JSON-RPC client

use crate::{bundler_api::BundlerApiClient, error::ClientError, transport::create_http_client};
use ethers::types::Address;
use jsonrpsee::http_client::HttpClient;
use opkit_primitives::{
    ChainSpec, UserOperationByHash, UserOperationGasEstimation, UserOperationHash,
    UserOperationReceipt, UserOperationRequest, UserOperationSigned,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// Client of a bundler's `eth` namespace
///
/// Construction does no I/O. The first call resolves the readiness check (the bundler reports the
/// configured chain id) once; every later call reuses the result. A bundler that is not ready is
/// still called, with a warning.
#[derive(Clone, Debug)]
pub struct BundlerClient {
    inner: Arc<BundlerClientInner>,
}

#[derive(Debug)]
struct BundlerClientInner {
    client: HttpClient,
    chain_spec: ChainSpec,
    ready: OnceCell<bool>,
}

impl BundlerClient {
    /// Creates the client for `bundler_url` of the chain spec
    pub fn new(chain_spec: ChainSpec) -> Result<Self, ClientError> {
        let client = create_http_client(&chain_spec.bundler_url)?;
        Ok(Self {
            inner: Arc::new(BundlerClientInner { client, chain_spec, ready: OnceCell::new() }),
        })
    }

    pub fn chain_spec(&self) -> &ChainSpec {
        &self.inner.chain_spec
    }

    /// Whether the bundler serves the configured chain
    ///
    /// Queries `eth_chainId` on the first call only. A mismatch or a failed query resolves to
    /// `false`.
    pub async fn ready(&self) -> bool {
        *self
            .inner
            .ready
            .get_or_init(|| async {
                let expected = self.inner.chain_spec.chain_id;
                match self.inner.client.chain_id().await {
                    Ok(chain_id) if chain_id.as_u64() == expected => {
                        debug!("Bundler ready on chain {}", self.inner.chain_spec.chain());
                        true
                    }
                    Ok(chain_id) => {
                        warn!(
                            "Bundler {} reports chain id {chain_id}, expected {expected}",
                            self.inner.chain_spec.bundler_url
                        );
                        false
                    }
                    Err(err) => {
                        warn!(
                            "Bundler {} chain id check failed: {err}",
                            self.inner.chain_spec.bundler_url
                        );
                        false
                    }
                }
            })
            .await
    }

    async fn ensure_ready(&self, method: &str) {
        if !self.ready().await {
            warn!("Calling {method} on a bundler that is not ready");
        }
    }

    /// Estimates the gas limits of the user operation
    pub async fn estimate_user_operation_gas(
        &self,
        user_operation: UserOperationRequest,
        entry_point: Address,
    ) -> Result<UserOperationGasEstimation, ClientError> {
        self.ensure_ready("eth_estimateUserOperationGas").await;
        self.inner
            .client
            .estimate_user_operation_gas(user_operation, entry_point)
            .await
            .map_err(ClientError::rpc)
    }

    /// Submits the signed user operation
    ///
    /// A rejection by the bundler or the entry point surfaces as [ClientError::Rpc].
    pub async fn send_user_operation(
        &self,
        user_operation: &UserOperationSigned,
        entry_point: Address,
    ) -> Result<SendUserOperationResponse, ClientError> {
        self.ensure_ready("eth_sendUserOperation").await;
        let user_operation_hash = self
            .inner
            .client
            .send_user_operation(user_operation.clone(), entry_point)
            .await
            .map_err(ClientError::rpc)?;
        debug!("Sent user operation {user_operation_hash} to {entry_point:?}");

        Ok(SendUserOperationResponse { user_operation_hash, client: self.clone() })
    }

    pub async fn get_user_operation_by_hash(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> Result<Option<UserOperationByHash>, ClientError> {
        self.ensure_ready("eth_getUserOperationByHash").await;
        self.inner
            .client
            .get_user_operation_by_hash(user_operation_hash)
            .await
            .map_err(ClientError::rpc)
    }

    /// Receipt of the user operation, `None` while pending or when dropped
    pub async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, ClientError> {
        self.ensure_ready("eth_getUserOperationReceipt").await;
        self.inner
            .client
            .get_user_operation_receipt(user_operation_hash)
            .await
            .map_err(ClientError::rpc)
    }

    pub async fn supported_entry_points(&self) -> Result<Vec<Address>, ClientError> {
        self.ensure_ready("eth_supportedEntryPoints").await;
        self.inner.client.supported_entry_points().await.map_err(ClientError::rpc)
    }
}

/// Result of [BundlerClient::send_user_operation]
#[derive(Clone, Debug)]
pub struct SendUserOperationResponse {
    pub user_operation_hash: UserOperationHash,
    client: BundlerClient,
}

impl SendUserOperationResponse {
    /// Polls the receipt of the sent user operation once
    pub async fn receipt(&self) -> Result<Option<UserOperationReceipt>, ClientError> {
        self.client.get_user_operation_receipt(self.user_operation_hash).await
    }
}
