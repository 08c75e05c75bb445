//! Execution endpoint JSON-RPC client and fee oracle

use crate::{error::ClientError, transport::create_http_provider};
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{
        transaction::eip2718::TypedTransaction, Address, Bytes, TransactionRequest, H256, U256,
        U64,
    },
};
use opkit_primitives::{BlockContext, ChainSpec, GasPrice};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

/// Client of an execution endpoint (eth JSON-RPC)
#[derive(Clone, Debug)]
pub struct ExecutionClient {
    provider: Arc<Provider<Http>>,
    chain_spec: ChainSpec,
}

/// The part of `eth_getBlockByNumber` the block context needs
#[derive(Debug, Deserialize, Serialize)]
struct BlockHeader {
    number: Option<U64>,
    hash: Option<H256>,
}

impl ExecutionClient {
    /// Creates the client for `rpc_url` of the chain spec, without any I/O
    pub fn new(chain_spec: ChainSpec) -> Result<Self, ClientError> {
        let provider = create_http_provider(&chain_spec.rpc_url, chain_spec.chain_id)?;
        Ok(Self { provider: Arc::new(provider), chain_spec })
    }

    /// Creates the client and checks that the endpoint serves the configured chain
    pub async fn connect(chain_spec: ChainSpec) -> Result<Self, ClientError> {
        let client = Self::new(chain_spec)?;

        let chain_id = client.provider.get_chainid().await?;
        if chain_id != U256::from(client.chain_spec.chain_id) {
            return Err(ClientError::ChainIdMismatch {
                expected: client.chain_spec.chain_id,
                actual: chain_id.low_u64(),
            });
        }

        Ok(client)
    }

    pub fn provider(&self) -> Arc<Provider<Http>> {
        self.provider.clone()
    }

    pub fn chain_spec(&self) -> &ChainSpec {
        &self.chain_spec
    }

    /// Gas of a plain call from nowhere to `to`
    pub async fn estimate_gas(&self, to: Address, data: Bytes) -> Result<U256, ClientError> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();
        Ok(self.provider.estimate_gas(&tx, None).await?)
    }

    pub async fn get_block_number(&self) -> Result<U64, ClientError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Fee parameters, falling back to the legacy gas price when the endpoint has no
    /// `eth_maxPriorityFeePerGas`
    pub async fn get_gas_price(&self) -> Result<GasPrice, ClientError> {
        match self.get_eip1559_gas_price().await {
            Ok(gas_price) => Ok(gas_price),
            Err(err) => {
                debug!("EIP-1559 fee query failed, using legacy gas price: {err}");
                Ok(GasPrice::legacy(self.get_legacy_gas_price().await?))
            }
        }
    }

    /// Suggested priority fee plus a 1/1300 buffer, used for both fee fields
    pub async fn get_eip1559_gas_price(&self) -> Result<GasPrice, ClientError> {
        let priority_fee: U256 = self.provider.request("eth_maxPriorityFeePerGas", ()).await?;
        trace!("Priority fee suggested by the endpoint: {priority_fee}");
        Ok(GasPrice::from_priority_fee(priority_fee))
    }

    pub async fn get_legacy_gas_price(&self) -> Result<U256, ClientError> {
        Ok(self.provider.get_gas_price().await?)
    }

    /// Number and hash of the latest block
    pub async fn get_block_context(&self) -> Result<BlockContext, ClientError> {
        let header: Option<BlockHeader> =
            self.provider.request("eth_getBlockByNumber", ("latest", false)).await?;

        match header {
            Some(BlockHeader { number: Some(number), hash: Some(hash) }) => {
                Ok(BlockContext { number, hash })
            }
            Some(_) => {
                Err(ClientError::Decode { inner: "latest block has no number or hash".into() })
            }
            None => Err(ClientError::Decode { inner: "latest block not found".into() }),
        }
    }
}
