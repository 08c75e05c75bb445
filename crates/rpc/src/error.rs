use ethers::providers::ProviderError;
use std::fmt::Display;
use thiserror::Error;

/// Bundler and execution client errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Endpoint URL could not be used
    #[error("invalid url {url}: {inner}")]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// The inner error message
        inner: String,
    },

    /// Endpoint serves another chain
    #[error("chain id mismatch: expected {expected}, endpoint reports {actual}")]
    ChainIdMismatch {
        /// Chain id of the configuration
        expected: u64,
        /// Chain id reported by the endpoint
        actual: u64,
    },

    /// JSON-RPC error from the bundler
    #[error("rpc error: {inner}")]
    Rpc {
        /// The inner error message
        inner: String,
    },

    /// Provider error from the execution endpoint
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// Response could not be interpreted
    #[error("decode error: {inner}")]
    Decode {
        /// The inner error message
        inner: String,
    },
}

impl ClientError {
    pub fn rpc<E: Display>(err: E) -> Self {
        Self::Rpc { inner: err.to_string() }
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider { inner: err.to_string() }
    }
}
