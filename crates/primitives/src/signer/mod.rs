//! Signer dispatcher
//!
//! A [Signer] owns up to one backend per [SignerKind] and routes every hash to the backend of its
//! default kind. Backends only need to implement [HashSigner]; the credential ceremonies behind
//! them (passkeys, hardware keys, key derivation) live outside this crate.

mod mnemonic;

pub use mnemonic::MnemonicSigner;

use crate::{
    multisig::{BlockContext, MultisigAdapter},
    UserOperation, UserOperationSigned,
};
use async_trait::async_trait;
use ethers::types::{Address, Bytes, H256, U256};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::trace;

/// Signing strategies a wallet can be configured with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignerKind {
    /// Platform credential (e.g. a passkey held by the operating system)
    Platform,
    /// Hierarchical deterministic key
    Hierarchical,
    /// Hardware credential, addressed by a credential id
    Hardware,
}

impl fmt::Display for SignerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerKind::Platform => write!(f, "platform"),
            SignerKind::Hierarchical => write!(f, "hierarchical"),
            SignerKind::Hardware => write!(f, "hardware"),
        }
    }
}

/// Signer errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// No backend at all was configured
    #[error("at least one signing backend must be configured")]
    NoBackend,

    /// The default kind has no backend
    #[error("no {0} signing backend configured")]
    BackendNotConfigured(SignerKind),

    /// Hardware credentials are addressed by id
    #[error("hardware credential signing requires a credential id")]
    MissingCredentialId,

    /// Multi-signature signature containers are bound to a block
    #[error("multi-signature signature wrapping requires a block context")]
    MissingBlockContext,

    /// Error reported by the backend
    #[error("signing backend error: {inner}")]
    Backend {
        /// The inner error message
        inner: String,
    },
}

/// Per-call options handed to the backend
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignOptions {
    /// Derivation index (hierarchical keys)
    pub index: Option<u32>,
    /// Credential identifier (hardware credentials, optionally hierarchical keys)
    pub id: Option<String>,
}

impl SignOptions {
    pub fn index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Signing contract every credential backend implements
#[async_trait]
pub trait HashSigner: Send + Sync {
    async fn sign_hash(&self, hash: H256, options: &SignOptions) -> Result<Bytes, SignerError>;
}

/// Public key of a passkey as registered with the verifier
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassKeyRecord {
    pub key_id: String,
    pub x: U256,
    pub y: U256,
}

/// Routes hashes to the backend of the configured default kind
#[derive(Clone)]
pub struct Signer {
    default: SignerKind,
    platform: Option<Arc<dyn HashSigner>>,
    hierarchical: Option<Arc<dyn HashSigner>>,
    hardware: Option<Arc<dyn HashSigner>>,
    adapter: Option<Arc<dyn MultisigAdapter>>,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("default", &self.default)
            .field("platform", &self.platform.is_some())
            .field("hierarchical", &self.hierarchical.is_some())
            .field("hardware", &self.hardware.is_some())
            .field("adapter", &self.adapter)
            .finish()
    }
}

impl Signer {
    pub fn builder(default: SignerKind) -> SignerBuilder {
        SignerBuilder {
            default,
            platform: None,
            hierarchical: None,
            hardware: None,
            adapter: None,
        }
    }

    pub fn default_kind(&self) -> SignerKind {
        self.default
    }

    pub fn adapter(&self) -> Option<&dyn MultisigAdapter> {
        self.adapter.as_deref()
    }

    fn backend(&self, kind: SignerKind) -> Option<&Arc<dyn HashSigner>> {
        match kind {
            SignerKind::Platform => self.platform.as_ref(),
            SignerKind::Hierarchical => self.hierarchical.as_ref(),
            SignerKind::Hardware => self.hardware.as_ref(),
        }
    }

    /// Signs the hash with the backend of the default kind
    ///
    /// Exactly one backend is called, there is no fallback to other kinds. When a multi-signature
    /// adapter is configured the signature is wrapped for the module, bound to `block`.
    pub async fn sign(
        &self,
        hash: H256,
        options: SignOptions,
        block: Option<&BlockContext>,
    ) -> Result<Bytes, SignerError> {
        let options = match self.default {
            SignerKind::Platform => SignOptions::default(),
            SignerKind::Hierarchical => options,
            SignerKind::Hardware => {
                let id = options.id.filter(|id| !id.is_empty());
                SignOptions { index: None, id: Some(id.ok_or(SignerError::MissingCredentialId)?) }
            }
        };

        if self.adapter.is_some() && block.is_none() {
            return Err(SignerError::MissingBlockContext);
        }

        let backend =
            self.backend(self.default).ok_or(SignerError::BackendNotConfigured(self.default))?;

        trace!("Signing hash {hash:?} with {} backend", self.default);
        let signature = backend.sign_hash(hash, &options).await?;

        match (&self.adapter, block) {
            (Some(adapter), Some(block)) => Ok(adapter.wrap_signature(signature, block)),
            _ => Ok(signature),
        }
    }

    /// Hashes and signs the user operation
    ///
    /// # Arguments
    /// * `uo` - The unsigned [UserOperationSigned](UserOperationSigned)
    /// * `entry_point` - The entry point contract address
    /// * `chain_id` - The chain id of the blockchain network to be used
    /// * `options` - Backend options (derivation index, credential id)
    /// * `block` - Block context, required when a multi-signature adapter is configured
    ///
    /// # Returns
    /// * `UserOperation` - The signed [UserOperation](UserOperation) together with its hash
    pub async fn sign_user_operation(
        &self,
        uo: &UserOperationSigned,
        entry_point: &Address,
        chain_id: u64,
        options: SignOptions,
        block: Option<&BlockContext>,
    ) -> Result<UserOperation, SignerError> {
        let unsigned = uo.clone().signature(Bytes::default());
        let hash = unsigned.hash_with(entry_point, chain_id, self.adapter());
        let signature = self.sign(hash.0, options, block).await?;
        Ok(UserOperation::from_user_operation_signed(hash, unsigned.signature(signature)))
    }
}

/// Builder of [Signer]
pub struct SignerBuilder {
    default: SignerKind,
    platform: Option<Arc<dyn HashSigner>>,
    hierarchical: Option<Arc<dyn HashSigner>>,
    hardware: Option<Arc<dyn HashSigner>>,
    adapter: Option<Arc<dyn MultisigAdapter>>,
}

impl SignerBuilder {
    pub fn platform(mut self, backend: impl HashSigner + 'static) -> Self {
        self.platform = Some(Arc::new(backend));
        self
    }

    pub fn hierarchical(mut self, backend: impl HashSigner + 'static) -> Self {
        self.hierarchical = Some(Arc::new(backend));
        self
    }

    pub fn hardware(mut self, backend: impl HashSigner + 'static) -> Self {
        self.hardware = Some(Arc::new(backend));
        self
    }

    pub fn adapter(mut self, adapter: Arc<dyn MultisigAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn build(self) -> Result<Signer, SignerError> {
        if self.platform.is_none() && self.hierarchical.is_none() && self.hardware.is_none() {
            return Err(SignerError::NoBackend);
        }

        Ok(Signer {
            default: self.default,
            platform: self.platform,
            hierarchical: self.hierarchical,
            hardware: self.hardware,
            adapter: self.adapter,
        })
    }
}
