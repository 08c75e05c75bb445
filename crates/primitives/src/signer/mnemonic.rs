//! Hierarchical-key backend built on a BIP-39 mnemonic

use super::{HashSigner, SignOptions, SignerError};
use crate::constants::derivation::PATH_PREFIX;
use async_trait::async_trait;
use ethers::{
    prelude::k256::ecdsa::SigningKey,
    signers::{coins_bip39::English, MnemonicBuilder, Signer, Wallet},
    types::{Address, Bytes, H256},
};
use std::fmt;

/// Derives `m/44'/60'/0'/0/{index}` keys from a mnemonic phrase and signs with them
#[derive(Clone)]
pub struct MnemonicSigner {
    builder: MnemonicBuilder<English>,
    chain_id: u64,
}

impl fmt::Debug for MnemonicSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicSigner").field("chain_id", &self.chain_id).finish_non_exhaustive()
    }
}

impl MnemonicSigner {
    /// Create a signer from the given mnemonic phrase
    ///
    /// # Arguments
    /// * `phrase` - The mnemonic phrase
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `Self` - A new `MnemonicSigner` instance, the phrase is checked by deriving index 0
    pub fn from_phrase(phrase: &str, chain_id: u64) -> Result<Self, SignerError> {
        let signer =
            Self { builder: MnemonicBuilder::<English>::default().phrase(phrase), chain_id };
        signer.wallet(0)?;
        Ok(signer)
    }

    /// Derives the wallet at the given index
    pub fn wallet(&self, index: u32) -> Result<Wallet<SigningKey>, SignerError> {
        let wallet = self
            .builder
            .clone()
            .derivation_path(&format!("{PATH_PREFIX}{index}"))
            .and_then(|builder| builder.build())
            .map_err(|err| SignerError::Backend { inner: err.to_string() })?;
        Ok(wallet.with_chain_id(self.chain_id))
    }

    /// Address of the key at the given index
    pub fn address(&self, index: u32) -> Result<Address, SignerError> {
        self.wallet(index).map(|wallet| wallet.address())
    }
}

#[async_trait]
impl HashSigner for MnemonicSigner {
    /// Signs the hash as an EIP-191 personal message, which is what ECDSA-owned accounts recover
    async fn sign_hash(&self, hash: H256, options: &SignOptions) -> Result<Bytes, SignerError> {
        let wallet = self.wallet(options.index.unwrap_or_default())?;
        let signature = wallet
            .sign_message(hash.as_bytes())
            .await
            .map_err(|err| SignerError::Backend { inner: err.to_string() })?;
        Ok(signature.to_vec().into())
    }
}
