//! Shared setup of the user operation demos

use eyre::Context;
use opkit_primitives::ChainSpec;
use std::{env, fs, time::Duration};

// Testing key
pub const MNEMONIC_PHRASE: &str = "test test test test test test test test test test test junk";

/// Delay between receipt polls
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Maximum number of receipt polls before giving up
pub const RECEIPT_POLL_ATTEMPTS: usize = 30;

/// Loads the chain spec
///
/// `CHAIN_SPEC` points to a JSON file; otherwise `CHAIN_ID`, `BUNDLER_URL` and `RPC_URL` are read.
pub fn chain_spec_from_env() -> eyre::Result<ChainSpec> {
    if let Ok(path) = env::var("CHAIN_SPEC") {
        let content = fs::read_to_string(&path).wrap_err_with(|| format!("reading {path}"))?;
        return serde_json::from_str(&content).wrap_err_with(|| format!("parsing {path}"));
    }

    let chain_id = env::var("CHAIN_ID")
        .unwrap_or_else(|_| "1337".into())
        .parse::<u64>()
        .wrap_err("CHAIN_ID is not a number")?;
    let bundler_url = env::var("BUNDLER_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".into());
    let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".into());

    Ok(ChainSpec::new(chain_id, bundler_url, rpc_url))
}

/// Mnemonic from `KEY_PHRASE`, the testing key otherwise
pub fn key_phrase_from_env() -> String {
    env::var("KEY_PHRASE").unwrap_or_else(|_| MNEMONIC_PHRASE.into())
}
