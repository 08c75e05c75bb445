use demos_user_operation::{
    chain_spec_from_env, key_phrase_from_env, RECEIPT_POLL_ATTEMPTS, RECEIPT_POLL_INTERVAL,
};
use ethers::types::{Address, U256};
use opkit_contracts::{CallDataEncoder, SafeAdapter};
use opkit_primitives::{
    MnemonicSigner, MultisigAdapter, SignOptions, Signer, SignerKind, UserOperationSigned,
};
use opkit_rpc::{BundlerClient, ExecutionClient};
use std::{env, sync::Arc};
use tracing::{info, warn};

/// Sends 1 gwei from the smart account in `SENDER` to `RECIPIENT`
///
/// Set `SAFE=1` when the account is a Safe with the 4337 module enabled. `NONCE` defaults to 0.
#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt::init();

    let chain_spec = chain_spec_from_env()?;
    let entry_point = chain_spec.entry_point;
    let sender: Address = env::var("SENDER")?.parse()?;
    let recipient: Address = env::var("RECIPIENT")?.parse()?;
    let nonce = U256::from_dec_str(&env::var("NONCE").unwrap_or_else(|_| "0".into()))?;
    let adapter: Option<Arc<dyn MultisigAdapter>> =
        env::var("SAFE").ok().map(|_| Arc::new(SafeAdapter::default()) as Arc<dyn MultisigAdapter>);

    let execution_client = ExecutionClient::connect(chain_spec.clone()).await?;
    let bundler_client = BundlerClient::new(chain_spec.clone())?;
    if !bundler_client.ready().await {
        warn!("Bundler is not serving chain {}", chain_spec.chain());
    }

    let call_data = CallDataEncoder::new(adapter.clone()).single_call(
        recipient,
        Some(U256::exp10(9)),
        None,
    );
    let uo = UserOperationSigned::partial(call_data).sender(sender).nonce(nonce);

    let estimation =
        bundler_client.estimate_user_operation_gas(uo.clone().into(), entry_point).await?;
    let gas_price = execution_client.get_gas_price().await?;
    let uo = uo.with_gas_estimation(&estimation).with_gas_price(&gas_price);
    info!("Estimated {estimation:?} at {gas_price:?}");

    let mut builder = Signer::builder(SignerKind::Hierarchical)
        .hierarchical(MnemonicSigner::from_phrase(&key_phrase_from_env(), chain_spec.chain_id)?);
    let block = match adapter {
        Some(adapter) => {
            builder = builder.adapter(adapter);
            Some(execution_client.get_block_context().await?)
        }
        None => None,
    };
    let signer = builder.build()?;

    let uo = signer
        .sign_user_operation(
            &uo,
            &entry_point,
            chain_spec.chain_id,
            SignOptions::default(),
            block.as_ref(),
        )
        .await?;

    let response = bundler_client.send_user_operation(&uo, entry_point).await?;
    info!("Sent user operation {}", response.user_operation_hash);

    for _ in 0..RECEIPT_POLL_ATTEMPTS {
        if let Some(receipt) = response.receipt().await? {
            info!(
                "Included in transaction {:?}, success: {}",
                receipt.tx_receipt.transaction_hash, receipt.success
            );
            return Ok(());
        }
        tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
    }

    warn!("No receipt for {} yet", response.user_operation_hash);
    Ok(())
}
