use demos_user_operation::MNEMONIC_PHRASE;
use ethers::types::{Address, U256};
use opkit_contracts::CallDataEncoder;
use opkit_primitives::{
    constants::entry_point, MnemonicSigner, SignOptions, Signer, SignerKind, UserOperationSigned,
};
use std::str::FromStr;

pub const CHAIN_ID: u64 = 1337;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let entry_point = Address::from_str(entry_point::ADDRESS)?;

    // create signer
    let mnemonic = MnemonicSigner::from_phrase(MNEMONIC_PHRASE, CHAIN_ID)?;
    println!("Signer address: {:?}", mnemonic.address(0)?);
    let signer = Signer::builder(SignerKind::Hierarchical).hierarchical(mnemonic).build()?;

    // encode a transfer of 1 gwei
    let call_data = CallDataEncoder::default().single_call(
        Address::from_str("0x21A14e061fe67A3060ef238DDD8Bf90c81829F7d")?,
        Some(U256::exp10(9)),
        None,
    );

    // create simple user operation
    let uo = UserOperationSigned::partial(call_data).verification_gas_limit(50_000.into());
    println!("User operation: {:?}", uo);

    // calculate user operation hash
    let uo_hash = uo.hash(&entry_point, CHAIN_ID);
    println!("User operation hash: {}", uo_hash);

    // sign user operation
    let uo_signed = signer
        .sign_user_operation(&uo, &entry_point, CHAIN_ID, SignOptions::default(), None)
        .await?;
    println!("User operation signed: {}", serde_json::to_string_pretty(&uo_signed.user_operation)?);

    Ok(())
}
