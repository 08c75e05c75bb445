//! Smart account calldata encoding

use crate::{
    error::EncodeError,
    gen::simple_account_api::{ExecuteBatchCall, ExecuteCall},
};
use ethers::{
    abi::AbiEncode,
    types::{Address, Bytes, U256},
};
use opkit_primitives::{Call, MultisigAdapter, OperationKind};
use std::sync::Arc;
use tracing::trace;

/// ABI call to `execute(address,uint256,bytes)`
///
/// # Arguments
/// * `target` - The address the account calls
/// * `value` - Wei sent with the call, zero when omitted
/// * `data` - Inner call data, empty when omitted
pub fn encode_single_call(target: Address, value: Option<U256>, data: Option<Bytes>) -> Bytes {
    ExecuteCall { dest: target, value: value.unwrap_or_default(), func: data.unwrap_or_default() }
        .encode()
        .into()
}

/// ABI call to `executeBatch(address[],uint256[],bytes[])`
///
/// When `data` is omitted or empty, `values` must be present and non-empty. Omitted lists default
/// to one zero value or one empty call data per target.
pub fn encode_batch_call(
    targets: Vec<Address>,
    values: Option<Vec<U256>>,
    data: Option<Vec<Bytes>>,
) -> Result<Bytes, EncodeError> {
    let calls = batch_calls(targets, values, data)?;

    let (dest, (value, func)): (Vec<_>, (Vec<_>, Vec<_>)) =
        calls.into_iter().map(|call| (call.to, (call.value, call.data))).unzip();
    Ok(ExecuteBatchCall { dest, value, func }.encode().into())
}

/// Checks the batch preconditions and zips the lists into calls
fn batch_calls(
    targets: Vec<Address>,
    values: Option<Vec<U256>>,
    data: Option<Vec<Bytes>>,
) -> Result<Vec<Call>, EncodeError> {
    let data = data.filter(|data| !data.is_empty());
    if data.is_none() && values.as_ref().map_or(true, |values| values.is_empty()) {
        return Err(EncodeError::MalformedBatch);
    }

    let values = values.unwrap_or_else(|| vec![U256::zero(); targets.len()]);
    let data = data.unwrap_or_else(|| vec![Bytes::default(); targets.len()]);

    if values.len() != targets.len() {
        return Err(EncodeError::LengthMismatch {
            field: "values",
            targets: targets.len(),
            len: values.len(),
        });
    }
    if data.len() != targets.len() {
        return Err(EncodeError::LengthMismatch {
            field: "call data entries",
            targets: targets.len(),
            len: data.len(),
        });
    }

    Ok(targets
        .into_iter()
        .zip(values)
        .zip(data)
        .map(|((to, value), data)| Call { to, value, data })
        .collect())
}

/// Calldata encoder for the account, optionally routed through a multi-signature module
#[derive(Clone, Debug, Default)]
pub struct CallDataEncoder {
    adapter: Option<Arc<dyn MultisigAdapter>>,
}

impl CallDataEncoder {
    pub fn new(adapter: Option<Arc<dyn MultisigAdapter>>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> Option<&dyn MultisigAdapter> {
        self.adapter.as_deref()
    }

    /// Calldata for a single call, see [encode_single_call]
    pub fn single_call(&self, target: Address, value: Option<U256>, data: Option<Bytes>) -> Bytes {
        match &self.adapter {
            Some(adapter) => {
                trace!("Wrapping single call to {target:?} for {adapter:?}");
                let call = Call {
                    to: target,
                    value: value.unwrap_or_default(),
                    data: data.unwrap_or_default(),
                };
                adapter.wrap_call_data(&[call], OperationKind::Single)
            }
            None => encode_single_call(target, value, data),
        }
    }

    /// Calldata for a batch of calls, see [encode_batch_call]
    pub fn batch_call(
        &self,
        targets: Vec<Address>,
        values: Option<Vec<U256>>,
        data: Option<Vec<Bytes>>,
    ) -> Result<Bytes, EncodeError> {
        match &self.adapter {
            Some(adapter) => {
                let calls = batch_calls(targets, values, data)?;
                trace!("Wrapping batch of {} calls for {adapter:?}", calls.len());
                Ok(adapter.wrap_call_data(&calls, OperationKind::Batch))
            }
            None => encode_batch_call(targets, values, data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{abi::AbiDecode, contract::EthCall, utils::id};
    use opkit_primitives::{BlockContext, UserOperationHash, UserOperationSigned};
    use std::{str::FromStr, sync::Mutex};

    #[derive(Debug, Default)]
    struct RecordingAdapter {
        wrapped: Mutex<Vec<(Vec<Call>, OperationKind)>>,
    }

    impl MultisigAdapter for RecordingAdapter {
        fn wrap_call_data(&self, calls: &[Call], kind: OperationKind) -> Bytes {
            self.wrapped.lock().unwrap().push((calls.to_vec(), kind));
            Bytes::from_static(&[0xaa])
        }

        fn wrap_signature(&self, signature: Bytes, _block: &BlockContext) -> Bytes {
            signature
        }

        fn hash_user_operation(
            &self,
            _user_operation: &UserOperationSigned,
            _entry_point: &Address,
            _chain_id: u64,
        ) -> UserOperationHash {
            UserOperationHash::zero()
        }
    }

    fn targets() -> Vec<Address> {
        vec![Address::repeat_byte(0x11), Address::repeat_byte(0x22)]
    }

    #[test]
    fn selectors() {
        assert_eq!(ExecuteCall::selector(), [0xb6, 0x1d, 0x27, 0xf6]);
        assert_eq!(ExecuteCall::selector(), id("execute(address,uint256,bytes)"));
        assert_eq!(ExecuteBatchCall::selector(), id("executeBatch(address[],uint256[],bytes[])"));
    }

    #[test]
    fn single_call_decodes_back() -> eyre::Result<()> {
        let target = Address::from_str("0x21A14e061fe67A3060ef238DDD8Bf90c81829F7d")?;
        let data = Bytes::from_str("0xa9059cbb")?;

        let call_data = encode_single_call(target, Some(U256::from(1)), Some(data.clone()));
        assert_eq!(call_data[..4], ExecuteCall::selector());

        let decoded = ExecuteCall::decode(&call_data)?;
        assert_eq!(decoded.dest, target);
        assert_eq!(decoded.value, U256::from(1));
        assert_eq!(decoded.func, data);
        Ok(())
    }

    #[test]
    fn single_call_defaults() -> eyre::Result<()> {
        let decoded = ExecuteCall::decode(encode_single_call(Address::zero(), None, None))?;
        assert!(decoded.value.is_zero());
        assert!(decoded.func.is_empty());
        Ok(())
    }

    #[test]
    fn batch_call_without_values_or_data_is_malformed() {
        assert_eq!(encode_batch_call(targets(), None, None), Err(EncodeError::MalformedBatch));
        assert_eq!(
            encode_batch_call(targets(), Some(vec![]), Some(vec![])),
            Err(EncodeError::MalformedBatch)
        );
    }

    #[test]
    fn batch_call_with_values_only() -> eyre::Result<()> {
        let values = vec![U256::from(1), U256::from(2)];
        let call_data = encode_batch_call(targets(), Some(values.clone()), None)?;
        assert_eq!(call_data[..4], ExecuteBatchCall::selector());

        let decoded = ExecuteBatchCall::decode(&call_data)?;
        assert_eq!(decoded.dest, targets());
        assert_eq!(decoded.value, values);
        assert_eq!(decoded.func, vec![Bytes::default(), Bytes::default()]);
        Ok(())
    }

    #[test]
    fn batch_call_with_data_only() -> eyre::Result<()> {
        let data = vec![Bytes::from_static(&[1]), Bytes::from_static(&[2, 3])];
        let decoded =
            ExecuteBatchCall::decode(encode_batch_call(targets(), None, Some(data.clone()))?)?;
        assert_eq!(decoded.value, vec![U256::zero(), U256::zero()]);
        assert_eq!(decoded.func, data);
        Ok(())
    }

    #[test]
    fn batch_call_length_mismatch() {
        assert_eq!(
            encode_batch_call(targets(), Some(vec![U256::one()]), None),
            Err(EncodeError::LengthMismatch { field: "values", targets: 2, len: 1 })
        );
        assert!(matches!(
            encode_batch_call(targets(), None, Some(vec![Bytes::default(); 3])),
            Err(EncodeError::LengthMismatch { len: 3, .. })
        ));
    }

    #[test]
    fn encoder_without_adapter_matches_free_functions() -> eyre::Result<()> {
        let encoder = CallDataEncoder::default();
        assert!(encoder.adapter().is_none());
        assert_eq!(
            encoder.single_call(Address::repeat_byte(1), None, None),
            encode_single_call(Address::repeat_byte(1), None, None)
        );
        assert_eq!(
            encoder.batch_call(targets(), Some(vec![U256::one(); 2]), None)?,
            encode_batch_call(targets(), Some(vec![U256::one(); 2]), None)?
        );
        Ok(())
    }

    #[test]
    fn encoder_routes_through_adapter() -> eyre::Result<()> {
        let adapter = Arc::new(RecordingAdapter::default());
        let encoder = CallDataEncoder::new(Some(adapter.clone()));

        let single = encoder.single_call(Address::repeat_byte(1), Some(U256::from(5)), None);
        let batch = encoder.batch_call(targets(), Some(vec![U256::one(); 2]), None)?;
        assert_eq!(single, Bytes::from_static(&[0xaa]));
        assert_eq!(batch, Bytes::from_static(&[0xaa]));

        let wrapped = adapter.wrapped.lock().unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].1, OperationKind::Single);
        assert_eq!(
            wrapped[0].0,
            vec![Call { to: Address::repeat_byte(1), value: U256::from(5), data: Bytes::default() }]
        );
        assert_eq!(wrapped[1].1, OperationKind::Batch);
        assert_eq!(wrapped[1].0.len(), 2);
        Ok(())
    }

    #[test]
    fn encoder_checks_batch_before_adapter() {
        let adapter = Arc::new(RecordingAdapter::default());
        let encoder = CallDataEncoder::new(Some(adapter.clone()));
        assert_eq!(encoder.batch_call(targets(), None, None), Err(EncodeError::MalformedBatch));
        assert!(adapter.wrapped.lock().unwrap().is_empty());
    }
}
