use thiserror::Error;

/// Calldata encoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Batch without call data must carry values
    #[error("malformed batch: values are required when no call data is given")]
    MalformedBatch,

    /// Per-call list does not match the number of targets
    #[error("length mismatch: {targets} targets but {len} {field}")]
    LengthMismatch {
        /// The mismatched list
        field: &'static str,
        /// Number of targets
        targets: usize,
        /// Length of the mismatched list
        len: usize,
    },
}
