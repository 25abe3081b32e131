use thiserror::Error;

use sumcheck::SumCheckError;

/// Bounded rejections the `GkrDriver` can return. Every variant that names a
/// wire carries its index, so a caller never has to re-derive which part of
/// the circuit failed from a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GkrError {
    #[error("instance count {0} is not a power of two")]
    InvalidInstanceCount(usize),

    #[error("transcript error: {0}")]
    TranscriptError(String),

    #[error("wire {wire_index} sum-check rejected: {source}")]
    SumCheckReject {
        wire_index: usize,
        source: SumCheckError,
    },

    #[error("wire {wire_index} input claim mismatch")]
    InputClaimMismatch { wire_index: usize },

    #[error("malformed proof: {0}")]
    MalformedProof(String),
}

impl GkrError {
    pub fn sum_check_reject(wire_index: usize, source: SumCheckError) -> Self {
        Self::SumCheckReject { wire_index, source }
    }
}
