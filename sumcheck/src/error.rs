use thiserror::Error;

/// Sum-check rejection reasons, always carrying the bounded reason string the
/// spec names rather than requiring callers to pattern-match on text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SumCheckError {
    #[error("sum-check rejected: {0}")]
    Reject(String),
}

impl SumCheckError {
    pub fn sum_mismatch() -> Self {
        Self::Reject("sum mismatch".to_string())
    }

    pub fn final_eval_mismatch() -> Self {
        Self::Reject("final eval mismatch".to_string())
    }
}
