pub mod claims;
pub mod error;
pub mod proof;
pub mod prover;
pub mod verifier;

pub use claims::{Claims, LazyClaims};
pub use error::SumCheckError;
pub use proof::{RoundPoly, SumCheckProof};
pub use prover::SumcheckProver;
pub use verifier::SumcheckVerifier;
