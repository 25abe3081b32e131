pub mod claims_manager;
pub mod driver;
pub mod error;
pub mod proof;

pub use claims_manager::{ActiveClaim, ClaimsManager, LazyClaimView};
pub use driver::GkrDriver;
pub use error::GkrError;
pub use proof::GkrProof;
