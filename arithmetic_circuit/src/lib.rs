pub mod assignment;
pub mod circuit;
pub mod gate;
pub mod wire;

pub use assignment::WireAssignment;
pub use circuit::Circuit;
pub use gate::{CustomGate, Gate};
pub use wire::Wire;
