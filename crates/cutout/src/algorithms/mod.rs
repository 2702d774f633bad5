pub mod preprocessing;
pub mod extraction;
pub mod masking;

pub use preprocessing::*;
pub use extraction::*;
pub use masking::*;
