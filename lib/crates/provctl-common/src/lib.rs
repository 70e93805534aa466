//! Wire types exchanged with the provisioning backend.

pub mod timestamp;
pub mod types;

pub use timestamp::Timestamp;
pub use types::*;
