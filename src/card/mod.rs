pub mod pool;
pub mod types;

pub use pool::{CandidatePool, PoolError};
pub use types::Card;
