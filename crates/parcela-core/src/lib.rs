pub mod clock;
pub mod error;
pub mod limits;
pub mod schedule;
pub mod types;

#[cfg(feature = "borrower")]
pub mod borrower;

pub use error::ParcelaError;
pub use types::*;

/// Standard result type for all parcela operations
pub type ParcelaResult<T> = Result<T, ParcelaError>;
