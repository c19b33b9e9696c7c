pub mod error;
pub mod types;

#[cfg(feature = "margin")]
pub mod margin;

#[cfg(feature = "reporting")]
pub mod reporting;

pub use error::{MarginError, ValidationError};
pub use types::*;

/// Standard result type for all dealer-margin operations
pub type MarginResult<T> = Result<T, MarginError>;
