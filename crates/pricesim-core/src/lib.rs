pub mod error;
pub mod rounding;
pub mod types;

#[cfg(feature = "pricing")]
pub mod pricing;

#[cfg(feature = "break_even")]
pub mod break_even;

#[cfg(feature = "records")]
pub mod records;

pub use error::PriceSimError;
pub use types::*;

/// Standard result type for all pricesim operations
pub type PriceSimResult<T> = Result<T, PriceSimError>;
