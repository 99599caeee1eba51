use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceSimError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid target margin rate {rate}: must be between 0 and 0.90")]
    InvalidMargin { rate: Decimal },

    #[error("Invalid period '{value}': expected YYYY-MM")]
    InvalidPeriod { value: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PriceSimError {
    fn from(e: serde_json::Error) -> Self {
        PriceSimError::SerializationError(e.to_string())
    }
}
