use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParcelaError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Limit exceeded: requested {requested} is above the limit of {limit}. {hint}")]
    LimitExceeded {
        limit: Decimal,
        requested: Decimal,
        hint: String,
    },

    #[error("Borrower not found: {0}")]
    BorrowerNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ParcelaError {
    fn from(e: serde_json::Error) -> Self {
        ParcelaError::SerializationError(e.to_string())
    }
}
