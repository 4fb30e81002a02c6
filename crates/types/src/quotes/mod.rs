//! Fee quote request and result models

pub mod errors;
pub mod request;
pub mod response;

pub use errors::QuoteValidationError;
pub use request::{FeeQuoteRequest, QuoteDirection};
pub use response::{AttemptOutcome, FeeQuoteResult, FeeQuoteStatus, ProviderAttempt, QuotedFee};

/// Result type for quote validation operations
pub type QuoteValidationResult<T> = Result<T, QuoteValidationError>;
