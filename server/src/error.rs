//! Shared error-code contract.
//!
//! Every error type that can reach the HTTP envelope implements [`ErrorCode`]
//! so responses carry a grepable code and callers can tell transient failures
//! apart from permanent ones.

/// Grepable error code and retryable flag for structured error responses.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}
