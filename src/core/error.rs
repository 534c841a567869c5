//! Error types for the calculator and the price providers.

use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Errors surfaced to callers of the SIP calculator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SipError {
    /// A numeric input was zero, negative or not finite.
    #[error("invalid input: {field} must be a positive number, got {value}")]
    InvalidInput { field: &'static str, value: f64 },

    /// The arithmetic would be undefined for the given values.
    #[error("calculation error: {0}")]
    Calculation(String),
}

impl SipError {
    pub fn invalid(field: &'static str, value: f64) -> Self {
        SipError::InvalidInput { field, value }
    }
}

/// Rejects values that are not strictly positive finite numbers.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64, SipError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SipError::invalid(field, value))
    }
}

/// Why a single provider call did not yield a usable price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureReason {
    Timeout,
    NetworkFailure,
    AuthFailure,
    MalformedResponse,
    InvalidPrice,
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FailureReason::Timeout => "timeout",
                FailureReason::NetworkFailure => "network failure",
                FailureReason::AuthFailure => "authentication failure",
                FailureReason::MalformedResponse => "malformed response",
                FailureReason::InvalidPrice => "invalid price",
            }
        )
    }
}

/// Failure of a price provider adapter. Always recovered by the resolver.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}: {message}")]
pub struct ProviderError {
    pub reason: FailureReason,
    pub message: String,
}

impl ProviderError {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureReason::Timeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureReason::NetworkFailure, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(FailureReason::AuthFailure, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureReason::MalformedResponse, message)
    }

    pub fn invalid_price(price: f64) -> Self {
        Self::new(
            FailureReason::InvalidPrice,
            format!("price must be a positive finite number, got {price}"),
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::timeout(e.to_string())
        } else if e.is_decode() {
            ProviderError::malformed(e.to_string())
        } else if let Some(status) = e.status()
            && (status.as_u16() == 401 || status.as_u16() == 403)
        {
            ProviderError::auth(e.to_string())
        } else {
            ProviderError::network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("x", 1.5), Ok(1.5));
        assert_eq!(ensure_positive("x", 0.0), Err(SipError::invalid("x", 0.0)));
        assert!(ensure_positive("x", -3.0).is_err());
        assert!(ensure_positive("x", f64::NAN).is_err());
        assert!(ensure_positive("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = SipError::invalid("average_price", -1.0);
        assert_eq!(
            err.to_string(),
            "invalid input: average_price must be a positive number, got -1"
        );

        let err = ProviderError::auth("key not configured");
        assert_eq!(err.to_string(), "authentication failure: key not configured");
        assert_eq!(err.reason, FailureReason::AuthFailure);
    }
}
