//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod error;
pub mod log;
pub mod price;
pub mod report;
pub mod resolver;
pub mod sip;

// Re-export main types for cleaner imports
pub use cache::{QuoteCache, QuoteStore};
pub use error::{FailureReason, ProviderError, SipError};
pub use price::{LivePrice, PriceProvider, PriceQuote, QuoteSource, validate_price};
pub use resolver::{Attempt, PriceResolver, Resolution};
pub use sip::{ContributionSchedule, SipResult};
