//! Request pacing
//!
//! This module provides the rate limiter that spaces out page fetches.
//!
//! # Components
//!
//! - `RateLimiter`: Enforces a minimum interval between requests, scaled by an
//!   adaptive backoff multiplier that grows on failures and shrinks on successes
//! - `RateLimiterStats`: Snapshot of request counters for reporting

mod rate_limiter;

pub use rate_limiter::{RateLimiter, RateLimiterStats};
