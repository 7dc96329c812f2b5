//! Security Module for Mais Capinhas
//!
//! Client-side guards around the core logic:
//! - Login attempt limiting over an injected store
//! - Input sanitization for emails and justification text
//!
//! # Usage Examples
//!
//! ## Login Rate Limiting
//!
//! ```rust
//! use security::rate_limiter::{LoginDecision, LoginLimitConfig, LoginRateLimiter};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let limiter = LoginRateLimiter::in_memory(LoginLimitConfig::default());
//! let now = chrono::Utc::now();
//!
//! match limiter.check("vendedor@maiscapinhas.com.br", now)? {
//!     LoginDecision::Allowed { .. } => {
//!         // Submit credentials; on failure:
//!         limiter.record_failure("vendedor@maiscapinhas.com.br", now)?;
//!     }
//!     LoginDecision::Locked { retry_after } => {
//!         // Show "try again in {retry_after:?}"
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The limiter is advisory: it resets with the process and can be bypassed
//! by any client. The backend must enforce its own limit.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod input_sanitizer;
pub mod rate_limiter;

// Re-exports for convenience
pub use input_sanitizer::{InputSanitizer, SanitizationError};
pub use rate_limiter::{
    AttemptRecord, AttemptStore, InMemoryAttemptStore, LoginDecision, LoginLimitConfig,
    LoginRateLimiter, RateLimitError,
};
