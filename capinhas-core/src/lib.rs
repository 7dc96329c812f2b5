//! Mais Capinhas core
//!
//! Money, display formatting and configuration shared by the incentive and
//! cash-shift crates.
//!
//! # Invariants
//!
//! - All arithmetic on money happens in integer centavos
//! - Decimals are rounded half away from zero to 2 places on entry
//! - Amounts stay within `±Money::MAX`; arithmetic saturates there
//! - `parse_brl(format_brl(m)) == m` for every amount

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod format;
pub mod money;
pub mod types;

// Re-exports
pub use config::{Config, LoginLimitSettings};
pub use error::{Error, Result};
pub use format::{format_brl, parse_brl};
pub use money::Money;
pub use types::{SellerId, StoreId};
