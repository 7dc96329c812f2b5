//! Error types for incentive tables

use thiserror::Error;

/// Incentive error
#[derive(Debug, Error)]
pub enum Error {
    /// A bonus band is malformed on its own
    #[error("Invalid bonus band #{index}: {reason}")]
    InvalidBand {
        /// Position of the band in the submitted table
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Two active bonus bands cover the same amount
    #[error("Bonus bands #{first} and #{second} overlap")]
    OverlappingBands {
        /// Lower band position
        first: usize,
        /// Upper band position
        second: usize,
    },

    /// A commission tier is malformed on its own
    #[error("Invalid commission tier #{index}: {reason}")]
    InvalidThreshold {
        /// Position of the tier in the submitted table
        index: usize,
        /// What is wrong with it
        reason: String,
    },

    /// Two commission tiers share a threshold
    #[error("Commission tiers #{first} and #{second} share the same threshold")]
    DuplicateThreshold {
        /// First tier position
        first: usize,
        /// Second tier position
        second: usize,
    },

    /// Money arithmetic error
    #[error(transparent)]
    Money(#[from] capinhas_core::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
