//! Incentive tiers for Mais Capinhas
//!
//! Bonus bands (flat reward by sales amount) and commission steps (rate by
//! goal achievement), resolved exactly as the sales dashboards display them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bonus;
pub mod commission;
pub mod error;
pub mod resolver;
pub mod types;
pub mod validation;

pub use bonus::{resolve_bonus_tier, BonusResolution};
pub use commission::{achievement_percent, commission_amount, resolve_commission_tier};
pub use error::{Error, Result};
pub use resolver::{CommissionResolution, TierOutcome, TierResolver};
pub use types::*;
pub use validation::{validate_bonus_tiers, validate_commission_tiers};
