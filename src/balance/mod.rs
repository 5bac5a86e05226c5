//! Balance module for the two currency totals
//!
//! This module provides:
//! - Family size pricing (parents and siblings)
//! - Origin discounts for characters born in the chosen dominion
//! - The aggregated blessing and fortune balances

mod aggregator;
mod family;

pub use aggregator::*;
pub use family::*;
