//! Selection module for option groups
//!
//! This module provides:
//! - Single-choice slots that replace or clear
//! - Multi-choice sets with an optional cap
//! - Counted acquisitions that never go negative

mod store;


pub use store::*;
