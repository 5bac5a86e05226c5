//! Tree module for prerequisite resolution and pick budgets
//!
//! This module provides:
//! - Node selection gated by prerequisites and sigil capacity
//! - Breadth-first deselection cascades and power pruning
//! - Pick budgets summed from active node and tier benefits
//! - Tier progression moves

mod budget;
mod resolver;
mod tiers;


pub use budget::*;
pub use resolver::*;
pub use tiers::*;
