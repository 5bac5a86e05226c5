//! Sigil capacity ledger
//!
//! Totals come from acquisitions; usage comes from tree nodes, held tiers
//! and boosts. Both are recomputed from scratch on every change.

mod ledger;

pub use ledger::*;
