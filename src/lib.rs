//! Magecraft Build Core - Point-buy selection and budget engine
//!
//! This crate tracks a character build against a static option catalog:
//! option groups, sigil purchases, the Good Tidings tier track, the nine
//! magic trees and their power categories. Every user intent is absorbed
//! into a [`BuildSession`], which keeps the derived sigil ledger, pick
//! budgets and point balances consistent after each change.
//!
//! Python bindings are available behind the `python` feature.

pub mod balance;
pub mod catalog;
pub mod cost;
pub mod error;
pub mod registry;
pub mod selection;
pub mod session;
pub mod sigil;
pub mod tree;

#[cfg(feature = "python")]
mod python;

pub use balance::{Balances, STARTING_POINTS};
pub use catalog::{Catalog, CustomSpell, OptionGroup, SigilKind};
pub use cost::Cost;
pub use error::{BuildError, Result};
pub use registry::{catalog, init_builtin_catalog, init_catalog, is_catalog_initialized, open_session};
pub use session::{BuildSession, BuildState, Derived};
pub use sigil::{SigilHoldings, SigilLedger};
