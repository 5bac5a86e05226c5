//! Cost parsing and caching module
//!
//! This module turns cost descriptions like "Costs -3 FP" or
//! "Grants +5 BP" into signed two-currency costs.

pub mod cache;
mod model;
pub mod parser;


pub use cache::*;
pub use model::*;
pub use parser::*;
