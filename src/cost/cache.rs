//! Per-identifier cost memo

use ahash::AHashMap;
use parking_lot::RwLock;

use crate::cost::{parser, Cost};

/// Parsed costs keyed by option identifier
///
/// Option data is static for the catalog's lifetime, so an id's cost is
/// parsed at most once.
#[derive(Debug, Default)]
pub struct CostCache {
    entries: RwLock<AHashMap<String, Cost>>,
}

impl CostCache {
    /// Get the cost for `id`, parsing `text` on first use
    #[inline]
    pub fn get_or_parse(&self, id: &str, text: &str) -> Cost {
        // Fast path: check read lock first
        {
            let entries = self.entries.read();
            if let Some(cost) = entries.get(id) {
                return *cost;
            }
        }

        // Slow path: parse and cache
        let cost = parser::parse_cost(text);
        self.entries.write().insert(id.to_string(), cost);
        cost
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
