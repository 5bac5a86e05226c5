//! Family size pricing

use crate::cost::Cost;

pub const MAX_PARENTS: u32 = 6;
pub const MAX_SIBLINGS: u32 = 8;

/// Fortune cost of each sibling
pub const SIBLING_FORTUNE: i32 = 3;

/// Fortune cost indexed by parent count
const PARENT_FORTUNE: [i32; 7] = [-20, -10, 0, 3, 8, 15, 24];

/// Fortune cost for `parents` parents
///
/// Counts past the table extrapolate linearly.
pub fn parent_cost(parents: u32) -> Cost {
    let fortune = match PARENT_FORTUNE.get(parents as usize) {
        Some(&fortune) => fortune,
        None if parents > 0 => (parents as i32 - 2) * 5 + 3,
        None => -20,
    };
    Cost::new(0, fortune)
}

pub fn sibling_cost(siblings: u32) -> Cost {
    Cost::new(0, SIBLING_FORTUNE * siblings as i32)
}
