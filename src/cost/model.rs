//! Two-currency cost record

use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Signed spend in both currencies
///
/// Positive values are paid by the user, negative values are granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cost {
    /// Blessing points (BP)
    pub blessing: i32,
    /// Fortune points (FP)
    pub fortune: i32,
}

impl Cost {
    pub const ZERO: Cost = Cost {
        blessing: 0,
        fortune: 0,
    };

    #[inline]
    pub const fn new(blessing: i32, fortune: i32) -> Self {
        Self { blessing, fortune }
    }

    /// Cost of `count` units, saturating at the `i32` range
    #[inline]
    pub fn times(self, count: u32) -> Self {
        let count = i32::try_from(count).unwrap_or(i32::MAX);
        Self {
            blessing: self.blessing.saturating_mul(count),
            fortune: self.fortune.saturating_mul(count),
        }
    }
}

impl Add for Cost {
    type Output = Cost;

    #[inline]
    fn add(self, rhs: Cost) -> Cost {
        Cost {
            blessing: self.blessing.saturating_add(rhs.blessing),
            fortune: self.fortune.saturating_add(rhs.fortune),
        }
    }
}

impl AddAssign for Cost {
    #[inline]
    fn add_assign(&mut self, rhs: Cost) {
        *self = *self + rhs;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Add::add)
    }
}
