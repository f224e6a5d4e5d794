//! Floor/ceiling resolution for AI markup bounds.
//!
//! A missing limit is `None`, standing for -inf (floor) or +inf (ceiling).

use crate::domain::{Bound, Combinator, Decimal};

/// Lowest acceptable price for `base` under `bound`.
///
/// AND takes the stronger "at least" constraint (max), OR the weaker one (min).
pub fn resolve_floor(base: Decimal, bound: &Bound) -> Option<Decimal> {
    let a = bound.absolute_limit(base);
    let b = bound.percentage_limit(base);
    match bound.combinator {
        Combinator::And => combine(a, b, Decimal::max),
        Combinator::Or => combine(a, b, Decimal::min),
    }
}

/// Highest acceptable price for `base` under `bound`.
///
/// AND takes the stronger "at most" constraint (min), OR the weaker one (max).
pub fn resolve_ceiling(base: Decimal, bound: &Bound) -> Option<Decimal> {
    let c = bound.absolute_limit(base);
    let d = bound.percentage_limit(base);
    match bound.combinator {
        Combinator::And => combine(c, d, Decimal::min),
        Combinator::Or => combine(c, d, Decimal::max),
    }
}

// With a single finite side both combinators reduce to that side.
fn combine(
    x: Option<Decimal>,
    y: Option<Decimal>,
    pick: fn(Decimal, Decimal) -> Decimal,
) -> Option<Decimal> {
    match (x, y) {
        (Some(x), Some(y)) => Some(pick(x, y)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

/// Resolved `[floor, ceiling]` interval for one base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceWindow {
    pub floor: Option<Decimal>,
    pub ceiling: Option<Decimal>,
}

impl PriceWindow {
    pub fn resolve(base: Decimal, min_bound: &Bound, max_bound: &Bound) -> Self {
        PriceWindow {
            floor: resolve_floor(base, min_bound),
            ceiling: resolve_ceiling(base, max_bound),
        }
    }

    pub fn unbounded() -> Self {
        PriceWindow {
            floor: None,
            ceiling: None,
        }
    }

    /// Returns `(floor, ceiling)` when the floor lies above the ceiling.
    pub fn conflict(&self) -> Option<(Decimal, Decimal)> {
        match (self.floor, self.ceiling) {
            (Some(floor), Some(ceiling)) if floor > ceiling => Some((floor, ceiling)),
            _ => None,
        }
    }

    /// `min(max(price, floor), ceiling)`. On a conflicting window this returns the ceiling.
    pub fn clamp(&self, price: Decimal) -> Decimal {
        let raised = match self.floor {
            Some(floor) => price.max(floor),
            None => price,
        };
        match self.ceiling {
            Some(ceiling) => raised.min(ceiling),
            None => raised,
        }
    }
}
