//! Price bound constraints used by AI markup.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};

/// How the absolute and percentage parts of a bound combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    /// Both constraints must hold.
    #[default]
    And,
    /// Either constraint is enough.
    Or,
}

/// A floor or ceiling relative to a base price.
///
/// Either delta may be absent; a bound with neither set is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    #[serde(default)]
    pub absolute_delta: Option<Decimal>,
    /// Percent of the base price, e.g. 10 means +10%.
    #[serde(default)]
    pub percentage_delta: Option<Decimal>,
    #[serde(default)]
    pub combinator: Combinator,
}

impl Bound {
    pub fn new(
        absolute_delta: Option<Decimal>,
        percentage_delta: Option<Decimal>,
        combinator: Combinator,
    ) -> Self {
        Bound {
            absolute_delta,
            percentage_delta,
            combinator,
        }
    }

    /// A bound that constrains nothing.
    pub fn unbounded() -> Self {
        Bound::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.absolute_delta.is_none() && self.percentage_delta.is_none()
    }

    /// Candidate limit from the absolute delta: `base + delta`.
    ///
    /// Limits beyond the decimal range saturate.
    pub fn absolute_limit(&self, base: Decimal) -> Option<Decimal> {
        self.absolute_delta.map(|delta| base.saturating_add(delta))
    }

    /// Candidate limit from the percentage delta: `base * (1 + pct / 100)`.
    pub fn percentage_limit(&self, base: Decimal) -> Option<Decimal> {
        self.percentage_delta.map(|pct| base.saturating_scale_by_percent(pct))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_candidate_limits() {
        let bound = Bound::new(Some(d("50")), Some(d("10")), Combinator::And);
        assert_eq!(bound.absolute_limit(d("1000")), Some(d("1050")));
        assert_eq!(bound.percentage_limit(d("1000")), Some(d("1100")));
    }

    #[test]
    fn test_limits_saturate_for_huge_prices() {
        let bound = Bound::new(Some(d("1000")), Some(d("25")), Combinator::Or);
        let max = Decimal::max_value();
        assert_eq!(bound.absolute_limit(max), Some(max));
        assert_eq!(bound.percentage_limit(max), Some(max));
    }

    #[test]
    fn test_deserialize_partial_bound() {
        let bound: Bound =
            serde_json::from_str(r#"{"percentage_delta": 20, "combinator": "or"}"#).unwrap();
        assert_eq!(bound.absolute_delta, None);
        assert_eq!(bound.percentage_delta, Some(d("20")));
        assert_eq!(bound.combinator, Combinator::Or);

        let empty: Bound = serde_json::from_str("{}").unwrap();
        assert!(empty.is_unbounded());
        assert_eq!(empty.combinator, Combinator::And);
    }
}
