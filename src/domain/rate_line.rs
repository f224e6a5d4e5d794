//! RateLine type: one quotable carrier price record.

use crate::domain::{ContainerType, Decimal, RateLineId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-container amounts, iterated in canonical container order.
pub type PriceMap = BTreeMap<ContainerType, Decimal>;

/// A freight rate line with base and quoted prices per container type.
///
/// `current_prices` always has exactly the key set of `base_prices`. Both maps
/// are private so the only writer is [`RateLine::set_current`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RateLineRecord")]
pub struct RateLine {
    pub id: RateLineId,
    pub carrier_name: String,
    pub origin: String,
    pub destination: String,
    base_prices: PriceMap,
    current_prices: PriceMap,
}

/// Input form of a rate line: only base prices are supplied.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLineRecord {
    pub id: RateLineId,
    pub carrier_name: String,
    pub origin: String,
    pub destination: String,
    pub base_prices: PriceMap,
}

impl From<RateLineRecord> for RateLine {
    fn from(record: RateLineRecord) -> Self {
        RateLine::new(
            record.id,
            record.carrier_name,
            record.origin,
            record.destination,
            record.base_prices,
        )
    }
}

impl RateLine {
    /// Create a rate line whose quoted prices start at the base prices.
    pub fn new(
        id: RateLineId,
        carrier_name: impl Into<String>,
        origin: impl Into<String>,
        destination: impl Into<String>,
        base_prices: PriceMap,
    ) -> Self {
        RateLine {
            id,
            carrier_name: carrier_name.into(),
            origin: origin.into(),
            destination: destination.into(),
            current_prices: base_prices.clone(),
            base_prices,
        }
    }

    pub fn base_prices(&self) -> &PriceMap {
        &self.base_prices
    }

    pub fn current_prices(&self) -> &PriceMap {
        &self.current_prices
    }

    pub fn base(&self, container: ContainerType) -> Option<Decimal> {
        self.base_prices.get(&container).copied()
    }

    pub fn current(&self, container: ContainerType) -> Option<Decimal> {
        self.current_prices.get(&container).copied()
    }

    /// Container types with a base price, in canonical order.
    pub fn containers(&self) -> impl Iterator<Item = ContainerType> + '_ {
        self.base_prices.keys().copied()
    }

    /// Overwrite the quoted price for a container.
    ///
    /// Returns false (and changes nothing) if the line has no base price for it.
    pub fn set_current(&mut self, container: ContainerType, price: Decimal) -> bool {
        match self.current_prices.get_mut(&container) {
            Some(slot) => {
                *slot = price;
                true
            }
            None => false,
        }
    }

    /// Restore every quoted price to its base price.
    pub fn reset_current(&mut self) {
        self.current_prices = self.base_prices.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn line() -> RateLine {
        let mut base = PriceMap::new();
        base.insert(ContainerType::Gp20, d("1000"));
        base.insert(ContainerType::Hc40, d("1800"));
        RateLine::new(RateLineId::new("R1"), "Maersk", "Shanghai", "Rotterdam", base)
    }

    #[test]
    fn test_current_starts_at_base() {
        let line = line();
        assert_eq!(line.current_prices(), line.base_prices());
    }

    #[test]
    fn test_set_current_keeps_key_set() {
        let mut line = line();
        assert!(line.set_current(ContainerType::Gp20, d("1100")));
        assert!(!line.set_current(ContainerType::Nor40, d("5")));
        assert_eq!(line.current(ContainerType::Gp20), Some(d("1100")));
        assert_eq!(line.current(ContainerType::Nor40), None);
        assert_eq!(
            line.current_prices().keys().collect::<Vec<_>>(),
            line.base_prices().keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_reset_current() {
        let mut line = line();
        line.set_current(ContainerType::Hc40, d("2000"));
        line.reset_current();
        assert_eq!(line.current(ContainerType::Hc40), Some(d("1800")));
    }

    #[test]
    fn test_deserialize_ignores_supplied_current_prices() {
        let json = r#"{
            "id": "R9",
            "carrier_name": "CMA",
            "origin": "Ningbo",
            "destination": "Hamburg",
            "base_prices": {"20GP": 900, "40HC": 1500},
            "current_prices": {"20GP": 1}
        }"#;
        let line: RateLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.current(ContainerType::Gp20), Some(d("900")));
        assert_eq!(line.current_prices().len(), 2);
    }
}
