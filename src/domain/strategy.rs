//! Pricing strategies and markup modes.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named AI pricing strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Middle-of-the-road margin.
    #[default]
    Balance,
    /// Thin margin to win the booking.
    Acquisition,
    /// Wide margin.
    Profit,
}

impl Strategy {
    /// Fixed multiplier applied to the base price.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Strategy::Balance => Decimal::from_parts(115, 2),
            Strategy::Acquisition => Decimal::from_parts(108, 2),
            Strategy::Profit => Decimal::from_parts(125, 2),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balance" => Ok(Strategy::Balance),
            "acquisition" => Ok(Strategy::Acquisition),
            "profit" => Ok(Strategy::Profit),
            other => Err(format!("unknown strategy: {}", other)),
        }
    }
}

/// The active markup calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupMode {
    #[default]
    Fixed,
    Percentage,
    Ai,
}

impl std::fmt::Display for MarkupMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkupMode::Fixed => write!(f, "fixed"),
            MarkupMode::Percentage => write!(f, "percentage"),
            MarkupMode::Ai => write!(f, "ai"),
        }
    }
}
