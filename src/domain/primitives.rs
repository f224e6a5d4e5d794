//! Domain primitives: RateLineId, ContainerType.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a quotable rate line.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateLineId(pub String);

impl RateLineId {
    /// Create a RateLineId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        RateLineId(id.into())
    }

    /// Get the id as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RateLineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standard shipping container classes.
///
/// Declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "20GP")]
    Gp20,
    #[serde(rename = "40GP")]
    Gp40,
    #[serde(rename = "40HC")]
    Hc40,
    #[serde(rename = "45HC")]
    Hc45,
    #[serde(rename = "20NOR")]
    Nor20,
    #[serde(rename = "40NOR")]
    Nor40,
    #[serde(rename = "20RF")]
    Rf20,
    #[serde(rename = "40RF")]
    Rf40,
}

impl ContainerType {
    pub const ALL: [ContainerType; 8] = [
        ContainerType::Gp20,
        ContainerType::Gp40,
        ContainerType::Hc40,
        ContainerType::Hc45,
        ContainerType::Nor20,
        ContainerType::Nor40,
        ContainerType::Rf20,
        ContainerType::Rf40,
    ];

    /// Trade code, e.g. "40HC".
    pub fn code(&self) -> &'static str {
        match self {
            ContainerType::Gp20 => "20GP",
            ContainerType::Gp40 => "40GP",
            ContainerType::Hc40 => "40HC",
            ContainerType::Hc45 => "45HC",
            ContainerType::Nor20 => "20NOR",
            ContainerType::Nor40 => "40NOR",
            ContainerType::Rf20 => "20RF",
            ContainerType::Rf40 => "40RF",
        }
    }
}

impl std::fmt::Display for ContainerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown container type: {0}")]
pub struct ContainerParseError(pub String);

impl FromStr for ContainerType {
    type Err = ContainerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ContainerType::ALL
            .into_iter()
            .find(|ct| ct.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ContainerParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_code_roundtrip() {
        for ct in ContainerType::ALL {
            assert_eq!(ct.code().parse::<ContainerType>().unwrap(), ct);
        }
    }

    #[test]
    fn test_container_parse_is_case_insensitive() {
        assert_eq!(" 40hc ".parse::<ContainerType>().unwrap(), ContainerType::Hc40);
        assert!("53FT".parse::<ContainerType>().is_err());
    }

    #[test]
    fn test_container_serialization() {
        let json = serde_json::to_string(&ContainerType::Nor20).unwrap();
        assert_eq!(json, "\"20NOR\"");
    }

    #[test]
    fn test_canonical_order() {
        assert!(ContainerType::Gp20 < ContainerType::Gp40);
        assert!(ContainerType::Hc45 < ContainerType::Rf40);
    }

    #[test]
    fn test_rate_line_id_display() {
        assert_eq!(RateLineId::new("R-001").to_string(), "R-001");
    }
}
