//! Domain types for the rate-markup engine.
//!
//! This module provides:
//! - Lossless money handling via the Decimal wrapper
//! - Domain primitives: RateLineId, ContainerType
//! - RateLine with its base/quoted price maps
//! - Bound, Strategy and MarkupMode inputs to the calculators

pub mod bound;
pub mod decimal;
pub mod primitives;
pub mod rate_line;
pub mod strategy;

pub use bound::{Bound, Combinator};
pub use decimal::Decimal;
pub use primitives::{ContainerParseError, ContainerType, RateLineId};
pub use rate_line::{PriceMap, RateLine, RateLineRecord};
pub use strategy::{MarkupMode, Strategy};
