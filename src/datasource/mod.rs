//! Rate source abstraction for loading the rate lines of a quoting session.

use crate::domain::RateLine;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod csv;
pub mod mock;

pub use self::csv::CsvRateSource;
pub use mock::MockRateSource;

/// Supplies the ordered rate lines a quoting session works on.
#[async_trait]
pub trait RateSource: Send + Sync + fmt::Debug {
    /// Fetch rate lines with base prices populated.
    ///
    /// # Returns
    /// Rate lines in source order; `current_prices` equal `base_prices`.
    async fn fetch_rate_lines(&self) -> Result<Vec<RateLine>, RateSourceError>;
}

/// Error type for rate source operations.
#[derive(Debug, Error)]
pub enum RateSourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
    #[error("Unknown container type in header: {0}")]
    UnknownContainer(String),
    #[error("Invalid price {value:?} for {id} {container}")]
    InvalidPrice {
        id: String,
        container: String,
        value: String,
    },
    #[error("Duplicate rate line id: {0}")]
    DuplicateId(String),
}
