//! CSV file rate source.
//!
//! Expected header: `id,carrier,origin,destination,<container>...` where each
//! container column is a code such as `20GP` or `40HC`. An empty cell means
//! the line has no price for that container.

use super::{RateSource, RateSourceError};
use crate::domain::{ContainerType, Decimal, PriceMap, RateLine, RateLineId};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;

const FIXED_COLUMNS: [&str; 4] = ["id", "carrier", "origin", "destination"];

#[derive(Debug, Clone)]
pub struct CsvRateSource {
    path: PathBuf,
}

impl CsvRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RateSource for CsvRateSource {
    async fn fetch_rate_lines(&self) -> Result<Vec<RateLine>, RateSourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let lines = parse_rate_lines(&content)?;
        tracing::info!("Loaded {} rate lines from {}", lines.len(), self.path.display());
        Ok(lines)
    }
}

/// Parse rate lines from CSV text.
pub fn parse_rate_lines(content: &str) -> Result<Vec<RateLine>, RateSourceError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    for (i, name) in FIXED_COLUMNS.into_iter().enumerate() {
        if !headers
            .get(i)
            .is_some_and(|h| h.eq_ignore_ascii_case(name))
        {
            return Err(RateSourceError::MissingColumn(name));
        }
    }
    let containers = headers
        .iter()
        .skip(FIXED_COLUMNS.len())
        .map(|h| {
            h.parse::<ContainerType>()
                .map_err(|_| RateSourceError::UnknownContainer(h.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("").to_string();
        let id = field(0);
        if !seen.insert(id.clone()) {
            return Err(RateSourceError::DuplicateId(id));
        }

        let mut base = PriceMap::new();
        for (offset, container) in containers.iter().enumerate() {
            let raw = record.get(FIXED_COLUMNS.len() + offset).unwrap_or("");
            if raw.is_empty() {
                continue;
            }
            let price = raw
                .parse::<Decimal>()
                .ok()
                .filter(|p| !p.is_negative())
                .ok_or_else(|| RateSourceError::InvalidPrice {
                    id: id.clone(),
                    container: container.to_string(),
                    value: raw.to_string(),
                })?;
            base.insert(*container, price);
        }

        lines.push(RateLine::new(
            RateLineId::new(id),
            field(1),
            field(2),
            field(3),
            base,
        ));
    }
    Ok(lines)
}
