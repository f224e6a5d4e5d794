//! Mock rate source for testing without files.

use super::{RateSource, RateSourceError};
use crate::domain::RateLine;
use async_trait::async_trait;

/// Mock rate source that returns predefined rate lines.
#[derive(Debug, Clone, Default)]
pub struct MockRateSource {
    lines: Vec<RateLine>,
}

impl MockRateSource {
    /// Create a new mock rate source with no lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rate line.
    pub fn with_line(mut self, line: RateLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Add multiple rate lines.
    pub fn with_lines(mut self, lines: Vec<RateLine>) -> Self {
        self.lines.extend(lines);
        self
    }
}

#[async_trait]
impl RateSource for MockRateSource {
    async fn fetch_rate_lines(&self) -> Result<Vec<RateLine>, RateSourceError> {
        Ok(self.lines.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContainerType, Decimal, PriceMap, RateLineId};

    fn make_line(id: &str) -> RateLine {
        let base: PriceMap = [(ContainerType::Gp20, Decimal::from_i64(1000))]
            .into_iter()
            .collect();
        RateLine::new(RateLineId::new(id), "ONE", "Tokyo", "Seattle", base)
    }

    #[tokio::test]
    async fn test_mock_source_preserves_order() {
        let mock = MockRateSource::new()
            .with_line(make_line("B"))
            .with_lines(vec![make_line("A"), make_line("C")]);
        let lines = mock.fetch_rate_lines().await.unwrap();
        let ids: Vec<&str> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_mock_source_empty() {
        let lines = tokio_test::block_on(MockRateSource::new().fetch_rate_lines()).unwrap();
        assert!(lines.is_empty());
    }
}
