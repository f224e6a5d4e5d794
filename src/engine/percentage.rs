//! Percentage markup, always recomputed from the base price.

use crate::domain::{ContainerType, Decimal, RateLine, RateLineId};
use crate::error::MarkupError;
use std::collections::{BTreeMap, HashMap};

/// Running total and resulting price for one container, not yet recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentStep {
    pub container: ContainerType,
    pub total: Decimal,
    pub price: Decimal,
}

/// Applies percentage increments relative to base prices.
///
/// Percentages accumulate additively per (line, container): +5% then +5% is
/// +10% of base, not 1.05 * 1.05. Totals are floored at 0%.
#[derive(Debug, Clone, Default)]
pub struct PercentageMarkupCalculator {
    totals: HashMap<RateLineId, BTreeMap<ContainerType, Decimal>>,
}

impl PercentageMarkupCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated percentage for one container (0 if never applied).
    pub fn total_percent(&self, id: &RateLineId, container: ContainerType) -> Decimal {
        self.totals
            .get(id)
            .and_then(|per_line| per_line.get(&container))
            .copied()
            .unwrap_or_else(Decimal::zero)
    }

    /// Work out what adding `percent` would do, without recording it.
    ///
    /// Returns None if the line has no base price for `container`.
    pub fn preview(
        &self,
        line: &RateLine,
        container: ContainerType,
        percent: Decimal,
    ) -> Result<Option<PercentStep>, MarkupError> {
        let Some(base) = line.base(container) else {
            return Ok(None);
        };
        let overflow = || MarkupError::overflow(&line.id, container);
        let total = self
            .total_percent(&line.id, container)
            .checked_add(percent)
            .ok_or_else(overflow)?
            .non_negative();
        let price = base.checked_scale_by_percent(total).ok_or_else(overflow)?;
        Ok(Some(PercentStep {
            container,
            total,
            price,
        }))
    }

    /// Record a previewed step: store its total and reprice the line.
    pub fn commit(&mut self, line: &mut RateLine, step: PercentStep) {
        self.totals
            .entry(line.id.clone())
            .or_default()
            .insert(step.container, step.total);
        line.set_current(step.container, step.price);
    }

    /// Add `percent` to one container's running total and reprice it.
    ///
    /// Returns the new price, or None if the line has no base price for `container`.
    pub fn apply_percent(
        &mut self,
        line: &mut RateLine,
        container: ContainerType,
        percent: Decimal,
    ) -> Result<Option<Decimal>, MarkupError> {
        let Some(step) = self.preview(line, container, percent)? else {
            return Ok(None);
        };
        self.commit(line, step);
        Ok(Some(step.price))
    }

    /// Add `percent` to every priced container of every line.
    ///
    /// Nothing is recorded unless every new price is representable.
    pub fn apply_to_all(
        &mut self,
        lines: &mut [RateLine],
        percent: Decimal,
    ) -> Result<usize, MarkupError> {
        let mut steps = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            for container in line.containers() {
                if let Some(step) = self.preview(line, container, percent)? {
                    steps.push((i, step));
                }
            }
        }
        for &(i, step) in &steps {
            self.commit(&mut lines[i], step);
        }
        Ok(steps.len())
    }

    /// Forget all accumulated totals.
    pub fn reset(&mut self) {
        self.totals.clear();
    }
}
