//! Absolute markup: adds a delta on top of the current quoted price.

use crate::domain::{ContainerType, Decimal, RateLine};
use crate::error::MarkupError;

/// Applies absolute increments to quoted prices.
///
/// Increments stack: applying +10 twice adds 20. Results are floored at 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedMarkupCalculator;

impl FixedMarkupCalculator {
    pub fn new() -> Self {
        FixedMarkupCalculator
    }

    /// Price that adding `delta` would produce, without writing it.
    ///
    /// Returns None if the line has no price for `container`.
    pub fn marked_up(
        &self,
        line: &RateLine,
        container: ContainerType,
        delta: Decimal,
    ) -> Result<Option<Decimal>, MarkupError> {
        let Some(current) = line.current(container) else {
            return Ok(None);
        };
        current
            .checked_add(delta)
            .map(|next| Some(next.non_negative()))
            .ok_or_else(|| MarkupError::overflow(&line.id, container))
    }

    /// Add `delta` to one container's quoted price.
    ///
    /// Returns the new price, or None if the line has no price for `container`.
    pub fn apply_delta(
        &self,
        line: &mut RateLine,
        container: ContainerType,
        delta: Decimal,
    ) -> Result<Option<Decimal>, MarkupError> {
        let next = self.marked_up(line, container, delta)?;
        if let Some(price) = next {
            line.set_current(container, price);
        }
        Ok(next)
    }

    /// Add `delta` to every priced container of every line.
    ///
    /// Nothing is written unless every new price is representable. Returns the
    /// number of prices touched.
    pub fn apply_to_all(
        &self,
        lines: &mut [RateLine],
        delta: Decimal,
    ) -> Result<usize, MarkupError> {
        let mut updates = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            for container in line.containers() {
                if let Some(price) = self.marked_up(line, container, delta)? {
                    updates.push((i, container, price));
                }
            }
        }
        for &(i, container, price) in &updates {
            lines[i].set_current(container, price);
        }
        Ok(updates.len())
    }
}
