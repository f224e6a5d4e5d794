//! Heuristic ("AI") markup for a single rate line.

use super::constraint::PriceWindow;
use super::rng::MarkupRng;
use crate::config::ConflictPolicy;
use crate::domain::{Bound, Decimal, PriceMap, RateLine, Strategy};
use crate::error::MarkupError;
use serde::{Deserialize, Serialize};

/// Half-width of the popularity perturbation around 1.0.
pub const POPULARITY_SPREAD: f64 = 0.05;

/// Probability that a price bumped to end in 8 is nudged on to 9.
pub const NINE_ENDING_CHANCE: f64 = 0.5;

/// Strategy and bounds for one AI markup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiMarkupInputs {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub min_bound: Bound,
    #[serde(default)]
    pub max_bound: Bound,
}

impl AiMarkupInputs {
    pub fn new(strategy: Strategy, min_bound: Bound, max_bound: Bound) -> Self {
        Self {
            strategy,
            min_bound,
            max_bound,
        }
    }
}

/// Computes quoted prices from base prices using a strategy multiplier,
/// a popularity perturbation and psychological rounding, clamped into the
/// min/max bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct AiMarkupEngine {
    policy: ConflictPolicy,
}

impl AiMarkupEngine {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Fail if any container window on `line` is inverted and the policy is `Reject`.
    pub fn check_bounds(
        &self,
        line: &RateLine,
        min_bound: &Bound,
        max_bound: &Bound,
    ) -> Result<(), MarkupError> {
        if self.policy == ConflictPolicy::PreferCeiling {
            return Ok(());
        }
        for (&container, &base) in line.base_prices() {
            let window = PriceWindow::resolve(base, min_bound, max_bound);
            if let Some((floor, ceiling)) = window.conflict() {
                return Err(MarkupError::ConstraintConflict {
                    rate_line_id: line.id.clone(),
                    container,
                    floor,
                    ceiling,
                });
            }
        }
        Ok(())
    }

    /// Compute quoted prices for every container with a base price.
    ///
    /// Pure apart from the draws taken from `rng`: one uniform per container,
    /// plus one coin flip for each container whose rounded price was bumped.
    ///
    /// # Errors
    /// `ConstraintConflict` if a window is inverted and the policy is `Reject`.
    /// `Overflow` if a marked-up price leaves the decimal range.
    pub fn compute<R: MarkupRng + ?Sized>(
        &self,
        line: &RateLine,
        strategy: Strategy,
        min_bound: &Bound,
        max_bound: &Bound,
        rng: &mut R,
    ) -> Result<PriceMap, MarkupError> {
        let multiplier = strategy.multiplier();
        let mut computed = PriceMap::new();

        for (&container, &base) in line.base_prices() {
            let window = PriceWindow::resolve(base, min_bound, max_bound);
            if let Some((floor, ceiling)) = window.conflict() {
                match self.policy {
                    ConflictPolicy::Reject => {
                        return Err(MarkupError::ConstraintConflict {
                            rate_line_id: line.id.clone(),
                            container,
                            floor,
                            ceiling,
                        })
                    }
                    ConflictPolicy::PreferCeiling => {
                        tracing::warn!(
                            "Inverted bounds on {} {} (floor {} > ceiling {}), using ceiling",
                            line.id,
                            container,
                            floor,
                            ceiling
                        );
                    }
                }
            }

            let offset = rng.uniform(-POPULARITY_SPREAD, POPULARITY_SPREAD);
            let popularity =
                Decimal::one() + Decimal::from_f64(offset).unwrap_or_else(Decimal::zero);
            let rounded = base
                .checked_mul(multiplier)
                .and_then(|price| price.checked_mul(popularity))
                .and_then(|raw| psychological_round(raw.round_units(), rng))
                .ok_or_else(|| MarkupError::overflow(&line.id, container))?;
            computed.insert(container, window.clamp(rounded));
        }

        Ok(computed)
    }
}

/// Move a whole-unit price so its last digit is 8 or 9.
///
/// Digits 0-7 go up to the next 8, then a coin flip may make it 9. Prices
/// already ending in 8 or 9 are left alone and no flip is drawn. Returns None
/// if the bump leaves the decimal range.
pub fn psychological_round<R: MarkupRng + ?Sized>(
    rounded: Decimal,
    rng: &mut R,
) -> Option<Decimal> {
    let digit = rounded % Decimal::ten();
    if digit >= Decimal::from_i64(8) {
        return Some(rounded);
    }
    let bumped = rounded
        .checked_sub(digit)?
        .checked_add(Decimal::from_i64(8))?;
    if rng.chance(NINE_ENDING_CHANCE) {
        bumped.checked_add(Decimal::one())
    } else {
        Some(bumped)
    }
}
