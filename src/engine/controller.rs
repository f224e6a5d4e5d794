//! Markup mode selection and per-mode pending input state.

use super::ai::AiMarkupInputs;
use super::batch::{apply_results, AiResult, BatchJob, BatchProcessor, BatchProgress, CancelFlag};
use super::fixed::FixedMarkupCalculator;
use super::percentage::{PercentStep, PercentageMarkupCalculator};
use super::rng::MarkupRng;
use crate::domain::{ContainerType, Decimal, MarkupMode, RateLine, RateLineId};
use crate::error::MarkupError;
use crate::render;
use std::collections::{BTreeMap, HashMap};

/// Parse a typed markup value. Blank or non-numeric text becomes 0.
pub fn parse_markup_input(text: &str) -> Decimal {
    text.trim().parse::<Decimal>().unwrap_or_else(|_| Decimal::zero())
}

/// Uncommitted per-container values plus the "apply to all" scratch value.
///
/// Values are kept as typed so invalid intermediate text survives until commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInputs {
    values: BTreeMap<(RateLineId, ContainerType), String>,
    apply_all: Option<String>,
}

impl PendingInputs {
    pub fn set(&mut self, id: RateLineId, container: ContainerType, text: impl Into<String>) {
        self.values.insert((id, container), text.into());
    }

    pub fn get(&self, id: &RateLineId, container: ContainerType) -> Option<&str> {
        self.values
            .get(&(id.clone(), container))
            .map(|s| s.as_str())
    }

    pub fn set_apply_all(&mut self, text: impl Into<String>) {
        self.apply_all = Some(text.into());
    }

    pub fn apply_all(&self) -> Option<&str> {
        self.apply_all.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.apply_all.is_none()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.apply_all = None;
    }
}

#[derive(Debug, Clone, Copy)]
enum PendingUpdate {
    Price(ContainerType, Decimal),
    Percent(PercentStep),
}

/// AI mode inputs and the batch job they produced, if any.
#[derive(Debug, Clone, Default)]
pub struct AiModeState {
    pub inputs: AiMarkupInputs,
    pub job: Option<BatchJob>,
}

/// Owns the active markup mode and gates writes to `current_prices`.
///
/// Switching modes keeps every mode's pending inputs; only the AI batch job
/// is discarded when leaving AI mode.
#[derive(Debug, Clone, Default)]
pub struct MarkupModeController {
    active: MarkupMode,
    fixed: PendingInputs,
    percentage: PendingInputs,
    ai: AiModeState,
    fixed_calc: FixedMarkupCalculator,
    percentage_calc: PercentageMarkupCalculator,
    display: String,
}

impl MarkupModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_mode(&self) -> MarkupMode {
        self.active
    }

    /// Latest quote text, refreshed after every price mutation.
    pub fn display_text(&self) -> &str {
        &self.display
    }

    pub fn refresh_display(&mut self, lines: &[RateLine]) -> &str {
        self.display = render::quote_text(lines);
        &self.display
    }

    pub fn switch_mode(&mut self, mode: MarkupMode) {
        if mode == self.active {
            return;
        }
        if self.active == MarkupMode::Ai {
            if let Some(job) = self.ai.job.take() {
                tracing::info!("Discarding uncommitted AI batch {}", job.id);
            }
        }
        tracing::info!("Markup mode switched from {} to {}", self.active, mode);
        self.active = mode;
    }

    /// Back to a fresh session: Fixed mode, no inputs, no accumulated percentages.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn fixed_inputs(&self) -> &PendingInputs {
        &self.fixed
    }

    pub fn fixed_inputs_mut(&mut self) -> &mut PendingInputs {
        &mut self.fixed
    }

    pub fn percentage_inputs(&self) -> &PendingInputs {
        &self.percentage
    }

    pub fn percentage_inputs_mut(&mut self) -> &mut PendingInputs {
        &mut self.percentage
    }

    pub fn ai_inputs(&self) -> &AiMarkupInputs {
        &self.ai.inputs
    }

    pub fn ai_inputs_mut(&mut self) -> &mut AiMarkupInputs {
        &mut self.ai.inputs
    }

    pub fn ai_job(&self) -> Option<&BatchJob> {
        self.ai.job.as_ref()
    }

    fn require(&self, mode: MarkupMode) -> Result<(), MarkupError> {
        if self.active == mode {
            Ok(())
        } else {
            Err(MarkupError::ModeInactive {
                required: mode,
                active: self.active,
            })
        }
    }

    /// Add `delta` to every price; stacks with earlier calls.
    pub fn apply_fixed_to_all(
        &mut self,
        lines: &mut [RateLine],
        delta: Decimal,
    ) -> Result<usize, MarkupError> {
        self.require(MarkupMode::Fixed)?;
        let touched = self.fixed_calc.apply_to_all(lines, delta)?;
        tracing::info!("Applied fixed markup {} to {} prices", delta, touched);
        self.refresh_display(lines);
        Ok(touched)
    }

    /// Add `percent` to every price's running percentage; stacks with earlier calls.
    pub fn apply_percentage_to_all(
        &mut self,
        lines: &mut [RateLine],
        percent: Decimal,
    ) -> Result<usize, MarkupError> {
        self.require(MarkupMode::Percentage)?;
        let touched = self.percentage_calc.apply_to_all(lines, percent)?;
        tracing::info!("Applied percentage markup {}% to {} prices", percent, touched);
        self.refresh_display(lines);
        Ok(touched)
    }

    /// Apply the active mode's "apply to all" scratch value.
    pub fn apply_to_all(&mut self, lines: &mut [RateLine]) -> Result<usize, MarkupError> {
        match self.active {
            MarkupMode::Fixed => {
                let delta = parse_markup_input(self.fixed.apply_all().unwrap_or(""));
                self.apply_fixed_to_all(lines, delta)
            }
            MarkupMode::Percentage => {
                let percent = parse_markup_input(self.percentage.apply_all().unwrap_or(""));
                self.apply_percentage_to_all(lines, percent)
            }
            MarkupMode::Ai => Err(MarkupError::Unsupported {
                operation: "apply to all",
                mode: MarkupMode::Ai,
            }),
        }
    }

    /// Commit the active mode's pending per-container values.
    ///
    /// In AI mode this applies the batch results. Pending values for lines
    /// not in `lines`, or values that would overflow a price, fail the commit
    /// before anything is written.
    pub fn commit_pending(&mut self, lines: &mut [RateLine]) -> Result<usize, MarkupError> {
        let mode = self.active;
        let pending = match mode {
            MarkupMode::Fixed => &mut self.fixed,
            MarkupMode::Percentage => &mut self.percentage,
            MarkupMode::Ai => return self.apply_ai_results(lines),
        };

        let index: HashMap<RateLineId, usize> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line.id.clone(), i))
            .collect();
        if let Some((id, _)) = pending.values.keys().find(|(id, _)| !index.contains_key(id)) {
            return Err(MarkupError::UnknownRateLine(id.clone()));
        }

        let mut updates = Vec::with_capacity(pending.values.len());
        for ((id, container), text) in &pending.values {
            let i = index[id];
            let amount = parse_markup_input(text);
            let update = match mode {
                MarkupMode::Fixed => self
                    .fixed_calc
                    .marked_up(&lines[i], *container, amount)?
                    .map(|price| PendingUpdate::Price(*container, price)),
                _ => self
                    .percentage_calc
                    .preview(&lines[i], *container, amount)?
                    .map(PendingUpdate::Percent),
            };
            updates.extend(update.map(|u| (i, u)));
        }
        pending.values.clear();

        for &(i, update) in &updates {
            match update {
                PendingUpdate::Price(container, price) => {
                    lines[i].set_current(container, price);
                }
                PendingUpdate::Percent(step) => self.percentage_calc.commit(&mut lines[i], step),
            }
        }
        tracing::info!("Committed {} pending {} inputs", updates.len(), mode);
        self.refresh_display(lines);
        Ok(updates.len())
    }

    /// Run AI markup over `lines`, replacing any previous batch job.
    pub async fn run_ai<R, F>(
        &mut self,
        processor: &BatchProcessor,
        lines: &[RateLine],
        rng: &mut R,
        cancel: &CancelFlag,
        on_progress: F,
    ) -> Result<&BatchJob, MarkupError>
    where
        R: MarkupRng + ?Sized,
        F: FnMut(&BatchProgress, &[AiResult]),
    {
        self.require(MarkupMode::Ai)?;
        self.ai.job = None;
        let inputs = self.ai.inputs;
        let job = processor
            .run(lines, &inputs, rng, cancel, on_progress)
            .await?;
        Ok(self.ai.job.insert(job))
    }

    /// Overwrite one computed AI price before it is committed.
    pub fn edit_ai_result(
        &mut self,
        id: &RateLineId,
        container: ContainerType,
        price: Decimal,
    ) -> Result<bool, MarkupError> {
        self.require(MarkupMode::Ai)?;
        let job = self.ai.job.as_mut().ok_or(MarkupError::NoBatchResults)?;
        let result = job
            .result_mut(id)
            .ok_or_else(|| MarkupError::UnknownRateLine(id.clone()))?;
        Ok(result.edit(container, price))
    }

    /// Commit AI results into `current_prices` and discard the batch job.
    pub fn apply_ai_results(&mut self, lines: &mut [RateLine]) -> Result<usize, MarkupError> {
        self.require(MarkupMode::Ai)?;
        let job = match self.ai.job.as_ref() {
            Some(job) if !job.results.is_empty() => job,
            _ => return Err(MarkupError::NoBatchResults),
        };
        let applied = apply_results(lines, &job.results)?;
        tracing::info!("Applied AI results for {} rate lines", applied);
        self.ai.job = None;
        self.refresh_display(lines);
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceMap;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn lines() -> Vec<RateLine> {
        let base: PriceMap = [(ContainerType::Gp20, d("100")), (ContainerType::Gp40, d("200"))]
            .into_iter()
            .collect();
        vec![RateLine::new(
            RateLineId::new("R1"),
            "Evergreen",
            "Kaohsiung",
            "Los Angeles",
            base,
        )]
    }

    #[test]
    fn test_parse_markup_input() {
        assert_eq!(parse_markup_input(" 12.5 "), d("12.5"));
        assert_eq!(parse_markup_input("-3"), d("-3"));
        assert_eq!(parse_markup_input("abc"), Decimal::zero());
        assert_eq!(parse_markup_input(""), Decimal::zero());
    }

    #[test]
    fn test_inactive_mode_cannot_write() {
        let mut controller = MarkupModeController::new();
        let mut lines = lines();
        let err = controller
            .apply_percentage_to_all(&mut lines, d("5"))
            .unwrap_err();
        assert_eq!(
            err,
            MarkupError::ModeInactive {
                required: MarkupMode::Percentage,
                active: MarkupMode::Fixed
            }
        );
        assert_eq!(lines[0].current(ContainerType::Gp20), Some(d("100")));
    }

    #[test]
    fn test_switching_preserves_pending_inputs() {
        let mut controller = MarkupModeController::new();
        controller.fixed_inputs_mut().set_apply_all("25");
        controller
            .fixed_inputs_mut()
            .set(RateLineId::new("R1"), ContainerType::Gp20, "1x");
        controller.switch_mode(MarkupMode::Percentage);
        controller.percentage_inputs_mut().set_apply_all("3");
        controller.switch_mode(MarkupMode::Ai);
        controller.switch_mode(MarkupMode::Fixed);

        assert_eq!(controller.fixed_inputs().apply_all(), Some("25"));
        assert_eq!(
            controller
                .fixed_inputs()
                .get(&RateLineId::new("R1"), ContainerType::Gp20),
            Some("1x")
        );
        assert_eq!(controller.percentage_inputs().apply_all(), Some("3"));
    }

    #[test]
    fn test_commit_pending_fixed_sanitizes_and_clears() {
        let mut controller = MarkupModeController::new();
        let mut lines = lines();
        let id = RateLineId::new("R1");
        controller.fixed_inputs_mut().set(id.clone(), ContainerType::Gp20, "15");
        controller.fixed_inputs_mut().set(id.clone(), ContainerType::Gp40, "oops");
        assert_eq!(controller.commit_pending(&mut lines).unwrap(), 2);
        assert_eq!(lines[0].current(ContainerType::Gp20), Some(d("115")));
        assert_eq!(lines[0].current(ContainerType::Gp40), Some(d("200")));
        assert!(controller.fixed_inputs().get(&id, ContainerType::Gp20).is_none());
        assert!(controller.display_text().contains("20GP 115"));
    }

    #[test]
    fn test_commit_pending_unknown_line_writes_nothing() {
        let mut controller = MarkupModeController::new();
        let mut lines = lines();
        controller
            .fixed_inputs_mut()
            .set(RateLineId::new("R1"), ContainerType::Gp20, "15");
        controller
            .fixed_inputs_mut()
            .set(RateLineId::new("GONE"), ContainerType::Gp20, "15");
        let err = controller.commit_pending(&mut lines).unwrap_err();
        assert_eq!(err, MarkupError::UnknownRateLine(RateLineId::new("GONE")));
        assert_eq!(lines[0].current(ContainerType::Gp20), Some(d("100")));
    }

    #[test]
    fn test_commit_pending_overflow_writes_nothing_and_keeps_inputs() {
        let mut controller = MarkupModeController::new();
        controller.switch_mode(MarkupMode::Percentage);
        let mut lines = lines();
        let id = RateLineId::new("R1");
        controller
            .percentage_inputs_mut()
            .set(id.clone(), ContainerType::Gp20, "10");
        controller.percentage_inputs_mut().set(
            id.clone(),
            ContainerType::Gp40,
            "79228162514264337593543950335",
        );

        let err = controller.commit_pending(&mut lines).unwrap_err();
        assert_eq!(err, MarkupError::overflow(&id, ContainerType::Gp40));
        assert_eq!(lines[0].current(ContainerType::Gp20), Some(d("100")));
        assert_eq!(
            controller.percentage_inputs().get(&id, ContainerType::Gp20),
            Some("10")
        );
    }

    #[test]
    fn test_apply_to_all_uses_scratch_value_and_stacks() {
        let mut controller = MarkupModeController::new();
        let mut lines = lines();
        controller.fixed_inputs_mut().set_apply_all("10");
        controller.apply_to_all(&mut lines).unwrap();
        controller.apply_to_all(&mut lines).unwrap();
        assert_eq!(lines[0].current(ContainerType::Gp20), Some(d("120")));
        assert_eq!(lines[0].current(ContainerType::Gp40), Some(d("220")));
    }

    #[test]
    fn test_apply_to_all_not_available_in_ai_mode() {
        let mut controller = MarkupModeController::new();
        controller.switch_mode(MarkupMode::Ai);
        let err = controller.apply_to_all(&mut lines()).unwrap_err();
        assert!(matches!(err, MarkupError::Unsupported { .. }));
    }

    #[test]
    fn test_ai_commit_without_results() {
        let mut controller = MarkupModeController::new();
        controller.switch_mode(MarkupMode::Ai);
        assert_eq!(
            controller.commit_pending(&mut lines()).unwrap_err(),
            MarkupError::NoBatchResults
        );
        assert_eq!(
            controller
                .edit_ai_result(&RateLineId::new("R1"), ContainerType::Gp20, d("1"))
                .unwrap_err(),
            MarkupError::NoBatchResults
        );
    }

    #[test]
    fn test_reset_returns_to_fixed_defaults() {
        let mut controller = MarkupModeController::new();
        controller.percentage_inputs_mut().set_apply_all("3");
        controller.switch_mode(MarkupMode::Percentage);
        controller.reset();
        assert_eq!(controller.active_mode(), MarkupMode::Fixed);
        assert!(controller.percentage_inputs().is_empty());
    }
}
