//! A quoting session: one rate-line set, one mode controller, one batch processor.

use crate::datasource::{RateSource, RateSourceError};
use crate::domain::{Bound, Decimal, MarkupMode, RateLine, Strategy};
use crate::engine::{
    AiMarkupInputs, BatchProcessor, BatchStatus, CancelFlag, MarkupModeController, MarkupRng,
};
use crate::error::MarkupError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A markup instruction for the whole session, tagged by `mode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum QuoteRequest {
    Fixed {
        delta: Decimal,
    },
    Percentage {
        percent: Decimal,
    },
    Ai {
        #[serde(default)]
        strategy: Strategy,
        #[serde(default)]
        min_bound: Bound,
        #[serde(default)]
        max_bound: Bound,
    },
}

impl QuoteRequest {
    pub fn mode(&self) -> MarkupMode {
        match self {
            QuoteRequest::Fixed { .. } => MarkupMode::Fixed,
            QuoteRequest::Percentage { .. } => MarkupMode::Percentage,
            QuoteRequest::Ai { .. } => MarkupMode::Ai,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Source(#[from] RateSourceError),
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

pub struct QuoteSession {
    lines: Vec<RateLine>,
    controller: MarkupModeController,
    processor: BatchProcessor,
    cancel: CancelFlag,
}

impl QuoteSession {
    pub fn new(lines: Vec<RateLine>, processor: BatchProcessor) -> Self {
        let mut controller = MarkupModeController::new();
        controller.refresh_display(&lines);
        Self {
            lines,
            controller,
            processor,
            cancel: CancelFlag::new(),
        }
    }

    /// Build a session from whatever `source` supplies.
    pub async fn load(
        source: &dyn RateSource,
        processor: BatchProcessor,
    ) -> Result<Self, SessionError> {
        let lines = source.fetch_rate_lines().await?;
        Ok(Self::new(lines, processor))
    }

    pub fn lines(&self) -> &[RateLine] {
        &self.lines
    }

    pub fn controller(&self) -> &MarkupModeController {
        &self.controller
    }

    /// Handle that stops a running AI batch at its next suspension point.
    ///
    /// The flag is cleared when the next AI request starts, so a handle stays
    /// usable across runs.
    pub fn cancel_handle(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Apply `request` to every rate line and return the refreshed quote text.
    ///
    /// AI requests run the batch and commit its results, including the partial
    /// results of a cancelled batch.
    pub async fn execute<R>(
        &mut self,
        request: &QuoteRequest,
        rng: &mut R,
    ) -> Result<String, SessionError>
    where
        R: MarkupRng + ?Sized,
    {
        self.controller.switch_mode(request.mode());
        match request {
            QuoteRequest::Fixed { delta } => {
                self.controller
                    .fixed_inputs_mut()
                    .set_apply_all(delta.to_string());
                self.controller.apply_to_all(&mut self.lines)?;
            }
            QuoteRequest::Percentage { percent } => {
                self.controller
                    .percentage_inputs_mut()
                    .set_apply_all(percent.to_string());
                self.controller.apply_to_all(&mut self.lines)?;
            }
            QuoteRequest::Ai {
                strategy,
                min_bound,
                max_bound,
            } => {
                *self.controller.ai_inputs_mut() =
                    AiMarkupInputs::new(*strategy, *min_bound, *max_bound);
                self.cancel.reset();
                let job = self
                    .controller
                    .run_ai(&self.processor, &self.lines, rng, &self.cancel, |progress, _| {
                        tracing::info!(
                            "AI markup progress {}/{}",
                            progress.completed,
                            progress.total
                        );
                    })
                    .await?;
                if job.status == BatchStatus::Cancelled {
                    tracing::warn!(
                        "Committing {} of {} AI results from a cancelled batch",
                        job.completed,
                        job.total
                    );
                }
                self.controller.apply_ai_results(&mut self.lines)?;
            }
        }
        Ok(self.controller.display_text().to_string())
    }
}
