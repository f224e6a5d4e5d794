//! Batch AI markup: one rate line at a time, with progress and cancellation.

use super::ai::{AiMarkupEngine, AiMarkupInputs};
use super::rng::MarkupRng;
use crate::config::Config;
use crate::domain::{ContainerType, Decimal, PriceMap, RateLine, RateLineId};
use crate::error::MarkupError;
use chrono::{DateTime, Utc};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Computed prices for one rate line, correlated by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiResult {
    pub rate_line_id: RateLineId,
    pub computed_prices: PriceMap,
    pub editable: bool,
}

impl AiResult {
    pub fn new(rate_line_id: RateLineId, computed_prices: PriceMap) -> Self {
        Self {
            rate_line_id,
            computed_prices,
            editable: true,
        }
    }

    /// Overwrite a computed price. Negative input is corrected to 0.
    ///
    /// Returns false if the result is locked or has no entry for `container`.
    pub fn edit(&mut self, container: ContainerType, price: Decimal) -> bool {
        if !self.editable {
            return false;
        }
        match self.computed_prices.get_mut(&container) {
            Some(slot) => {
                *slot = price.non_negative();
                true
            }
            None => false,
        }
    }
}

/// Snapshot handed to progress observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchProgress {
    pub total: usize,
    pub completed: usize,
    pub status: BatchStatus,
    /// Line being computed, if any.
    pub processing: Option<RateLineId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchJob {
    pub id: Uuid,
    pub total: usize,
    pub completed: usize,
    pub status: BatchStatus,
    pub processing: Option<RateLineId>,
    /// In input order.
    pub results: Vec<AiResult>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchJob {
    pub fn new(total: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            total,
            completed: 0,
            status: BatchStatus::Idle,
            processing: None,
            results: Vec::with_capacity(total),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            total: self.total,
            completed: self.completed,
            status: self.status,
            processing: self.processing.clone(),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, BatchStatus::Completed | BatchStatus::Cancelled)
    }

    pub fn result(&self, id: &RateLineId) -> Option<&AiResult> {
        self.results.iter().find(|r| &r.rate_line_id == id)
    }

    pub fn result_mut(&mut self, id: &RateLineId) -> Option<&mut AiResult> {
        self.results.iter_mut().find(|r| &r.rate_line_id == id)
    }
}

/// Shared cancellation flag, checked between lines.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation. Every clone sees the cleared flag.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A validated batch that computes one line per [`BatchRun::step`].
#[derive(Debug, Clone)]
pub struct BatchRun {
    engine: AiMarkupEngine,
    inputs: AiMarkupInputs,
    lines: Vec<RateLine>,
    next: usize,
    job: BatchJob,
}

impl BatchRun {
    pub fn job(&self) -> &BatchJob {
        &self.job
    }

    pub fn progress(&self) -> BatchProgress {
        self.job.progress()
    }

    pub fn is_done(&self) -> bool {
        self.job.is_finished() || self.next >= self.lines.len()
    }

    /// Mark the next rate line as being processed.
    ///
    /// Returns its id, or None once the run is done. [`BatchRun::step`] does
    /// this itself; calling it first lets observers see the line before it is computed.
    pub fn begin_next(&mut self) -> Option<&RateLineId> {
        if self.is_done() {
            return None;
        }
        if self.job.started_at.is_none() {
            self.job.started_at = Some(Utc::now());
        }
        self.job.status = BatchStatus::Running;
        let id = &self.lines[self.next].id;
        self.job.processing = Some(id.clone());
        Some(id)
    }

    /// Compute the next rate line and append its result.
    ///
    /// Returns `Ok(None)` once every line has been processed or the run was cancelled.
    pub fn step<R: MarkupRng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<&AiResult>, MarkupError> {
        if self.begin_next().is_none() {
            return Ok(None);
        }
        let line = &self.lines[self.next];

        let computed = self.engine.compute(
            line,
            self.inputs.strategy,
            &self.inputs.min_bound,
            &self.inputs.max_bound,
            rng,
        )?;
        tracing::debug!(
            "Computed AI markup for {} ({}/{})",
            line.id,
            self.job.completed + 1,
            self.job.total
        );

        self.job.results.push(AiResult::new(line.id.clone(), computed));
        self.job.completed += 1;
        self.job.processing = None;
        self.next += 1;
        if self.job.completed == self.job.total {
            self.job.status = BatchStatus::Completed;
            self.job.finished_at = Some(Utc::now());
        }
        Ok(self.job.results.last())
    }

    /// Stop before the next line. Results produced so far are kept.
    pub fn cancel(&mut self) {
        if self.job.is_finished() {
            return;
        }
        self.job.status = BatchStatus::Cancelled;
        self.job.processing = None;
        self.job.finished_at = Some(Utc::now());
    }

    pub fn into_job(self) -> BatchJob {
        self.job
    }
}

/// Drives [`AiMarkupEngine`] over a queue of rate lines.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: AiMarkupEngine,
    max_batch_size: usize,
    step_delay: Duration,
}

impl BatchProcessor {
    pub fn new(engine: AiMarkupEngine, max_batch_size: usize, step_delay: Duration) -> Self {
        Self {
            engine,
            max_batch_size,
            step_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            AiMarkupEngine::new(config.conflict_policy),
            config.max_batch_size,
            config.step_delay,
        )
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Check capacity and bounds for every line before anything is computed.
    pub fn validate(
        &self,
        lines: &[RateLine],
        inputs: &AiMarkupInputs,
    ) -> Result<(), MarkupError> {
        if lines.is_empty() {
            return Err(MarkupError::EmptyBatch);
        }
        if lines.len() > self.max_batch_size {
            return Err(MarkupError::CapacityExceeded {
                requested: lines.len(),
                max: self.max_batch_size,
            });
        }
        for line in lines {
            self.engine
                .check_bounds(line, &inputs.min_bound, &inputs.max_bound)?;
        }
        Ok(())
    }

    /// Validate and prepare a batch without computing anything yet.
    pub fn start(
        &self,
        lines: &[RateLine],
        inputs: &AiMarkupInputs,
    ) -> Result<BatchRun, MarkupError> {
        self.validate(lines, inputs)?;
        Ok(BatchRun {
            engine: self.engine,
            inputs: *inputs,
            lines: lines.to_vec(),
            next: 0,
            job: BatchJob::new(lines.len()),
        })
    }

    /// Run the whole batch, suspending after every line.
    ///
    /// `on_progress` is called twice per line: before it is computed, with
    /// `processing` set to its id, and after its result is appended.
    /// Cancellation is honoured at each suspension point; the returned job
    /// then has status `Cancelled` and keeps the results already produced.
    pub async fn run<R, F>(
        &self,
        lines: &[RateLine],
        inputs: &AiMarkupInputs,
        rng: &mut R,
        cancel: &CancelFlag,
        mut on_progress: F,
    ) -> Result<BatchJob, MarkupError>
    where
        R: MarkupRng + ?Sized,
        F: FnMut(&BatchProgress, &[AiResult]),
    {
        let mut batch = self.start(lines, inputs)?;
        tracing::info!(
            "Starting AI markup batch {} over {} rate lines (strategy {:?})",
            batch.job().id,
            lines.len(),
            inputs.strategy
        );

        while !batch.is_done() {
            if cancel.is_cancelled() {
                batch.cancel();
                tracing::warn!(
                    "AI markup batch {} cancelled after {}/{} lines",
                    batch.job().id,
                    batch.job().completed,
                    batch.job().total
                );
                break;
            }
            batch.begin_next();
            on_progress(&batch.progress(), &batch.job().results);
            batch.step(rng)?;
            on_progress(&batch.progress(), &batch.job().results);
            suspend(self.step_delay).await;
        }

        let job = batch.into_job();
        tracing::info!(
            "AI markup batch {} finished with status {:?} ({}/{})",
            job.id,
            job.status,
            job.completed,
            job.total
        );
        Ok(job)
    }

    /// Yield results one line at a time as a stream.
    ///
    /// Validation happens up front; the stream suspends between lines.
    pub fn stream<R>(
        &self,
        lines: &[RateLine],
        inputs: &AiMarkupInputs,
        rng: R,
    ) -> Result<impl Stream<Item = Result<AiResult, MarkupError>>, MarkupError>
    where
        R: MarkupRng,
    {
        let batch = self.start(lines, inputs)?;
        let delay = self.step_delay;
        Ok(stream::unfold((batch, rng), move |(mut batch, mut rng)| async move {
            if batch.is_done() {
                return None;
            }
            if batch.job().completed > 0 {
                suspend(delay).await;
            }
            let item = batch.step(&mut rng).map(|r| r.cloned());
            match item {
                Ok(Some(result)) => Some((Ok(result), (batch, rng))),
                Ok(None) => None,
                Err(err) => {
                    batch.cancel();
                    Some((Err(err), (batch, rng)))
                }
            }
        }))
    }
}

async fn suspend(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

/// Write AI results into the matching rate lines' quoted prices.
///
/// Correlation is by `rate_line_id`. Every id is checked before any line is
/// touched. Containers missing from a result keep their current price.
/// Returns the number of lines updated.
pub fn apply_results(lines: &mut [RateLine], results: &[AiResult]) -> Result<usize, MarkupError> {
    let index: HashMap<RateLineId, usize> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| (line.id.clone(), i))
        .collect();

    if let Some(unknown) = results.iter().find(|r| !index.contains_key(&r.rate_line_id)) {
        return Err(MarkupError::UnknownRateLine(unknown.rate_line_id.clone()));
    }

    for result in results {
        let line = &mut lines[index[&result.rate_line_id]];
        for (&container, &price) in &result.computed_prices {
            line.set_current(container, price);
        }
    }
    Ok(results.len())
}
