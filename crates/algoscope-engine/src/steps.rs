//! Step records: immutable snapshots of a sort for forward/backward replay.
//!
//! Records are produced by running the sorting engine with an immediate
//! pacer and a [`StepRecorder`] as its renderer, so replayed steps match the
//! live animation exactly.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use algoscope_core::{ParseError, SortAlgorithm};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::control::{Outcome, RunControl};
use crate::error::{Error, Result};
use crate::pacer::Pacer;
use crate::sink::{Frame, HighlightKind, RenderSink, Sinks, StatusSink};
use crate::sorting::SortEngine;

/// One instant of a sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub array: Vec<f64>,
    /// Indices being compared (pivot included)
    pub comparisons: Vec<usize>,
    /// Indices written by a swap or merge placement
    pub swaps: Vec<usize>,
    pub description: String,
}

/// Render sink that turns bar frames into step records.
#[derive(Debug, Default)]
pub struct StepRecorder {
    steps: Mutex<Vec<StepRecord>>,
}

impl StepRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, step: StepRecord) {
        self.steps.lock().unwrap_or_else(PoisonError::into_inner).push(step);
    }

    pub fn take(&self) -> Vec<StepRecord> {
        std::mem::take(&mut *self.steps.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl RenderSink for StepRecorder {
    fn render(&self, frame: &Frame) {
        let Some(values) = frame.scene.bars() else {
            return;
        };
        let mut comparisons = frame.indices(HighlightKind::Comparing);
        comparisons.extend(frame.indices(HighlightKind::Pivot));
        self.push(StepRecord {
            array: values.to_vec(),
            comparisons,
            swaps: frame.indices(HighlightKind::Swapping),
            description: frame.caption.clone().unwrap_or_default(),
        });
    }
}

impl StatusSink for StepRecorder {
    fn status(&self, _message: &str) {}
}

/// Compute every step of sorting `values` with `algorithm`.
///
/// The first record is the untouched input, the last the sorted result.
pub async fn record_sort_steps(values: &[f64], algorithm: SortAlgorithm) -> Result<Vec<StepRecord>> {
    if values.is_empty() {
        return Err(ParseError::Empty.into());
    }
    let recorder = Arc::new(StepRecorder::new());
    let sinks = Sinks::new(recorder.clone(), recorder.clone());
    let mut engine = SortEngine::new(RunControl::new(), sinks)
        .with_pacer(Pacer::immediate())
        .with_algorithm(algorithm);
    engine.set_values(values.to_vec())?;

    // Loading renders the initial bars; relabel that frame.
    let mut steps = recorder.take();
    for step in &mut steps {
        step.description = "Initial array".to_string();
    }

    match engine.start().await {
        Outcome::Completed(_) => {}
        Outcome::Rejected => return Err(Error::Busy),
        Outcome::Cancelled => return Err(Error::Cancelled),
    }
    steps.extend(recorder.take());
    debug!(%algorithm, len = values.len(), steps = steps.len(), "steps recorded");
    Ok(steps)
}

/// Blocking wrapper around [`record_sort_steps`] for non-async callers.
pub fn record_sort_steps_blocking(values: &[f64], algorithm: SortAlgorithm) -> Result<Vec<StepRecord>> {
    futures::executor::block_on(record_sort_steps(values, algorithm))
}

/// Anything that can supply step records for a sort.
pub trait StepSource {
    fn fetch_steps(
        &self,
        values: &[f64],
        algorithm: SortAlgorithm,
    ) -> impl Future<Output = Result<Vec<StepRecord>>> + Send;
}

/// Computes steps in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStepSource;

impl StepSource for LocalStepSource {
    fn fetch_steps(
        &self,
        values: &[f64],
        algorithm: SortAlgorithm,
    ) -> impl Future<Output = Result<Vec<StepRecord>>> + Send {
        let values = values.to_vec();
        async move { record_sort_steps(&values, algorithm).await }
    }
}

/// Ask `source` for steps; on any failure log a warning and compute them
/// locally instead.
pub async fn fetch_steps_or_local<S: StepSource>(
    source: &S,
    values: &[f64],
    algorithm: SortAlgorithm,
) -> Result<Vec<StepRecord>> {
    match source.fetch_steps(values, algorithm).await {
        Ok(steps) => Ok(steps),
        Err(e) => {
            warn!(error = %e, %algorithm, "step source failed, computing steps locally");
            record_sort_steps(values, algorithm).await
        }
    }
}
