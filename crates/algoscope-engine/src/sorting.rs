//! Sorting engine: bubble, quick, merge and heap sort with checkpoints.
//!
//! Every comparison and every write is a checkpoint: the engine renders a
//! bar frame and then paces. Recursive algorithms are boxed futures so the
//! recursion depth is bounded by `MAX_SEQUENCE_LEN`.

use std::time::Duration;

use algoscope_core::{
    format_value, generate_sequence, parse_custom_sequence, ArrayConfig, ParseError, SortAlgorithm,
    MAX_SEQUENCE_LEN,
};
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::control::{Outcome, RunControl, RunToken};
use crate::error::{Error, Result};
use crate::pacer::{Pacer, PacerConfig};
use crate::sink::{Frame, Highlight, HighlightKind, Scene, Sinks};

/// Counters collected during one sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortStats {
    pub comparisons: u64,
    pub swaps: u64,
    /// Array slots overwritten by merge sort
    pub writes: u64,
    pub elapsed: Duration,
}

/// Result of a completed sort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortReport {
    pub algorithm: SortAlgorithm,
    pub sorted: Vec<f64>,
    pub stats: SortStats,
}

/// Checkpointed sorting over a sequence of bars.
#[derive(Debug)]
pub struct SortEngine {
    values: Vec<f64>,
    algorithm: SortAlgorithm,
    control: RunControl,
    pacer: Pacer,
    sinks: Sinks,
    sorted: Vec<bool>,
    stats: SortStats,
}

fn check_values(values: &[f64]) -> Result<()> {
    if values.len() > MAX_SEQUENCE_LEN {
        return Err(ParseError::TooMany {
            max: MAX_SEQUENCE_LEN,
            got: values.len(),
        }
        .into());
    }
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(ParseError::NotANumber(bad.to_string()).into());
    }
    Ok(())
}

impl SortEngine {
    pub fn new(control: RunControl, sinks: Sinks) -> Self {
        Self {
            values: Vec::new(),
            algorithm: SortAlgorithm::default(),
            control,
            pacer: Pacer::new(PacerConfig::sorting()),
            sinks,
            sorted: Vec::new(),
            stats: SortStats::default(),
        }
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: SortAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn algorithm(&self) -> SortAlgorithm {
        self.algorithm
    }

    pub fn stats(&self) -> SortStats {
        self.stats
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Replace the bars. Rejected while a run is active.
    pub fn set_values(&mut self, values: Vec<f64>) -> Result<()> {
        if self.control.is_active() {
            return Err(Error::Busy);
        }
        check_values(&values)?;
        self.values = values;
        self.sorted = vec![false; self.values.len()];
        self.stats = SortStats::default();
        self.render_plain();
        Ok(())
    }

    /// Fill with a random array.
    pub fn generate(&mut self, config: &ArrayConfig) -> Result<()> {
        self.set_values(generate_sequence(config))
    }

    /// Parse and load a user-typed array (at least two numbers).
    pub fn load_custom(&mut self, text: &str) -> Result<()> {
        let values = parse_custom_sequence(text)?;
        self.set_values(values)
    }

    pub fn set_algorithm(&mut self, algorithm: SortAlgorithm) -> Result<()> {
        if self.control.is_active() {
            return Err(Error::Busy);
        }
        self.algorithm = algorithm;
        Ok(())
    }

    /// Drop sorted marks and counters, then redraw the bars as they are.
    pub fn clear(&mut self) {
        self.sorted = vec![false; self.values.len()];
        self.stats = SortStats::default();
        self.render_plain();
    }

    /// Sort the bars, rendering and pacing at every checkpoint.
    pub async fn start(&mut self) -> Outcome<SortReport> {
        if self.values.is_empty() {
            return Outcome::Rejected;
        }
        let Some(token) = self.control.begin() else {
            return Outcome::Rejected;
        };

        info!(algorithm = %self.algorithm, len = self.values.len(), "sort started");
        self.sorted = vec![false; self.values.len()];
        self.stats = SortStats::default();
        let started = Instant::now();

        let result = self.run(&token).await;
        self.stats.elapsed = started.elapsed();

        match result {
            Ok(()) => {
                self.sorted.fill(true);
                let frame = self
                    .frame(Vec::new())
                    .with_caption(format!("{} complete", self.algorithm));
                self.sinks.render(&frame);
                self.sinks.status(&format!(
                    "{} finished: {} comparisons, {} swaps",
                    self.algorithm, self.stats.comparisons, self.stats.swaps
                ));
                self.control.finish(&token);
                info!(
                    algorithm = %self.algorithm,
                    comparisons = self.stats.comparisons,
                    swaps = self.stats.swaps,
                    elapsed_ms = self.stats.elapsed.as_millis() as u64,
                    "sort finished"
                );
                Outcome::Completed(SortReport {
                    algorithm: self.algorithm,
                    sorted: self.values.clone(),
                    stats: self.stats,
                })
            }
            Err(e) => {
                debug!(algorithm = %self.algorithm, error = %e, "sort stopped");
                self.sorted.fill(false);
                Outcome::Cancelled
            }
        }
    }

    async fn run(&mut self, token: &RunToken) -> Result<()> {
        let last = self.values.len() - 1;
        match self.algorithm {
            SortAlgorithm::Bubble => self.bubble_sort(token).await,
            SortAlgorithm::Quick => self.quick_sort(token, 0, last).await,
            SortAlgorithm::Merge => self.merge_sort(token, 0, last).await,
            SortAlgorithm::Heap => self.heap_sort(token).await,
        }
    }

    fn frame(&self, mut highlights: Vec<Highlight>) -> Frame {
        highlights.extend(
            self.sorted
                .iter()
                .enumerate()
                .filter(|(_, done)| **done)
                .map(|(i, _)| Highlight::at(i, HighlightKind::Sorted)),
        );
        Frame::new(Scene::Bars {
            values: self.values.clone(),
        })
        .with_highlights(highlights)
    }

    fn render_plain(&self) {
        self.sinks.render(&self.frame(Vec::new()));
    }

    async fn checkpoint(&self, token: &RunToken, highlights: Vec<Highlight>, caption: String) -> Result<()> {
        self.sinks.render(&self.frame(highlights).with_caption(caption));
        self.pacer.pace(token).await
    }

    /// Compare `i` with `j`; true when `values[i] > values[j]`.
    async fn compare(&mut self, token: &RunToken, i: usize, j: usize) -> Result<bool> {
        self.stats.comparisons += 1;
        let (a, b) = (self.values[i], self.values[j]);
        let caption = format!("Comparing {} and {}", format_value(a), format_value(b));
        self.checkpoint(
            token,
            vec![
                Highlight::at(i, HighlightKind::Comparing),
                Highlight::at(j, HighlightKind::Comparing),
            ],
            caption,
        )
        .await?;
        Ok(a > b)
    }

    async fn swap(&mut self, token: &RunToken, i: usize, j: usize) -> Result<()> {
        self.stats.swaps += 1;
        self.values.swap(i, j);
        let caption = format!(
            "Swapped {} and {}",
            format_value(self.values[j]),
            format_value(self.values[i])
        );
        self.checkpoint(
            token,
            vec![
                Highlight::at(i, HighlightKind::Swapping),
                Highlight::at(j, HighlightKind::Swapping),
            ],
            caption,
        )
        .await
    }

    async fn write(&mut self, token: &RunToken, index: usize, value: f64) -> Result<()> {
        self.stats.writes += 1;
        self.values[index] = value;
        let caption = format!("Placed {} at index {index}", format_value(value));
        self.checkpoint(token, vec![Highlight::at(index, HighlightKind::Swapping)], caption)
            .await
    }

    async fn bubble_sort(&mut self, token: &RunToken) -> Result<()> {
        let n = self.values.len();
        for i in 0..n.saturating_sub(1) {
            for j in 0..n - i - 1 {
                if self.compare(token, j, j + 1).await? {
                    self.swap(token, j, j + 1).await?;
                }
            }
            self.sorted[n - 1 - i] = true;
        }
        self.sorted[0] = true;
        Ok(())
    }

    fn quick_sort<'a>(&'a mut self, token: &'a RunToken, low: usize, high: usize) -> BoxFuture<'a, Result<()>> {
        async move {
            if low >= high {
                if low == high {
                    self.sorted[low] = true;
                }
                return Ok(());
            }
            let pivot = self.partition(token, low, high).await?;
            self.sorted[pivot] = true;
            if pivot > low {
                self.quick_sort(token, low, pivot - 1).await?;
            }
            self.quick_sort(token, pivot + 1, high).await
        }
        .boxed()
    }

    /// Lomuto partition around `values[high]`.
    async fn partition(&mut self, token: &RunToken, low: usize, high: usize) -> Result<usize> {
        let pivot = self.values[high];
        let mut store = low;
        for j in low..high {
            self.stats.comparisons += 1;
            let caption = format!(
                "Comparing {} with pivot {}",
                format_value(self.values[j]),
                format_value(pivot)
            );
            self.checkpoint(
                token,
                vec![
                    Highlight::at(j, HighlightKind::Comparing),
                    Highlight::at(high, HighlightKind::Pivot),
                ],
                caption,
            )
            .await?;
            if self.values[j] < pivot {
                self.swap(token, store, j).await?;
                store += 1;
            }
        }
        self.swap(token, store, high).await?;
        Ok(store)
    }

    fn merge_sort<'a>(&'a mut self, token: &'a RunToken, left: usize, right: usize) -> BoxFuture<'a, Result<()>> {
        async move {
            if left >= right {
                return Ok(());
            }
            let mid = left + (right - left) / 2;
            self.merge_sort(token, left, mid).await?;
            self.merge_sort(token, mid + 1, right).await?;
            self.merge(token, left, mid, right).await
        }
        .boxed()
    }

    /// Two-pointer merge of `left..=mid` and `mid+1..=right`; ties take the left run.
    async fn merge(&mut self, token: &RunToken, left: usize, mid: usize, right: usize) -> Result<()> {
        let left_run = self.values[left..=mid].to_vec();
        let right_run = self.values[mid + 1..=right].to_vec();
        let (mut i, mut j, mut k) = (0, 0, left);

        while i < left_run.len() && j < right_run.len() {
            self.stats.comparisons += 1;
            let caption = format!(
                "Comparing {} and {}",
                format_value(left_run[i]),
                format_value(right_run[j])
            );
            self.checkpoint(
                token,
                vec![
                    Highlight::at(left + i, HighlightKind::Comparing),
                    Highlight::at(mid + 1 + j, HighlightKind::Comparing),
                ],
                caption,
            )
            .await?;
            let value = if left_run[i] <= right_run[j] {
                i += 1;
                left_run[i - 1]
            } else {
                j += 1;
                right_run[j - 1]
            };
            self.write(token, k, value).await?;
            k += 1;
        }
        for &value in left_run[i..].iter().chain(&right_run[j..]) {
            self.write(token, k, value).await?;
            k += 1;
        }
        Ok(())
    }

    async fn heap_sort(&mut self, token: &RunToken) -> Result<()> {
        let n = self.values.len();
        for i in (0..n / 2).rev() {
            self.heapify(token, n, i).await?;
        }
        for end in (1..n).rev() {
            self.swap(token, 0, end).await?;
            self.sorted[end] = true;
            self.heapify(token, end, 0).await?;
        }
        self.sorted[0] = true;
        Ok(())
    }

    /// Sift `root` down within the first `size` elements.
    fn heapify<'a>(&'a mut self, token: &'a RunToken, size: usize, root: usize) -> BoxFuture<'a, Result<()>> {
        async move {
            let mut largest = root;
            for child in [2 * root + 1, 2 * root + 2] {
                if child < size && self.compare(token, child, largest).await? {
                    largest = child;
                }
            }
            if largest != root {
                self.swap(token, root, largest).await?;
                self.heapify(token, size, largest).await?;
            }
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::control::RunState;
    use crate::sink::RecordingSink;
    use algoscope_core::{count_inversions, is_sorted};
    use proptest::prelude::*;

    fn engine(values: &[f64], algorithm: SortAlgorithm) -> (SortEngine, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let mut engine = SortEngine::new(RunControl::new(), Sinks::recording(sink.clone()))
            .with_pacer(Pacer::immediate())
            .with_algorithm(algorithm);
        engine.set_values(values.to_vec()).unwrap();
        sink.clear();
        (engine, sink)
    }

    fn sorted_copy(values: &[f64]) -> Vec<f64> {
        let mut expected = values.to_vec();
        expected.sort_by(|a, b| a.total_cmp(b));
        expected
    }

    #[tokio::test]
    async fn every_algorithm_sorts() {
        let input = [5.0, 3.0, 8.0, 1.0, 9.0, 2.0, 2.0, 7.5];
        for algorithm in SortAlgorithm::ALL {
            let (mut engine, _) = engine(&input, algorithm);
            let report = engine.start().await.completed().unwrap();
            assert_eq!(report.sorted, sorted_copy(&input), "{algorithm}");
            assert_eq!(engine.control().state(), RunState::Done);
        }
    }

    #[tokio::test]
    async fn bubble_swaps_equal_inversions() {
        let input = [4.0, 3.0, 2.0, 1.0, 5.0];
        let (mut engine, _) = engine(&input, SortAlgorithm::Bubble);
        let report = engine.start().await.completed().unwrap();
        assert_eq!(report.stats.swaps, count_inversions(&input) as u64);
        assert_eq!(report.stats.comparisons, 10);
    }

    #[tokio::test]
    async fn final_frame_marks_everything_sorted() {
        let (mut engine, sink) = engine(&[3.0, 1.0, 2.0], SortAlgorithm::Heap);
        engine.start().await;
        let last = sink.last_frame().unwrap();
        assert_eq!(last.indices(HighlightKind::Sorted), vec![0, 1, 2]);
        assert!(sink.last_message().unwrap().contains("Heap Sort finished"));
    }

    #[tokio::test]
    async fn clear_redraws_without_sorted_marks() {
        let (mut engine, sink) = engine(&[3.0, 1.0, 2.0], SortAlgorithm::Quick);
        engine.start().await;
        assert!(engine.stats().comparisons > 0);

        engine.clear();
        let last = sink.last_frame().unwrap();
        assert!(last.highlights.is_empty());
        assert_eq!(last.caption, None);
        assert_eq!(engine.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(engine.stats().comparisons, 0);
    }

    #[tokio::test]
    async fn comparisons_highlight_two_single_indices() {
        let (mut engine, sink) = engine(&[2.0, 1.0], SortAlgorithm::Bubble);
        engine.start().await;
        let first = &sink.frames()[0];
        assert_eq!(first.indices(HighlightKind::Comparing), vec![0, 1]);
        assert_eq!(first.caption.as_deref(), Some("Comparing 2 and 1"));
    }

    #[tokio::test]
    async fn empty_input_is_rejected() {
        let (mut engine, sink) = engine(&[], SortAlgorithm::Quick);
        assert!(engine.start().await.is_rejected());
        assert_eq!(sink.frame_count(), 0);
    }

    #[tokio::test]
    async fn single_element_completes() {
        let (mut engine, _) = engine(&[42.0], SortAlgorithm::Merge);
        assert_eq!(engine.start().await.completed().unwrap().sorted, vec![42.0]);
    }

    #[test]
    fn values_are_bounded_and_finite() {
        let (mut engine, _) = engine(&[1.0], SortAlgorithm::Bubble);
        assert!(engine.set_values(vec![0.0; MAX_SEQUENCE_LEN + 1]).is_err());
        assert!(engine.set_values(vec![1.0, f64::NAN]).is_err());
        assert!(engine.load_custom("9, 4 x 7").is_ok());
        assert_eq!(engine.values(), &[9.0, 4.0, 7.0]);
        assert!(engine.load_custom("9").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn mutation_is_refused_mid_run() {
        let control = RunControl::new();
        let mut engine = SortEngine::new(control.clone(), Sinks::recording(Arc::new(RecordingSink::new())));
        engine.set_values(vec![3.0, 2.0, 1.0]).unwrap();
        let _token = control.begin().unwrap();
        assert_eq!(engine.set_values(vec![1.0]), Err(Error::Busy));
        assert_eq!(engine.set_algorithm(SortAlgorithm::Heap), Err(Error::Busy));
        assert!(engine.start().await.is_rejected());
    }

    proptest! {
        #[test]
        fn sorts_any_input(values in proptest::collection::vec(-1000i32..1000, 1..40), algo in 0usize..4) {
            let input: Vec<f64> = values.into_iter().map(f64::from).collect();
            let algorithm = SortAlgorithm::ALL[algo];
            let (mut engine, _) = engine(&input, algorithm);
            let report = tokio_test::block_on(engine.start()).completed().unwrap();
            prop_assert!(is_sorted(&report.sorted));
            prop_assert_eq!(report.sorted, sorted_copy(&input));
            if algorithm == SortAlgorithm::Bubble {
                prop_assert_eq!(report.stats.swaps, count_inversions(&input) as u64);
            }
        }
    }
}
