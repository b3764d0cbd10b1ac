//! Side-by-side sorting comparison.
//!
//! Two sorting engines get the same input and run concurrently on the same
//! task via `tokio::join!`. Each has its own run control, so pausing or
//! resetting one side leaves the other alone.

use algoscope_core::{generate_sequence, parse_custom_sequence, ArrayConfig, SortAlgorithm};
use serde::Serialize;
use tracing::info;

use crate::control::{Outcome, RunControl};
use crate::error::{Error, Result};
use crate::pacer::Pacer;
use crate::sink::Sinks;
use crate::sorting::{SortEngine, SortReport, SortStats};

/// Which half of the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Both outcomes of one comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub left: Outcome<SortReport>,
    pub right: Outcome<SortReport>,
}

fn operations(stats: &SortStats) -> u64 {
    stats.comparisons + stats.swaps + stats.writes
}

impl ComparisonReport {
    /// The side that finished with fewer comparisons, swaps and writes.
    /// `None` on a tie or if either side did not complete.
    pub fn fewer_operations(&self) -> Option<Side> {
        let (Outcome::Completed(left), Outcome::Completed(right)) = (&self.left, &self.right) else {
            return None;
        };
        let (l, r) = (operations(&left.stats), operations(&right.stats));
        match l.cmp(&r) {
            std::cmp::Ordering::Less => Some(Side::Left),
            std::cmp::Ordering::Greater => Some(Side::Right),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Two sorting engines racing over the same input.
#[derive(Debug)]
pub struct Comparison {
    left: SortEngine,
    right: SortEngine,
}

impl Comparison {
    pub fn new(left: Sinks, right: Sinks) -> Self {
        Self {
            left: SortEngine::new(RunControl::new(), left),
            right: SortEngine::new(RunControl::new(), right).with_algorithm(SortAlgorithm::Quick),
        }
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.left = self.left.with_pacer(pacer);
        self.right = self.right.with_pacer(pacer);
        self
    }

    pub fn engine(&self, side: Side) -> &SortEngine {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn control(&self, side: Side) -> &RunControl {
        self.engine(side).control()
    }

    fn is_active(&self) -> bool {
        self.left.control().is_active() || self.right.control().is_active()
    }

    pub fn set_algorithms(&mut self, left: SortAlgorithm, right: SortAlgorithm) -> Result<()> {
        if self.is_active() {
            return Err(Error::Busy);
        }
        self.left.set_algorithm(left)?;
        self.right.set_algorithm(right)
    }

    /// Give both sides the same values.
    pub fn load(&mut self, values: Vec<f64>) -> Result<()> {
        if self.is_active() {
            return Err(Error::Busy);
        }
        self.left.set_values(values.clone())?;
        self.right.set_values(values)
    }

    pub fn generate(&mut self, config: &ArrayConfig) -> Result<()> {
        self.load(generate_sequence(config))
    }

    pub fn load_custom(&mut self, text: &str) -> Result<()> {
        self.load(parse_custom_sequence(text)?)
    }

    pub fn pause(&self) {
        self.left.control().pause();
        self.right.control().pause();
    }

    pub fn resume(&self) {
        self.left.control().resume();
        self.right.control().resume();
    }

    /// Cancel both sides and redraw their bars unmarked.
    pub fn reset(&mut self) {
        self.left.control().reset();
        self.right.control().reset();
        self.left.clear();
        self.right.clear();
    }

    /// Run both sorts concurrently and wait for both.
    pub async fn start(&mut self) -> ComparisonReport {
        info!(
            left = %self.left.algorithm(),
            right = %self.right.algorithm(),
            len = self.left.values().len(),
            "comparison started"
        );
        let (left, right) = tokio::join!(self.left.start(), self.right.start());
        let report = ComparisonReport { left, right };
        info!(fewer_operations = ?report.fewer_operations(), "comparison finished");
        report
    }
}
