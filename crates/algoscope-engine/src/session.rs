//! Session/mode controller.
//!
//! A session owns one [`RunControl`] and hands clones of it to every engine,
//! so exactly one visualization can be in flight and pause/reset reach
//! whichever one is running.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use algoscope_core::ParseError;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::control::{Outcome, RunControl, RunState};
use crate::error::{Error, Result};
use crate::graphs::{GraphEngine, GraphReport};
use crate::pacer::{Pacer, Speed};
use crate::sink::{Sinks, StructureKind};
use crate::sorting::{SortEngine, SortReport};
use crate::structures::StructureMutator;
use crate::trees::TreeEngine;

/// The visualization currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Sorting,
    Trees,
    Graphs,
    Stack,
    Queue,
    Array,
    Deque,
    CircularQueue,
}

impl Mode {
    pub const ALL: [Mode; 8] = [
        Mode::Sorting,
        Mode::Trees,
        Mode::Graphs,
        Mode::Stack,
        Mode::Queue,
        Mode::Array,
        Mode::Deque,
        Mode::CircularQueue,
    ];

    /// The linear structure this mode shows, if any.
    pub fn structure(self) -> Option<StructureKind> {
        match self {
            Mode::Stack => Some(StructureKind::Stack),
            Mode::Queue => Some(StructureKind::Queue),
            Mode::Array => Some(StructureKind::Array),
            Mode::Deque => Some(StructureKind::Deque),
            Mode::CircularQueue => Some(StructureKind::CircularQueue),
            _ => None,
        }
    }

    fn key(self) -> &'static str {
        match self {
            Mode::Sorting => "sorting",
            Mode::Trees => "trees",
            Mode::Graphs => "graphs",
            Mode::Stack => "stack",
            Mode::Queue => "queue",
            Mode::Array => "array",
            Mode::Deque => "deque",
            Mode::CircularQueue => "circular_queue",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Mode::ALL
            .into_iter()
            .find(|m| m.key() == wanted)
            .ok_or_else(|| ParseError::UnknownAlgorithm(s.to_string()))
    }
}

/// Session-level view of the run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "mode", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running(Mode),
    Paused(Mode),
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunSummary {
    Sort(SortReport),
    Traversal { order: Vec<i64> },
    Search(GraphReport),
}

/// One structure operation, dispatched to the active structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureOp {
    Push(String),
    Pop,
    Peek,
    SearchStack(String),
    Enqueue(String),
    Dequeue,
    InsertAt { value: String, index: String },
    DeleteAt(String),
    SearchArray(String),
    InsertFront(String),
    InsertRear(String),
    DeleteFront,
    DeleteRear,
    CircularEnqueue(String),
    CircularDequeue,
    SetCapacity(String),
    /// Fill the active structure with random values
    RandomFill,
    /// Empty the active structure
    Reset,
}

impl StructureOp {
    /// Structure the operation belongs to; `None` works on any.
    pub fn structure(&self) -> Option<StructureKind> {
        use StructureOp::*;
        match self {
            Push(_) | Pop | Peek | SearchStack(_) => Some(StructureKind::Stack),
            Enqueue(_) | Dequeue => Some(StructureKind::Queue),
            InsertAt { .. } | DeleteAt(_) | SearchArray(_) => Some(StructureKind::Array),
            InsertFront(_) | InsertRear(_) | DeleteFront | DeleteRear => Some(StructureKind::Deque),
            CircularEnqueue(_) | CircularDequeue | SetCapacity(_) => Some(StructureKind::CircularQueue),
            RandomFill | Reset => None,
        }
    }
}

/// What a structure operation returned.
#[derive(Debug, Clone, PartialEq)]
pub enum StructureResult {
    Done,
    Value(f64),
    /// Stack search: distance from the top
    Depth(Option<usize>),
    /// Array search: every matching index
    Positions(Vec<usize>),
    /// Circular enqueue: slot written
    Slot(usize),
    /// Random fill: element count
    Count(usize),
}

/// Counts of completed operations and the time spent in them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub sorts: u64,
    pub traversals: u64,
    pub graph_searches: u64,
    pub structure_ops: u64,
    pub cancelled: u64,
    pub elapsed: Duration,
}

impl OperationStats {
    pub fn total(&self) -> u64 {
        self.sorts + self.traversals + self.graph_searches + self.structure_ops
    }
}

/// One user's visualization session.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    control: RunControl,
    sinks: Sinks,
    sorting: SortEngine,
    trees: TreeEngine,
    graphs: GraphEngine,
    structures: StructureMutator,
    stats: OperationStats,
}

impl Session {
    pub fn new(sinks: Sinks) -> Self {
        Self::with_control(RunControl::new(), sinks)
    }

    pub fn with_control(control: RunControl, sinks: Sinks) -> Self {
        Self {
            mode: Mode::default(),
            sorting: SortEngine::new(control.clone(), sinks.clone()),
            trees: TreeEngine::new(control.clone(), sinks.clone()),
            graphs: GraphEngine::new(control.clone(), sinks.clone()),
            structures: StructureMutator::new(control.clone(), sinks.clone()),
            control,
            sinks,
            stats: OperationStats::default(),
        }
    }

    /// Use one pacer for every engine.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.sorting = self.sorting.with_pacer(pacer);
        self.trees = self.trees.with_pacer(pacer);
        self.graphs = self.graphs.with_pacer(pacer);
        self.structures = self.structures.with_pacer(pacer);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// A handle for pausing or resetting from another task.
    pub fn control(&self) -> &RunControl {
        &self.control
    }

    pub fn stats(&self) -> OperationStats {
        self.stats
    }

    pub fn state(&self) -> SessionState {
        match self.control.state() {
            RunState::Running => SessionState::Running(self.mode),
            RunState::Paused => SessionState::Paused(self.mode),
            RunState::Idle | RunState::Done => SessionState::Idle,
        }
    }

    pub fn sorting(&self) -> &SortEngine {
        &self.sorting
    }

    pub fn sorting_mut(&mut self) -> &mut SortEngine {
        &mut self.sorting
    }

    pub fn trees(&self) -> &TreeEngine {
        &self.trees
    }

    pub fn trees_mut(&mut self) -> &mut TreeEngine {
        &mut self.trees
    }

    pub fn graphs(&self) -> &GraphEngine {
        &self.graphs
    }

    pub fn graphs_mut(&mut self) -> &mut GraphEngine {
        &mut self.graphs
    }

    pub fn structures(&self) -> &StructureMutator {
        &self.structures
    }

    /// Change the visible visualization. Refused while a run is active.
    pub fn switch_mode(&mut self, mode: Mode) -> Result<()> {
        if self.control.is_active() {
            return Err(Error::Busy);
        }
        if mode != self.mode {
            info!(from = %self.mode, to = %mode, "mode switched");
            self.mode = mode;
        }
        if let Some(kind) = mode.structure() {
            self.structures.render(kind);
        }
        Ok(())
    }

    pub fn set_speed(&self, speed: Speed) {
        self.control.set_speed(speed);
    }

    /// Pause a running animation or resume a paused one.
    pub fn toggle_pause(&self) -> RunState {
        let state = self.control.toggle_pause();
        match state {
            RunState::Paused => self.sinks.status("Paused"),
            RunState::Running => self.sinks.status("Resumed"),
            _ => {}
        }
        state
    }

    /// Abort any run and clear the active engine's progress.
    pub fn reset(&mut self) {
        self.control.reset();
        match self.mode {
            Mode::Sorting => self.sorting.clear(),
            Mode::Trees => self.trees.clear(),
            Mode::Graphs => self.graphs.clear(),
            _ => {}
        }
        self.sinks.status("Reset");
    }

    fn count(&mut self, started: Instant, outcome_cancelled: bool) {
        self.stats.elapsed += started.elapsed();
        if outcome_cancelled {
            self.stats.cancelled += 1;
        }
    }

    /// Start the active mode's algorithm.
    ///
    /// Structure modes have nothing to start and are rejected.
    pub async fn start(&mut self) -> Outcome<RunSummary> {
        let started = Instant::now();
        let outcome = match self.mode {
            Mode::Sorting => self.sorting.start().await.map(RunSummary::Sort),
            Mode::Trees => self
                .trees
                .start()
                .await
                .map(|order| RunSummary::Traversal { order }),
            Mode::Graphs => self.graphs.start().await.map(RunSummary::Search),
            _ => Outcome::Rejected,
        };
        if outcome.is_rejected() {
            debug!(mode = %self.mode, "start ignored");
            return outcome;
        }
        self.count(started, outcome.is_cancelled());
        if outcome.is_completed() {
            match self.mode {
                Mode::Sorting => self.stats.sorts += 1,
                Mode::Trees => self.stats.traversals += 1,
                _ => self.stats.graph_searches += 1,
            }
        }
        outcome
    }

    /// Run one structure operation against the active structure.
    pub async fn apply(&mut self, op: StructureOp) -> Result<StructureResult> {
        let Some(active) = self.mode.structure() else {
            return Err(Error::WrongMode(self.mode.to_string()));
        };
        if op.structure().is_some_and(|kind| kind != active) {
            return Err(Error::WrongMode(self.mode.to_string()));
        }

        let started = Instant::now();
        let m = &mut self.structures;
        let result = match op {
            StructureOp::Push(v) => m.push(&v).await.map(|()| StructureResult::Done),
            StructureOp::Pop => m.pop().await.map(StructureResult::Value),
            StructureOp::Peek => m.peek().await.map(StructureResult::Value),
            StructureOp::SearchStack(v) => m.search_stack(&v).await.map(StructureResult::Depth),
            StructureOp::Enqueue(v) => m.enqueue(&v).await.map(|()| StructureResult::Done),
            StructureOp::Dequeue => m.dequeue().await.map(StructureResult::Value),
            StructureOp::InsertAt { value, index } => {
                m.insert_at(&value, &index).await.map(|()| StructureResult::Done)
            }
            StructureOp::DeleteAt(i) => m.delete_at(&i).await.map(StructureResult::Value),
            StructureOp::SearchArray(v) => m.search_array(&v).await.map(StructureResult::Positions),
            StructureOp::InsertFront(v) => m.insert_front(&v).await.map(|()| StructureResult::Done),
            StructureOp::InsertRear(v) => m.insert_rear(&v).await.map(|()| StructureResult::Done),
            StructureOp::DeleteFront => m.delete_front().await.map(StructureResult::Value),
            StructureOp::DeleteRear => m.delete_rear().await.map(StructureResult::Value),
            StructureOp::CircularEnqueue(v) => m.circular_enqueue(&v).await.map(StructureResult::Slot),
            StructureOp::CircularDequeue => m.circular_dequeue().await.map(StructureResult::Value),
            StructureOp::SetCapacity(c) => m.set_capacity(&c).map(|()| StructureResult::Done),
            StructureOp::RandomFill => m.random_fill(active).map(StructureResult::Count),
            StructureOp::Reset => m.reset(active).map(|()| StructureResult::Done),
        };

        match &result {
            Ok(_) => {
                self.stats.structure_ops += 1;
                self.count(started, false);
            }
            Err(Error::Cancelled) => self.count(started, true),
            Err(_) => {}
        }
        result
    }
}
