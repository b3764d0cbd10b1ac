//! Algoscope Engine - Checkpointed Algorithm Execution
//!
//! Algorithms here are instrumented to stop at every meaningful step. At each
//! stop (a *checkpoint*) the engine hands a [`Frame`] to a [`RenderSink`],
//! then suspends in [`Pacer::pace`] for a speed-dependent delay that can be
//! paused, resumed and cancelled.
//!
//! # Overview
//!
//! ## Run control
//!
//! A [`RunControl`] is a cheap, cloneable handle shared by every engine of a
//! [`Session`]. `begin()` hands out a [`RunToken`] stamped with the current
//! generation; `reset()` bumps the generation so every in-flight run sees a
//! stale token at its next checkpoint and unwinds with
//! [`Outcome::Cancelled`].
//!
//! - **One run at a time**: a second `start()` while one is active is
//!   [`Outcome::Rejected`], never queued
//! - **Pause is a flag**: the pacer polls it, nothing is torn down
//! - **Reset always wins**: paused or mid-delay, the run stops at the next poll
//!
//! ## Engines
//!
//! - [`SortEngine`]: bubble, quick, merge and heap sort over bars
//! - [`TreeEngine`]: in/pre/post/level-order over a BST or AVL tree
//! - [`GraphEngine`]: BFS, DFS and Dijkstra over a weighted graph
//! - [`StructureMutator`]: animated stack/queue/array/deque/circular queue ops
//! - [`Comparison`]: two sorting engines raced with `tokio::join!`
//!
//! ## Step records
//!
//! [`record_sort_steps`] runs a sort with an immediate pacer and captures
//! every frame as a [`StepRecord`], for replay without re-running.
//!
//! # Example
//!
//! ```rust,ignore
//! use algoscope_engine::{Session, Sinks, Mode};
//!
//! let mut session = Session::new(Sinks::tracing());
//! session.sorting_mut().load_custom("5 3 8 1")?;
//! let control = session.control().clone();
//!
//! // pause/resume/reset from anywhere
//! tokio::spawn(async move { control.pause(); });
//!
//! let outcome = session.start().await;
//! ```

pub mod comparison;
pub mod control;
pub mod error;
pub mod graphs;
pub mod pacer;
pub mod session;
pub mod sink;
pub mod sorting;
pub mod steps;
pub mod structures;
pub mod trees;

pub use comparison::{Comparison, ComparisonReport, Side};
pub use control::{Outcome, RunControl, RunState, RunToken};
pub use error::{Error, Result};
pub use graphs::{GraphAlgorithm, GraphEngine, GraphReport};
pub use pacer::{DelayCurve, Pacer, PacerConfig, Speed};
pub use session::{Mode, OperationStats, RunSummary, Session, SessionState, StructureOp, StructureResult};
pub use sink::{
    Frame, Highlight, HighlightKind, RecordingSink, RenderSink, Scene, Sinks, StatusSink, StructureKind, Target,
    TracingSink, TreeNodeView,
};
pub use sorting::{SortEngine, SortReport, SortStats};
pub use steps::{
    fetch_steps_or_local, record_sort_steps, record_sort_steps_blocking, LocalStepSource, StepRecord, StepRecorder,
    StepSource,
};
pub use structures::StructureMutator;
pub use trees::TreeEngine;

// Re-export the data model so callers need only one dependency
pub use algoscope_core as model;
