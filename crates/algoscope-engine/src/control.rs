//! Run control: the shared run/pause/reset state observed by every checkpoint.
//!
//! A [`RunControl`] is a cheap handle (`Arc` inside). Cloning it lets one
//! task await an engine while another pauses, resumes or resets it.
//!
//! Every run captures the control's generation in a [`RunToken`]. `reset`
//! bumps the generation, so a run holding an older token sees itself
//! cancelled at its next checkpoint.

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::pacer::Speed;

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    /// Nothing has run since the last reset
    #[default]
    Idle,
    /// A run is advancing through checkpoints
    Running,
    /// A run is suspended in its pace loop
    Paused,
    /// The last run completed normally
    Done,
}

impl RunState {
    /// Running or Paused.
    pub fn is_active(self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }

    fn to_u8(self) -> u8 {
        match self {
            RunState::Idle => 0,
            RunState::Running => 1,
            RunState::Paused => 2,
            RunState::Done => 3,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => RunState::Running,
            2 => RunState::Paused,
            3 => RunState::Done,
            _ => RunState::Idle,
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: AtomicU8,
    generation: AtomicU64,
    speed: AtomicU8,
}

/// Shared handle to the run state machine.
#[derive(Debug, Clone)]
pub struct RunControl {
    inner: Arc<Inner>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    pub fn new() -> Self {
        Self::with_speed(Speed::default())
    }

    pub fn with_speed(speed: Speed) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: AtomicU8::new(RunState::Idle.to_u8()),
                generation: AtomicU64::new(0),
                speed: AtomicU8::new(speed.get()),
            }),
        }
    }

    pub fn state(&self) -> RunState {
        RunState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    pub fn is_paused(&self) -> bool {
        self.state() == RunState::Paused
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    pub fn speed(&self) -> Speed {
        Speed::new(self.inner.speed.load(Ordering::Relaxed))
    }

    /// Change the speed; takes effect at the next checkpoint.
    pub fn set_speed(&self, speed: Speed) {
        self.inner.speed.store(speed.get(), Ordering::Relaxed);
    }

    fn transition(&self, from: &[RunState], to: RunState) -> bool {
        self.inner
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| {
                from.contains(&RunState::from_u8(raw)).then_some(to.to_u8())
            })
            .is_ok()
    }

    /// Claim the control for a new run.
    ///
    /// Returns `None` if a run is already active; a second start is never
    /// queued.
    pub fn begin(&self) -> Option<RunToken> {
        if !self.transition(&[RunState::Idle, RunState::Done], RunState::Running) {
            return None;
        }
        let generation = self.generation();
        debug!(generation, "run started");
        Some(RunToken {
            control: self.clone(),
            generation,
        })
    }

    /// Suspend the active run at its next pace.
    pub fn pause(&self) -> bool {
        self.transition(&[RunState::Running], RunState::Paused)
    }

    pub fn resume(&self) -> bool {
        self.transition(&[RunState::Paused], RunState::Running)
    }

    /// Pause if running, resume if paused. Returns the new state.
    pub fn toggle_pause(&self) -> RunState {
        if self.pause() || self.resume() {
            debug!(state = ?self.state(), "pause toggled");
        }
        self.state()
    }

    /// Cancel any run in flight and return to Idle.
    pub fn reset(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.inner.state.store(RunState::Idle.to_u8(), Ordering::Release);
        debug!(generation, "run control reset");
    }

    /// Mark the run owning `token` as completed. Stale tokens are ignored.
    pub fn finish(&self, token: &RunToken) {
        if token.is_cancelled() {
            return;
        }
        self.transition(&[RunState::Running, RunState::Paused], RunState::Done);
    }
}

/// Proof of ownership of one run, tied to the generation it started in.
#[derive(Debug, Clone)]
pub struct RunToken {
    control: RunControl,
    generation: u64,
}

impl RunToken {
    /// Token for work that is not driven by a session, e.g. step recording.
    pub fn detached() -> Self {
        let control = RunControl::new();
        Self {
            generation: control.generation(),
            control,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    /// Whether the control has been reset since this run began.
    pub fn is_cancelled(&self) -> bool {
        self.control.generation() != self.generation
    }

    pub fn is_paused(&self) -> bool {
        self.control.is_paused()
    }

    /// `Err(Cancelled)` once the run is stale.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// How an engine run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Ran to the end
    Completed(T),
    /// Not started: a run was already active or there was nothing to do
    Rejected,
    /// Reset or superseded mid-run
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Rejected => Outcome::Rejected,
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}
