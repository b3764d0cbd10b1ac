//! Playback controls over a recorded sorting timeline.
//!
//! The timeline is immutable once loaded. Every control only moves the
//! cursor: `current_frame` counts the steps already shown, so `0` means
//! nothing has been shown yet and `total_frames` means the last step is on
//! screen.

use algoscope_core::SortAlgorithm;
use algoscope_engine::StepRecord;
use serde::{Deserialize, Serialize};

/// Playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    /// Pause playback
    Paused,
    /// 0.25x speed
    QuarterSpeed,
    /// 0.5x speed
    HalfSpeed,
    /// Normal speed (1x)
    Normal,
    /// 2x speed
    Double,
    /// 4x speed
    Quadruple,
    /// 10x speed
    TenX,
    /// As fast as the ticker runs
    Maximum,
}

impl PlaybackSpeed {
    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::Paused => 0.0,
            PlaybackSpeed::QuarterSpeed => 0.25,
            PlaybackSpeed::HalfSpeed => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
            PlaybackSpeed::Quadruple => 4.0,
            PlaybackSpeed::TenX => 10.0,
            PlaybackSpeed::Maximum => f64::INFINITY,
        }
    }

    /// Milliseconds per step at this speed; `None` while paused.
    pub fn ms_per_frame(&self, base_ms: u64) -> Option<u64> {
        match self {
            PlaybackSpeed::Paused => None,
            PlaybackSpeed::Maximum => Some(0),
            speed => Some((base_ms as f64 / speed.multiplier()) as u64),
        }
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// At the beginning, not advancing
    Stopped,
    /// Advancing on every tick
    Playing,
    Paused,
    /// Last step is on screen
    Finished,
}

/// Which way a manual step moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Cursor over a list of step records.
#[derive(Debug, Clone)]
pub struct Playback {
    steps: Vec<StepRecord>,
    algorithm: Option<SortAlgorithm>,
    current_frame: usize,
    state: PlaybackState,
    speed: PlaybackSpeed,
    loop_enabled: bool,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Playback {
    pub fn new(steps: Vec<StepRecord>) -> Self {
        Self {
            steps,
            algorithm: None,
            current_frame: 0,
            state: PlaybackState::Stopped,
            speed: PlaybackSpeed::Normal,
            loop_enabled: false,
        }
    }

    /// Replace the timeline and rewind. Speed and looping are kept.
    pub fn load(&mut self, algorithm: SortAlgorithm, steps: Vec<StepRecord>) {
        self.steps = steps;
        self.algorithm = Some(algorithm);
        self.current_frame = 0;
        self.state = PlaybackState::Stopped;
    }

    pub fn algorithm(&self) -> Option<SortAlgorithm> {
        self.algorithm
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn total_frames(&self) -> usize {
        self.steps.len()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Move the cursor, clamped to the timeline.
    pub fn seek(&mut self, frame: usize) {
        self.current_frame = frame.min(self.steps.len());
        if self.current_frame == self.steps.len() && !self.steps.is_empty() && !self.loop_enabled {
            self.state = PlaybackState::Finished;
        } else if self.state == PlaybackState::Finished {
            self.state = PlaybackState::Paused;
        }
    }

    /// Start advancing. A finished timeline restarts from the beginning.
    pub fn play(&mut self) {
        if self.current_frame >= self.steps.len() {
            self.current_frame = 0;
        }
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Rewind to the beginning.
    pub fn stop(&mut self) {
        self.current_frame = 0;
        self.state = PlaybackState::Stopped;
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        if matches!(speed, PlaybackSpeed::Paused) {
            self.pause();
        }
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Show the next step.
    /// A looping timeline wraps on the step after the last one, so the last
    /// step stays visible until then.
    pub fn step_forward(&mut self) -> Option<&StepRecord> {
        if self.current_frame >= self.steps.len() {
            if !self.loop_enabled || self.steps.is_empty() {
                return None;
            }
            self.current_frame = 0;
        }
        self.current_frame += 1;
        if self.current_frame >= self.steps.len() && !self.loop_enabled {
            self.state = PlaybackState::Finished;
        }
        self.current_step()
    }

    /// Go back one step, never past the first. Stepping manually pauses
    /// playback.
    pub fn step_backward(&mut self) -> Option<&StepRecord> {
        if self.current_frame > 1 {
            self.current_frame -= 1;
            self.state = PlaybackState::Paused;
        }
        self.current_step()
    }

    pub fn step(&mut self, direction: Direction) -> Option<&StepRecord> {
        match direction {
            Direction::Forward => self.step_forward(),
            Direction::Backward => self.step_backward(),
        }
    }

    /// Advance one step if playing. Called by the server's ticker.
    pub fn tick(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        self.step_forward().is_some()
    }

    /// The step currently on screen.
    pub fn current_step(&self) -> Option<&StepRecord> {
        self.current_frame.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    /// Fraction of the timeline shown, `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.current_frame as f64 / self.steps.len() as f64
        }
    }
}

/// Playback status for the front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub algorithm: Option<SortAlgorithm>,
    pub current_frame: usize,
    pub total_frames: usize,
    pub state: PlaybackState,
    pub speed: PlaybackSpeed,
    pub progress: f64,
    pub loop_enabled: bool,
    pub step: Option<StepRecord>,
}

impl From<&Playback> for PlaybackStatus {
    fn from(playback: &Playback) -> Self {
        Self {
            algorithm: playback.algorithm,
            current_frame: playback.current_frame,
            total_frames: playback.total_frames(),
            state: playback.state,
            speed: playback.speed,
            progress: playback.progress(),
            loop_enabled: playback.loop_enabled,
            step: playback.current_step().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_steps(count: usize) -> Vec<StepRecord> {
        (0..count)
            .map(|i| StepRecord {
                array: vec![i as f64],
                comparisons: vec![],
                swaps: vec![],
                description: format!("step {i}"),
            })
            .collect()
    }

    #[test]
    fn playback_starts_before_the_first_step() {
        let playback = Playback::new(make_steps(10));
        assert_eq!(playback.current_frame(), 0);
        assert_eq!(playback.state(), PlaybackState::Stopped);
        assert!(playback.current_step().is_none());
    }

    #[test]
    fn seek_clamps_to_bounds() {
        let mut playback = Playback::new(make_steps(10));

        playback.seek(5);
        assert_eq!(playback.current_frame(), 5);
        assert_eq!(playback.current_step().unwrap().description, "step 4");

        playback.seek(100);
        assert_eq!(playback.current_frame(), 10);
        assert_eq!(playback.state(), PlaybackState::Finished);

        playback.seek(0);
        assert_eq!(playback.current_frame(), 0);
        assert_eq!(playback.state(), PlaybackState::Paused);
    }

    #[test]
    fn stepping_walks_the_timeline_both_ways() {
        let mut playback = Playback::new(make_steps(5));

        assert_eq!(playback.step_forward().unwrap().description, "step 0");
        assert_eq!(playback.step(Direction::Forward).unwrap().description, "step 1");
        assert_eq!(playback.current_frame(), 2);

        assert_eq!(playback.step_backward().unwrap().description, "step 0");
        assert_eq!(playback.state(), PlaybackState::Paused);
        assert_eq!(playback.current_frame(), 1);
    }

    #[test]
    fn step_backward_stays_on_the_first_step() {
        let mut playback = Playback::new(make_steps(5));
        playback.step_forward();

        assert_eq!(playback.step_backward().unwrap().description, "step 0");
        assert_eq!(playback.step_backward().unwrap().description, "step 0");
        assert_eq!(playback.current_frame(), 1);
        assert!(PlaybackStatus::from(&playback).step.is_some());
    }

    #[test]
    fn step_forward_stops_at_end() {
        let mut playback = Playback::new(make_steps(3));

        playback.step_forward();
        playback.step_forward();
        assert_eq!(playback.step_forward().unwrap().description, "step 2");
        assert_eq!(playback.state(), PlaybackState::Finished);
        assert!(playback.step_forward().is_none());
    }

    #[test]
    fn loop_wraps_around() {
        let mut playback = Playback::new(make_steps(3));
        playback.set_loop(true);

        playback.step_forward();
        playback.step_forward();
        assert_eq!(playback.step_forward().unwrap().description, "step 2");
        assert_eq!(playback.current_frame(), 3);
        assert_ne!(playback.state(), PlaybackState::Finished);
        assert_eq!(PlaybackStatus::from(&playback).step.unwrap().description, "step 2");

        assert_eq!(playback.step_forward().unwrap().description, "step 0");
        assert_eq!(playback.current_frame(), 1);
    }

    #[test]
    fn tick_only_advances_while_playing() {
        let mut playback = Playback::new(make_steps(2));
        assert!(!playback.tick());

        playback.play();
        assert!(playback.tick());
        assert!(playback.tick());
        assert!(!playback.tick());
        assert_eq!(playback.state(), PlaybackState::Finished);

        playback.play();
        assert_eq!(playback.current_frame(), 0);
    }

    #[test]
    fn load_rewinds_and_keeps_speed() {
        let mut playback = Playback::new(make_steps(4));
        playback.set_speed(PlaybackSpeed::Double);
        playback.seek(3);
        playback.load(SortAlgorithm::Heap, make_steps(2));
        assert_eq!(playback.current_frame(), 0);
        assert_eq!(playback.total_frames(), 2);
        assert_eq!(playback.speed(), PlaybackSpeed::Double);
        assert_eq!(playback.algorithm(), Some(SortAlgorithm::Heap));
    }

    #[test]
    fn progress_calculation() {
        let mut playback = Playback::new(make_steps(10));
        assert_eq!(playback.progress(), 0.0);
        playback.seek(5);
        assert_eq!(playback.progress(), 0.5);
        playback.seek(10);
        assert_eq!(playback.progress(), 1.0);
    }

    #[test]
    fn speed_multipliers() {
        assert_eq!(PlaybackSpeed::Paused.ms_per_frame(100), None);
        assert_eq!(PlaybackSpeed::Double.ms_per_frame(100), Some(50));
        assert_eq!(PlaybackSpeed::Maximum.ms_per_frame(100), Some(0));
        assert!(PlaybackSpeed::Maximum.multiplier().is_infinite());
    }

    #[test]
    fn status_carries_the_visible_step() {
        let mut playback = Playback::new(make_steps(10));
        playback.seek(3);
        playback.set_speed(PlaybackSpeed::HalfSpeed);

        let status = PlaybackStatus::from(&playback);
        assert_eq!(status.current_frame, 3);
        assert_eq!(status.total_frames, 10);
        assert_eq!(status.speed, PlaybackSpeed::HalfSpeed);
        assert_eq!(status.step.unwrap().description, "step 2");
    }
}
