//! Delay/pause controller.
//!
//! [`Pacer::pace`] is the only suspension point between checkpoints. It
//! waits out the pause flag on a short poll, then sleeps for a duration
//! derived from the run's speed. Cancellation is observed on every poll.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{sleep, Instant};
use tracing::trace;

use crate::control::RunToken;
use crate::error::Result;

/// Animation speed in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Speed(u8);

impl Speed {
    pub const MIN: Speed = Speed(1);
    pub const MAX: Speed = Speed(100);

    /// Clamp `value` into range.
    pub fn new(value: u8) -> Self {
        Self(value.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self(50)
    }
}

/// How speed maps to a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayCurve {
    /// `(101 - speed) × scale`: faster speed, shorter wait
    Inverse,
    /// `speed × scale`: the structure views' fixed animation step
    Proportional,
}

/// Configuration for a pacer.
#[derive(Debug, Clone, Copy)]
pub struct PacerConfig {
    /// Multiplier applied to the speed term
    pub scale: Duration,
    pub curve: DelayCurve,
    /// How often the pause flag and cancellation are re-checked
    pub poll_interval: Duration,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self::sorting()
    }
}

impl PacerConfig {
    /// Bars: 1 ms per speed step.
    #[must_use]
    pub fn sorting() -> Self {
        Self {
            scale: Duration::from_millis(1),
            curve: DelayCurve::Inverse,
            poll_interval: Duration::from_millis(100),
        }
    }

    /// Tree traversals: 10 ms per speed step.
    #[must_use]
    pub fn trees() -> Self {
        Self {
            scale: Duration::from_millis(10),
            ..Self::sorting()
        }
    }

    /// Graph searches: 15 ms per speed step.
    #[must_use]
    pub fn graphs() -> Self {
        Self {
            scale: Duration::from_millis(15),
            ..Self::sorting()
        }
    }

    /// Structure operations: `speed × 10 ms`.
    #[must_use]
    pub fn structures() -> Self {
        Self {
            scale: Duration::from_millis(10),
            curve: DelayCurve::Proportional,
            ..Self::sorting()
        }
    }

    /// No delay at all; pause is still honoured.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            scale: Duration::ZERO,
            ..Self::sorting()
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Delay for one checkpoint at `speed`.
    pub fn delay(&self, speed: Speed) -> Duration {
        let steps = match self.curve {
            DelayCurve::Inverse => 101 - u32::from(speed.get()),
            DelayCurve::Proportional => u32::from(speed.get()),
        };
        self.scale * steps
    }
}

/// Cancellable, pausable wait between checkpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pacer {
    config: PacerConfig,
}

impl Pacer {
    pub fn new(config: PacerConfig) -> Self {
        Self { config }
    }

    pub fn immediate() -> Self {
        Self::new(PacerConfig::immediate())
    }

    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    /// Wait out a pause, then sleep one checkpoint's delay.
    ///
    /// Returns `Err(Cancelled)` as soon as the token goes stale, whether
    /// paused or mid-delay.
    pub async fn pace(&self, token: &RunToken) -> Result<()> {
        token.check()?;
        while token.is_paused() {
            sleep(self.config.poll_interval).await;
            token.check()?;
        }

        let delay = self.config.delay(token.control().speed());
        self.wait(token, delay).await
    }

    /// Sleep `duration` in poll-sized slices, checking cancellation between
    /// them. Pause is not consulted.
    pub async fn wait(&self, token: &RunToken, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return token.check();
        }
        trace!(?duration, "pacing");
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return token.check();
            }
            let slice = (deadline - now).min(self.config.poll_interval.max(Duration::from_millis(1)));
            sleep(slice).await;
            token.check()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::RunControl;
    use crate::error::Error;

    #[test]
    fn speed_is_clamped() {
        assert_eq!(Speed::new(0).get(), 1);
        assert_eq!(Speed::new(250).get(), 100);
        assert_eq!(Speed::default().get(), 50);
    }

    #[test]
    fn delay_per_view() {
        let speed = Speed::new(1);
        assert_eq!(PacerConfig::sorting().delay(speed), Duration::from_millis(100));
        assert_eq!(PacerConfig::trees().delay(speed), Duration::from_millis(1000));
        assert_eq!(PacerConfig::graphs().delay(speed), Duration::from_millis(1500));
        assert_eq!(PacerConfig::structures().delay(Speed::default()), Duration::from_millis(500));
        assert_eq!(PacerConfig::sorting().delay(Speed::MAX), Duration::from_millis(1));
        assert_eq!(PacerConfig::immediate().delay(speed), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn pace_sleeps_for_the_delay() {
        let control = RunControl::with_speed(Speed::new(51));
        let token = control.begin().unwrap();
        let pacer = Pacer::new(PacerConfig::trees());

        let start = Instant::now();
        pacer.pace(&token).await.unwrap();
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(510));
    }

    #[tokio::test(start_paused = true)]
    async fn pace_waits_while_paused() {
        let control = RunControl::new();
        let token = control.begin().unwrap();
        control.pause();

        let resumer = control.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(1000)).await;
            resumer.resume();
        });

        let start = Instant::now();
        Pacer::new(PacerConfig::sorting()).pace(&token).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_paused_cancels() {
        let control = RunControl::new();
        let token = control.begin().unwrap();
        control.pause();

        let resetter = control.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(250)).await;
            resetter.reset();
        });

        let result = Pacer::new(PacerConfig::sorting()).pace(&token).await;
        assert_eq!(result, Err(Error::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_delay_cancels_at_next_poll() {
        let control = RunControl::with_speed(Speed::MIN);
        let token = control.begin().unwrap();

        let resetter = control.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(150)).await;
            resetter.reset();
        });

        let start = Instant::now();
        let result = Pacer::new(PacerConfig::graphs()).pace(&token).await;
        assert_eq!(result, Err(Error::Cancelled));
        assert!(start.elapsed() <= Duration::from_millis(200));
    }

    #[test]
    fn immediate_pacer_completes_without_a_timer() {
        let token = RunToken::detached();
        tokio_test::block_on(async {
            assert!(Pacer::immediate().pace(&token).await.is_ok());
        });
    }
}
