//! Algoscope Visualization Server
//!
//! HTTP front for the algorithm engines.
//!
//! # Architecture
//!
//! - **Step API**: `POST /api/sort` records every step of a sort
//! - **Playback**: scrub through a loaded timeline at any speed
//! - **REST API**: playback controls, complexity metadata, server status
//! - **Static assets**: everything else is served from a directory
//! - **Remote steps**: [`HttpStepSource`] fetches steps from another server
//!
//! # Usage
//!
//! ```ignore
//! let config = VisConfig::from_env()?;
//! VisServer::new(config).serve().await?;
//! ```

mod config;
mod error;
mod playback;
mod remote;
mod server;

pub use config::VisConfig;
pub use error::{Error, Result};
pub use playback::{Direction, Playback, PlaybackSpeed, PlaybackState, PlaybackStatus};
pub use remote::HttpStepSource;
pub use server::{SortRequest, VisServer, MAX_RECORDED_LEN};

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;
    use algoscope_core::SortAlgorithm;
    use algoscope_engine::{fetch_steps_or_local, record_sort_steps_blocking, StepRecord, StepSource};

    struct Offline;

    impl StepSource for Offline {
        fn fetch_steps(
            &self,
            _values: &[f64],
            _algorithm: SortAlgorithm,
        ) -> impl Future<Output = algoscope_engine::Result<Vec<StepRecord>>> + Send {
            async { Err(algoscope_engine::Error::SourceUnavailable("offline".into())) }
        }
    }

    #[test]
    fn offline_source_still_plays_back() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        let steps = tokio_test::block_on(fetch_steps_or_local(&Offline, &values, SortAlgorithm::Merge)).unwrap();
        assert_eq!(steps[0].array, values.to_vec());

        let mut playback = Playback::new(steps);
        playback.set_loop(true);
        playback.play();
        let total = playback.total_frames();
        for _ in 0..total {
            assert!(playback.tick());
        }
        assert_eq!(playback.current_step().unwrap().array, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(playback.tick());
        assert_eq!(playback.current_step().unwrap().description, "Initial array");
    }

    #[test]
    fn recorded_steps_play_back_to_the_sorted_array() {
        let steps = record_sort_steps_blocking(&[4.0, 2.0, 3.0, 1.0], SortAlgorithm::Heap).unwrap();
        let total = steps.len();
        let mut playback = Playback::new(steps);

        playback.play();
        while playback.tick() {}
        assert_eq!(playback.current_frame(), total);
        assert_eq!(playback.state(), PlaybackState::Finished);
        assert_eq!(playback.current_step().unwrap().array, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn playback_can_seek_back_to_the_input() {
        let steps = record_sort_steps_blocking(&[2.0, 1.0], SortAlgorithm::Bubble).unwrap();
        let mut playback = Playback::new(steps);
        playback.seek(usize::MAX);
        playback.seek(1);
        assert_eq!(playback.current_step().unwrap().description, "Initial array");
    }
}
