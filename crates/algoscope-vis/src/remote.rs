//! Step source backed by another algoscope server's `/api/sort`.

use std::future::Future;
use std::time::Duration;

use algoscope_core::SortAlgorithm;
use algoscope_engine::{StepRecord, StepSource};
use tracing::debug;

use crate::error::{Error, Result};
use crate::server::SortRequest;

/// Fetches step records over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStepSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStepSource {
    /// `base_url` is the server root, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Give up on requests that take longer than `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/sort", self.base_url)
    }

    async fn request(&self, body: SortRequest) -> Result<Vec<StepRecord>> {
        let steps: Vec<StepRecord> = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if steps.is_empty() {
            return Err(Error::InvalidInput("remote returned no steps".into()));
        }
        debug!(endpoint = %self.endpoint(), steps = steps.len(), "fetched remote steps");
        Ok(steps)
    }
}

impl StepSource for HttpStepSource {
    fn fetch_steps(
        &self,
        values: &[f64],
        algorithm: SortAlgorithm,
    ) -> impl Future<Output = algoscope_engine::Result<Vec<StepRecord>>> + Send {
        let body = SortRequest {
            array: values.to_vec(),
            algorithm: algorithm.key().to_string(),
        };
        let source = self.clone();
        async move {
            source
                .request(body)
                .await
                .map_err(|e| algoscope_engine::Error::SourceUnavailable(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let source = HttpStepSource::new("http://localhost:8000/");
        assert_eq!(source.endpoint(), "http://localhost:8000/api/sort");
    }

    #[tokio::test]
    async fn unreachable_server_is_source_unavailable() {
        // Port 9 (discard) is essentially never listening.
        let source = HttpStepSource::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = source.fetch_steps(&[2.0, 1.0], SortAlgorithm::Bubble).await;
        assert!(matches!(result, Err(algoscope_engine::Error::SourceUnavailable(_))));
    }
}
