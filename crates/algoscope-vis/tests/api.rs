//! HTTP API against a live server on an ephemeral port.

use std::path::Path;
use std::time::Duration;

use algoscope_core::{is_sorted, SortAlgorithm};
use algoscope_engine::{fetch_steps_or_local, StepRecord, StepSource};
use algoscope_vis::{HttpStepSource, PlaybackState, PlaybackStatus, VisConfig, VisServer};
use serde_json::{json, Value};
use tempfile::TempDir;

struct Running {
    base: String,
    client: reqwest::Client,
    assets: TempDir,
}

async fn spawn_server() -> Running {
    let assets = tempfile::tempdir().unwrap();
    std::fs::write(assets.path().join("app.js"), "console.log('algoscope');").unwrap();

    let config = VisConfig {
        assets: assets.path().to_path_buf(),
        ..VisConfig::default()
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let router = VisServer::new(config).router();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Running {
        base: format!("http://127.0.0.1:{port}"),
        client: reqwest::Client::new(),
        assets,
    }
}

impl Running {
    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(format!("{}{path}", self.base)).send().await.unwrap()
    }

    fn assets(&self) -> &Path {
        self.assets.path()
    }
}

#[tokio::test]
async fn sort_returns_every_step() {
    let server = spawn_server().await;
    let response = server
        .post("/api/sort", json!({ "array": [5, 1, 4, 2], "algorithm": "merge" }))
        .await;
    assert_eq!(response.status(), 200);

    let steps: Vec<StepRecord> = response.json().await.unwrap();
    assert_eq!(steps.first().unwrap().description, "Initial array");
    assert_eq!(steps.first().unwrap().array, vec![5.0, 1.0, 4.0, 2.0]);
    assert!(is_sorted(&steps.last().unwrap().array));
}

#[tokio::test]
async fn unknown_algorithm_is_a_bad_request() {
    let server = spawn_server().await;
    let response = server
        .post("/api/sort", json!({ "array": [2, 1], "algorithm": "bogo" }))
        .await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("bogo"));
}

#[tokio::test]
async fn oversized_arrays_are_refused() {
    let server = spawn_server().await;
    let array: Vec<u32> = (0..=algoscope_vis::MAX_RECORDED_LEN as u32).collect();
    let response = server
        .post("/api/sort", json!({ "array": array, "algorithm": "bubble" }))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn complexity_lists_all_algorithms() {
    let server = spawn_server().await;
    let table: Value = server.get("/api/algorithms/complexity").await.json().await.unwrap();
    for algorithm in SortAlgorithm::ALL {
        assert!(table.get(algorithm.key()).is_some(), "missing {algorithm}");
    }
    assert_eq!(table["merge"]["stable"], true);
    assert_eq!(table["quick"]["time_worst"], "O(n²)");
}

#[tokio::test]
async fn status_counts_sort_requests() {
    let server = spawn_server().await;
    server
        .post("/api/sort", json!({ "array": [2, 1], "algorithm": "quick" }))
        .await;

    let status: Value = server.get("/api/status").await.json().await.unwrap();
    assert_eq!(status["status"], "ok");
    assert_eq!(status["sort_requests"], 1);
    assert_eq!(status["playback"]["total_frames"], 0);
}

#[tokio::test]
async fn playback_load_step_and_seek() {
    let server = spawn_server().await;

    let loaded: PlaybackStatus = server
        .post("/api/playback/load", json!({ "array": [3, 1, 2], "algorithm": "bubble" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(loaded.algorithm, Some(SortAlgorithm::Bubble));
    assert_eq!(loaded.current_frame, 0);
    assert_eq!(loaded.state, PlaybackState::Stopped);
    assert!(loaded.step.is_none());
    let total = loaded.total_frames;
    assert!(total > 2);

    let first: PlaybackStatus = server
        .post("/api/playback/step", json!({ "direction": "forward" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(first.current_frame, 1);
    assert_eq!(first.step.unwrap().description, "Initial array");

    let end: PlaybackStatus = server
        .post("/api/playback/seek", json!({ "frame": total + 10 }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(end.current_frame, total);
    assert_eq!(end.state, PlaybackState::Finished);
    assert_eq!(end.step.unwrap().array, vec![1.0, 2.0, 3.0]);

    let back: PlaybackStatus = server
        .post("/api/playback/step", json!({ "direction": "backward" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(back.current_frame, total - 1);
    assert_eq!(back.state, PlaybackState::Paused);

    let stopped: PlaybackStatus = server.post("/api/playback/stop", json!({})).await.json().await.unwrap();
    assert_eq!(stopped.current_frame, 0);
    assert_eq!(stopped.state, PlaybackState::Stopped);
}

#[tokio::test]
async fn playback_play_and_pause() {
    let server = spawn_server().await;
    server
        .post("/api/playback/load", json!({ "array": [2, 1], "algorithm": "heap" }))
        .await;

    let playing: PlaybackStatus = server.post("/api/playback/play", json!({})).await.json().await.unwrap();
    assert_eq!(playing.state, PlaybackState::Playing);

    let speed: PlaybackStatus = server
        .post("/api/playback/speed", json!({ "speed": "Double" }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(speed.state, PlaybackState::Playing);

    let paused: PlaybackStatus = server.post("/api/playback/pause", json!({})).await.json().await.unwrap();
    assert_eq!(paused.state, PlaybackState::Paused);
}

#[tokio::test]
async fn index_and_static_assets_are_served() {
    let server = spawn_server().await;

    let index = server.get("/").await;
    assert_eq!(index.status(), 200);
    assert!(index.text().await.unwrap().contains("<title>Algoscope</title>"));

    let script = server.get("/app.js").await;
    assert_eq!(script.status(), 200);
    assert_eq!(script.text().await.unwrap(), "console.log('algoscope');");

    std::fs::write(server.assets().join("late.css"), "body {}").unwrap();
    assert_eq!(server.get("/late.css").await.status(), 200);

    assert_eq!(server.get("/missing.png").await.status(), 404);
}

#[tokio::test]
async fn http_step_source_reads_from_a_live_server() {
    let server = spawn_server().await;
    let source = HttpStepSource::with_timeout(server.base.clone(), Duration::from_secs(5)).unwrap();

    let steps = source.fetch_steps(&[4.0, 3.0, 2.0, 1.0], SortAlgorithm::Quick).await.unwrap();
    assert_eq!(steps.last().unwrap().array, vec![1.0, 2.0, 3.0, 4.0]);

    let status: Value = server.get("/api/status").await.json().await.unwrap();
    assert_eq!(status["sort_requests"], 1);
}

#[tokio::test]
async fn remote_rejection_falls_back_to_local_steps() {
    let server = spawn_server().await;
    let source = HttpStepSource::with_timeout(server.base.clone(), Duration::from_secs(5)).unwrap();

    // Too long for the server, still fine for the local engine.
    let values: Vec<f64> = (0..=algoscope_vis::MAX_RECORDED_LEN).rev().map(|v| v as f64).collect();
    assert!(source.fetch_steps(&values, SortAlgorithm::Merge).await.is_err());

    let steps = fetch_steps_or_local(&source, &values, SortAlgorithm::Merge).await.unwrap();
    assert!(is_sorted(&steps.last().unwrap().array));
}
