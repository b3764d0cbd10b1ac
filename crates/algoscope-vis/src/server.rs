//! Axum web server: step API, playback controls and static assets.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use algoscope_core::{complexity_table, Complexity, ParseError, SortAlgorithm};
use algoscope_engine::{record_sort_steps, PacerConfig, StepRecord};
use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::VisConfig;
use crate::error::Result;
use crate::playback::{Direction, Playback, PlaybackSpeed, PlaybackStatus};

/// Largest array the server will record steps for. Bubble sort records
/// O(n²) full snapshots, so this is far below the engine's own limit.
pub const MAX_RECORDED_LEN: usize = 100;

/// Body of `POST /api/sort` and `POST /api/playback/load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortRequest {
    pub array: Vec<f64>,
    /// `bubble`, `quick`, `merge` or `heap`
    pub algorithm: String,
}

impl SortRequest {
    fn validate(&self) -> Result<SortAlgorithm> {
        if self.array.len() > MAX_RECORDED_LEN {
            return Err(ParseError::TooMany {
                max: MAX_RECORDED_LEN,
                got: self.array.len(),
            }
            .into());
        }
        Ok(self.algorithm.parse()?)
    }
}

/// Shared application state.
pub struct AppState {
    config: VisConfig,
    playback: RwLock<Playback>,
    started: Instant,
    sort_requests: AtomicU64,
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    pub fn new(config: VisConfig) -> Self {
        Self {
            state: Arc::new(AppState {
                config,
                playback: RwLock::new(Playback::default()),
                started: Instant::now(),
                sort_requests: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &VisConfig {
        &self.state.config
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        let assets = ServeDir::new(&self.state.config.assets).append_index_html_on_directories(true);

        Router::new()
            .route("/", get(index_handler))
            // Step API
            .route("/api/sort", post(sort_handler))
            .route("/api/algorithms/complexity", get(complexity_handler))
            .route("/api/status", get(status_handler))
            // Playback over a loaded timeline
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/load", post(load_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/stop", post(stop_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            .route("/api/playback/step", post(step_handler))
            // Everything else comes from the asset directory
            .fallback_service(assets)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Base delay between steps while playing, from the configured speed.
    pub fn frame_interval(&self) -> Duration {
        PacerConfig::trees().delay(self.state.config.speed)
    }

    /// Advance a playing timeline in the background.
    pub fn spawn_ticker(&self) -> JoinHandle<()> {
        let state = self.state.clone();
        let base_ms = self.frame_interval().as_millis() as u64;
        tokio::spawn(async move {
            loop {
                let speed = state.playback.read().await.speed();
                let wait = speed.ms_per_frame(base_ms).unwrap_or(base_ms).max(1);
                tokio::time::sleep(Duration::from_millis(wait)).await;
                if state.playback.write().await.tick() {
                    debug!("playback advanced");
                }
            }
        })
    }

    /// Run the server on the configured address.
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.state.config.addr).await?;
        self.serve_on(listener).await
    }

    /// Run the server on an already bound listener.
    pub async fn serve_on(self, listener: tokio::net::TcpListener) -> Result<()> {
        let addr: SocketAddr = listener.local_addr()?;
        info!(
            %addr,
            assets = %self.state.config.assets.display(),
            "Visualization server running on http://localhost:{}",
            addr.port()
        );
        let ticker = self.spawn_ticker();
        let result = axum::serve(listener, self.router()).await;
        ticker.abort();
        Ok(result?)
    }
}

/// Served at `/` even when the asset directory has no index.
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn record(state: &AppState, req: &SortRequest) -> Result<(SortAlgorithm, Vec<StepRecord>)> {
    let algorithm = req.validate()?;
    let steps = record_sort_steps(&req.array, algorithm).await?;
    state.sort_requests.fetch_add(1, Ordering::Relaxed);
    debug!(%algorithm, len = req.array.len(), steps = steps.len(), "recorded steps");
    Ok((algorithm, steps))
}

async fn sort_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SortRequest>,
) -> Result<Json<Vec<StepRecord>>> {
    let (_, steps) = record(&state, &req).await?;
    Ok(Json(steps))
}

async fn complexity_handler() -> Json<BTreeMap<&'static str, Complexity>> {
    Json(complexity_table())
}

/// Server status response.
#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
    sort_requests: u64,
    playback: PlaybackStatus,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let playback = state.playback.read().await;
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
        sort_requests: state.sort_requests.load(Ordering::Relaxed),
        playback: PlaybackStatus::from(&*playback),
    })
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let playback = state.playback.read().await;
    Json(PlaybackStatus::from(&*playback))
}

async fn load_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SortRequest>,
) -> Result<Json<PlaybackStatus>> {
    let (algorithm, steps) = record(&state, &req).await?;
    let mut playback = state.playback.write().await;
    playback.load(algorithm, steps);
    Ok(Json(PlaybackStatus::from(&*playback)))
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.play();
    Json(PlaybackStatus::from(&*playback))
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.pause();
    Json(PlaybackStatus::from(&*playback))
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.stop();
    Json(PlaybackStatus::from(&*playback))
}

#[derive(Deserialize)]
struct SeekRequest {
    frame: usize,
}

async fn seek_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> Json<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.seek(req.frame);
    Json(PlaybackStatus::from(&*playback))
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed: PlaybackSpeed,
}

async fn speed_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.set_speed(req.speed);
    Json(PlaybackStatus::from(&*playback))
}

#[derive(Deserialize)]
struct StepRequest {
    direction: Direction,
}

async fn step_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StepRequest>,
) -> Json<PlaybackStatus> {
    let mut playback = state.playback.write().await;
    playback.step(req.direction);
    Json(PlaybackStatus::from(&*playback))
}
