//! Render and status sinks.
//!
//! Engines know nothing about drawing. At each checkpoint they hand a
//! [`Frame`] (scene snapshot, highlight set, optional caption) to a
//! [`RenderSink`] and short progress messages to a [`StatusSink`].

use std::sync::{Arc, Mutex, PoisonError};

use algoscope_core::{Edge, GraphNode, NodeMark};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Which linear structure a scene shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureKind {
    Stack,
    Queue,
    Array,
    Deque,
    CircularQueue,
}

impl StructureKind {
    pub fn name(self) -> &'static str {
        match self {
            StructureKind::Stack => "stack",
            StructureKind::Queue => "queue",
            StructureKind::Array => "array",
            StructureKind::Deque => "deque",
            StructureKind::CircularQueue => "circular queue",
        }
    }
}

/// A tree node as drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeNodeView {
    pub value: i64,
    pub x: f64,
    pub y: f64,
    pub mark: NodeMark,
}

/// Snapshot of the data being visualized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scene {
    Bars {
        values: Vec<f64>,
    },
    Tree {
        nodes: Vec<TreeNodeView>,
        edges: Vec<(i64, i64)>,
    },
    Graph {
        nodes: Vec<GraphNode>,
        edges: Vec<Edge>,
    },
    /// Linear structure. Slots are `None` only for unused circular queue cells.
    Items {
        kind: StructureKind,
        slots: Vec<Option<f64>>,
        front: Option<usize>,
        rear: Option<usize>,
    },
}

impl Scene {
    /// Bar heights, if this is a sorting scene.
    pub fn bars(&self) -> Option<&[f64]> {
        match self {
            Scene::Bars { values } => Some(values),
            _ => None,
        }
    }
}

/// Visual treatment of one highlighted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    Comparing,
    Swapping,
    Pivot,
    Sorted,
    Visiting,
    Visited,
    /// Edge under consideration
    Active,
    /// Node on a search path
    Path,
    Inserted,
    Removed,
    Found,
    /// Not-found or invalid operation feedback
    Shake,
}

/// What a highlight points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Bar, slot or graph node index
    Index(usize),
    /// Tree node value
    Node(i64),
    /// Graph edge index
    Edge(usize),
    /// The whole container
    All,
}

/// One highlighted element. A pair comparison is two highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlight {
    pub target: Target,
    pub kind: HighlightKind,
}

impl Highlight {
    pub fn at(index: usize, kind: HighlightKind) -> Self {
        Self {
            target: Target::Index(index),
            kind,
        }
    }

    pub fn node(value: i64, kind: HighlightKind) -> Self {
        Self {
            target: Target::Node(value),
            kind,
        }
    }

    pub fn edge(index: usize, kind: HighlightKind) -> Self {
        Self {
            target: Target::Edge(index),
            kind,
        }
    }

    pub fn all(kind: HighlightKind) -> Self {
        Self {
            target: Target::All,
            kind,
        }
    }
}

/// Everything a renderer needs for one checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub scene: Scene,
    pub highlights: Vec<Highlight>,
    pub caption: Option<String>,
}

impl Frame {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            highlights: Vec::new(),
            caption: None,
        }
    }

    #[must_use]
    pub fn with_highlights(mut self, highlights: impl IntoIterator<Item = Highlight>) -> Self {
        self.highlights.extend(highlights);
        self
    }

    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Indices carrying highlight `kind`, in insertion order.
    pub fn indices(&self, kind: HighlightKind) -> Vec<usize> {
        self.highlights
            .iter()
            .filter(|h| h.kind == kind)
            .filter_map(|h| match h.target {
                Target::Index(i) => Some(i),
                _ => None,
            })
            .collect()
    }

    pub fn has(&self, kind: HighlightKind) -> bool {
        self.highlights.iter().any(|h| h.kind == kind)
    }
}

/// Receives a frame at every checkpoint.
pub trait RenderSink: Send + Sync {
    fn render(&self, frame: &Frame);
}

/// Receives short human-readable progress lines.
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
}

/// Logs frames at `debug` and status lines at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl RenderSink for TracingSink {
    fn render(&self, frame: &Frame) {
        debug!(
            highlights = frame.highlights.len(),
            caption = frame.caption.as_deref().unwrap_or(""),
            "frame"
        );
    }
}

impl StatusSink for TracingSink {
    fn status(&self, message: &str) {
        info!("{message}");
    }
}

/// Keeps every frame and status line in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<Frame>>,
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    pub fn clear(&self) {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, frame: &Frame) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame.clone());
    }
}

impl StatusSink for RecordingSink {
    fn status(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}

/// The pair of sinks an engine reports to.
#[derive(Clone)]
pub struct Sinks {
    pub render: Arc<dyn RenderSink>,
    pub status: Arc<dyn StatusSink>,
}

impl Sinks {
    pub fn new(render: Arc<dyn RenderSink>, status: Arc<dyn StatusSink>) -> Self {
        Self { render, status }
    }

    /// Route both frames and messages to one recorder.
    pub fn recording(sink: Arc<RecordingSink>) -> Self {
        Self {
            render: sink.clone(),
            status: sink,
        }
    }

    pub fn tracing() -> Self {
        Self {
            render: Arc::new(TracingSink),
            status: Arc::new(TracingSink),
        }
    }

    pub fn render(&self, frame: &Frame) {
        self.render.render(frame);
    }

    pub fn status(&self, message: &str) {
        self.status.status(message);
    }
}

impl Default for Sinks {
    fn default() -> Self {
        Self::tracing()
    }
}

impl std::fmt::Debug for Sinks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sinks").finish_non_exhaustive()
    }
}
