//! Graph search engine: BFS, DFS and Dijkstra with checkpoints.
//!
//! Neighbors are always taken in edge insertion order. Dijkstra uses a
//! linear scan for the next node; graphs are small enough that a priority
//! queue would only obscure the animation.

use std::fmt;
use std::str::FromStr;

use algoscope_core::{Graph, GraphConfig, ParseError};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::control::{Outcome, RunControl, RunToken};
use crate::error::{Error, Result};
use crate::pacer::{Pacer, PacerConfig};
use crate::sink::{Frame, Highlight, HighlightKind, Scene, Sinks};

/// Graph search algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphAlgorithm {
    #[default]
    Bfs,
    Dfs,
    Dijkstra,
}

impl fmt::Display for GraphAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GraphAlgorithm::Bfs => "BFS",
            GraphAlgorithm::Dfs => "DFS",
            GraphAlgorithm::Dijkstra => "Dijkstra",
        })
    }
}

impl FromStr for GraphAlgorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "dfs" => Ok(Self::Dfs),
            "dijkstra" => Ok(Self::Dijkstra),
            _ => Err(ParseError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphReport {
    pub algorithm: GraphAlgorithm,
    /// Node indices in the order they were visited
    pub visit_order: Vec<usize>,
    /// Dijkstra only; `None` is unreachable
    pub distances: Vec<Option<u64>>,
    pub previous: Vec<Option<usize>>,
}

/// Checkpointed search over an undirected weighted graph.
#[derive(Debug)]
pub struct GraphEngine {
    graph: Graph,
    algorithm: GraphAlgorithm,
    start_node: usize,
    control: RunControl,
    pacer: Pacer,
    sinks: Sinks,
    order: Vec<usize>,
}

impl GraphEngine {
    pub fn new(control: RunControl, sinks: Sinks) -> Self {
        Self {
            graph: Graph::default(),
            algorithm: GraphAlgorithm::default(),
            start_node: 0,
            control,
            pacer: Pacer::new(PacerConfig::graphs()),
            sinks,
            order: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn algorithm(&self) -> GraphAlgorithm {
        self.algorithm
    }

    pub fn start_node(&self) -> usize {
        self.start_node
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn control(&self) -> &RunControl {
        &self.control
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.control.is_active() {
            return Err(Error::Busy);
        }
        Ok(())
    }

    pub fn set_algorithm(&mut self, algorithm: GraphAlgorithm) -> Result<()> {
        self.ensure_idle()?;
        self.algorithm = algorithm;
        Ok(())
    }

    pub fn set_start(&mut self, node: usize) -> Result<()> {
        self.ensure_idle()?;
        if node >= self.graph.len() {
            return Err(ParseError::IndexOutOfRange {
                index: node,
                len: self.graph.len(),
            }
            .into());
        }
        self.start_node = node;
        Ok(())
    }

    fn replace(&mut self, graph: Graph) {
        self.graph = graph;
        self.start_node = 0;
        self.order.clear();
        self.sinks.render(&self.frame(self.start_highlight()));
        self.sinks
            .status("Select an algorithm and click start to begin visualization.");
    }

    /// Replace the graph with a random connected one.
    pub fn generate(&mut self, config: &GraphConfig) -> Result<()> {
        self.ensure_idle()?;
        self.replace(Graph::generate(config));
        Ok(())
    }

    /// Build a graph from a node spec and an edge spec.
    pub fn build(&mut self, nodes_spec: &str, edges_spec: &str) -> Result<()> {
        self.ensure_idle()?;
        let defaults = GraphConfig::default();
        let graph = Graph::build(nodes_spec, edges_spec, defaults.width, defaults.height)?;
        self.replace(graph);
        Ok(())
    }

    fn start_highlight(&self) -> Vec<Highlight> {
        if self.graph.is_empty() {
            Vec::new()
        } else {
            vec![Highlight::at(self.start_node, HighlightKind::Path)]
        }
    }

    fn frame(&self, highlights: Vec<Highlight>) -> Frame {
        Frame::new(Scene::Graph {
            nodes: self.graph.nodes.clone(),
            edges: self.graph.edges.clone(),
        })
        .with_highlights(highlights)
    }

    fn label(&self, node: usize) -> &str {
        &self.graph.nodes[node].id
    }

    async fn show(&self, token: &RunToken, highlight: Highlight) -> Result<()> {
        self.sinks.render(&self.frame(vec![highlight]));
        self.pacer.pace(token).await
    }

    async fn visiting(&mut self, token: &RunToken, node: usize) -> Result<()> {
        let message = format!("Visiting node {}", self.label(node));
        self.sinks.status(&message);
        self.order.push(node);
        self.show(token, Highlight::at(node, HighlightKind::Visiting)).await
    }

    async fn visited(&self, token: &RunToken, node: usize) -> Result<()> {
        self.show(token, Highlight::at(node, HighlightKind::Visited)).await
    }

    async fn set_edge(&mut self, token: &RunToken, from: usize, to: usize, active: bool) -> Result<()> {
        let Some(edge) = self.graph.edge_between(from, to) else {
            return Ok(());
        };
        self.graph.edges[edge].active = active;
        self.show(token, Highlight::edge(edge, HighlightKind::Active)).await
    }

    fn visit_order_text(&self) -> String {
        self.order
            .iter()
            .map(|&n| self.label(n))
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// Run the selected search from the start node.
    pub async fn start(&mut self) -> Outcome<GraphReport> {
        if self.graph.is_empty() {
            return Outcome::Rejected;
        }
        let Some(token) = self.control.begin() else {
            return Outcome::Rejected;
        };

        info!(algorithm = %self.algorithm, nodes = self.graph.len(), start = self.start_node, "graph search started");
        self.graph.reset_traversal();
        self.order.clear();

        let start = self.start_node;
        let result = match self.algorithm {
            GraphAlgorithm::Bfs => self.bfs(&token, start).await,
            GraphAlgorithm::Dfs => self.dfs(&token, start).await,
            GraphAlgorithm::Dijkstra => self.dijkstra(&token, start).await,
        };

        match result {
            Ok(()) => {
                let summary = match self.algorithm {
                    GraphAlgorithm::Dijkstra => format!(
                        "Dijkstra completed. Distances from node {}: {}",
                        self.label(start),
                        self.distance_text()
                    ),
                    other => format!("{other} completed. Visit order: {}", self.visit_order_text()),
                };
                self.sinks.status(&summary);
                self.control.finish(&token);
                info!(algorithm = %self.algorithm, visited = self.order.len(), "graph search finished");
                Outcome::Completed(GraphReport {
                    algorithm: self.algorithm,
                    visit_order: self.order.clone(),
                    distances: self.graph.nodes.iter().map(|n| n.distance).collect(),
                    previous: self.graph.nodes.iter().map(|n| n.previous).collect(),
                })
            }
            Err(e) => {
                debug!(error = %e, "graph search stopped");
                self.clear();
                Outcome::Cancelled
            }
        }
    }

    /// Forget the last search: visited flags, distances, active edges.
    pub fn clear(&mut self) {
        self.graph.reset_traversal();
        self.order.clear();
        self.sinks.render(&self.frame(self.start_highlight()));
    }

    fn distance_text(&self) -> String {
        self.graph
            .nodes
            .iter()
            .map(|n| match n.distance {
                Some(d) => format!("{}:{d}", n.id),
                None => format!("{}:∞", n.id),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// FIFO frontier; a node is marked visited when enqueued.
    async fn bfs(&mut self, token: &RunToken, start: usize) -> Result<()> {
        let mut queue = std::collections::VecDeque::from([start]);
        self.graph.nodes[start].visited = true;

        while let Some(current) = queue.pop_front() {
            self.visiting(token, current).await?;
            for next in self.graph.neighbors(current) {
                if self.graph.nodes[next].visited {
                    continue;
                }
                self.graph.nodes[next].visited = true;
                queue.push_back(next);
                self.set_edge(token, current, next, true).await?;
            }
            self.visited(token, current).await?;
        }
        Ok(())
    }

    /// Recursive; a node is marked visited on entry.
    fn dfs<'a>(&'a mut self, token: &'a RunToken, node: usize) -> BoxFuture<'a, Result<()>> {
        async move {
            self.graph.nodes[node].visited = true;
            self.visiting(token, node).await?;
            for next in self.graph.neighbors(node) {
                if self.graph.nodes[next].visited {
                    continue;
                }
                self.set_edge(token, node, next, true).await?;
                self.dfs(token, next).await?;
            }
            self.visited(token, node).await
        }
        .boxed()
    }

    async fn dijkstra(&mut self, token: &RunToken, start: usize) -> Result<()> {
        let n = self.graph.len();
        self.graph.nodes[start].distance = Some(0);
        let mut done = vec![false; n];

        loop {
            // Linear scan: first strictly smaller finite distance wins.
            let mut current: Option<(usize, u64)> = None;
            for (i, node) in self.graph.nodes.iter().enumerate() {
                if done[i] {
                    continue;
                }
                if let Some(d) = node.distance {
                    if current.map_or(true, |(_, best)| d < best) {
                        current = Some((i, d));
                    }
                }
            }
            let Some((current, dist)) = current else {
                break;
            };

            done[current] = true;
            self.graph.nodes[current].visited = true;
            self.visiting(token, current).await?;

            for next in self.graph.neighbors(current) {
                if done[next] {
                    continue;
                }
                let Some(edge) = self.graph.edge_between(current, next) else {
                    continue;
                };
                self.set_edge(token, current, next, true).await?;

                let alt = dist + u64::from(self.graph.edges[edge].weight);
                if self.graph.nodes[next].distance.map_or(true, |d| alt < d) {
                    self.graph.nodes[next].distance = Some(alt);
                    self.graph.nodes[next].previous = Some(current);
                    let message = format!("Updated distance to node {}: {alt}", self.label(next));
                    self.sinks.status(&message);
                    self.show(token, Highlight::at(next, HighlightKind::Path)).await?;
                }

                self.set_edge(token, current, next, false).await?;
            }
            self.visited(token, current).await?;
        }
        Ok(())
    }
}
