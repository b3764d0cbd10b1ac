//! Undirected weighted graphs laid out on a circle.
//!
//! Edges are stored in insertion order; neighbor iteration follows that
//! order, which fixes the visit order of every search.

use std::collections::{HashSet, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ParseError;
use crate::input::{parse_edges, parse_node_ids};

/// Upper bound on graph size.
pub const MAX_GRAPH_NODES: usize = 200;

/// A graph node with traversal metadata.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    /// Display label
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub visited: bool,
    /// Tentative distance; `None` is infinity
    pub distance: Option<u64>,
    /// Predecessor on the current shortest path
    pub previous: Option<usize>,
}

impl GraphNode {
    fn new(id: String, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            visited: false,
            distance: None,
            previous: None,
        }
    }
}

/// An undirected edge between two node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    /// Always at least 1
    pub weight: u32,
    pub active: bool,
}

impl Edge {
    /// The endpoint opposite `node`, if `node` is an endpoint.
    pub fn other(&self, node: usize) -> Option<usize> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }

    fn key(&self) -> (usize, usize) {
        (self.a.min(self.b), self.a.max(self.b))
    }
}

/// Configuration for random graph generation.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub node_count: usize,
    pub width: f64,
    pub height: f64,
    /// Weights are drawn from `1..=max_weight`
    pub max_weight: u32,
    /// Seed for deterministic generation
    pub seed: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_count: 10,
            width: 800.0,
            height: 350.0,
            max_weight: 10,
            seed: 42,
        }
    }
}

/// A graph of nodes and undirected weighted edges.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

fn circle_positions(count: usize, width: f64, height: f64) -> Vec<(f64, f64)> {
    let (cx, cy) = (width / 2.0, height / 2.0);
    let radius = width.min(height) / 3.0;
    (0..count)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / count as f64;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

impl Graph {
    /// Random connected graph: `1.5 × n` random edges followed by a
    /// spanning-tree pass that links every node to an earlier one.
    pub fn generate(config: &GraphConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let n = config.node_count.min(MAX_GRAPH_NODES);
        let max_weight = config.max_weight.max(1);

        let nodes: Vec<GraphNode> = circle_positions(n, config.width, config.height)
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| GraphNode::new(i.to_string(), x, y))
            .collect();

        let mut graph = Self {
            nodes,
            edges: Vec::new(),
        };
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        let possible = n * n.saturating_sub(1) / 2;
        let wanted = (n * 3 / 2).min(possible);
        while graph.edges.len() < wanted {
            let a = rng.gen_range(0..n);
            let b = rng.gen_range(0..n);
            if a == b || !seen.insert((a.min(b), a.max(b))) {
                continue;
            }
            let weight = rng.gen_range(1..=max_weight);
            graph.edges.push(Edge { a, b, weight, active: false });
        }

        for i in 1..n {
            let source = rng.gen_range(0..i);
            if seen.insert((source, i)) {
                let weight = rng.gen_range(1..=max_weight);
                graph.edges.push(Edge { a: source, b: i, weight, active: false });
            }
        }
        graph
    }

    /// Build a graph from a node spec (`"6"` or `"a,b,c"`) and an edge spec
    /// (`"a-b:3 b-c"`). Unknown endpoints, self loops and duplicate pairs
    /// are skipped.
    pub fn build(nodes_spec: &str, edges_spec: &str, width: f64, height: f64) -> Result<Self, ParseError> {
        let ids = parse_node_ids(nodes_spec)?;
        if ids.len() > MAX_GRAPH_NODES {
            return Err(ParseError::TooMany {
                max: MAX_GRAPH_NODES,
                got: ids.len(),
            });
        }
        let nodes: Vec<GraphNode> = circle_positions(ids.len(), width, height)
            .into_iter()
            .zip(ids)
            .map(|((x, y), id)| GraphNode::new(id, x, y))
            .collect();
        let mut graph = Self {
            nodes,
            edges: Vec::new(),
        };
        for spec in parse_edges(edges_spec) {
            let (Some(a), Some(b)) = (graph.index_of(&spec.a), graph.index_of(&spec.b)) else {
                continue;
            };
            graph.add_edge(a, b, spec.weight);
        }
        Ok(graph)
    }

    /// Add an edge. Returns `false` for self loops, duplicates or unknown nodes.
    pub fn add_edge(&mut self, a: usize, b: usize, weight: u32) -> bool {
        if a == b || a >= self.nodes.len() || b >= self.nodes.len() {
            return false;
        }
        let key = (a.min(b), a.max(b));
        if self.edges.iter().any(|e| e.key() == key) {
            return false;
        }
        self.edges.push(Edge {
            a,
            b,
            weight: weight.max(1),
            active: false,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the node labelled `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Neighbors of `node` in edge insertion order.
    pub fn neighbors(&self, node: usize) -> Vec<usize> {
        self.edges.iter().filter_map(|e| e.other(node)).collect()
    }

    /// Index of the edge joining `a` and `b`.
    pub fn edge_between(&self, a: usize, b: usize) -> Option<usize> {
        let key = (a.min(b), a.max(b));
        self.edges.iter().position(|e| e.key() == key)
    }

    /// Hop count from `start` to every node (`None` if unreachable).
    pub fn hop_distances(&self, start: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.nodes.len()];
        if start >= self.nodes.len() {
            return dist;
        }
        dist[start] = Some(0);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            let d = dist[current].unwrap_or(0);
            for next in self.neighbors(current) {
                if dist[next].is_none() {
                    dist[next] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Whether every node is reachable from node 0.
    pub fn is_connected(&self) -> bool {
        self.nodes.is_empty() || self.hop_distances(0).iter().all(Option::is_some)
    }

    /// Clear visited flags, distances, predecessors and active edges.
    pub fn reset_traversal(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
            node.distance = None;
            node.previous = None;
        }
        for edge in &mut self.edges {
            edge.active = false;
        }
    }
}
