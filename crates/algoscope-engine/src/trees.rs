//! Tree traversal engine.
//!
//! Visiting a node is the only checkpoint kind: the node is rendered as
//! visiting, paced, appended to the visit order, rendered as visited and
//! paced again.

use std::time::Duration;

use algoscope_core::{parse_tree_values, NodeMark, ParseError, Traversal, Tree, TreeConfig, TreeKind, MAX_TREE_NODES};
use tracing::{debug, info};

use crate::control::{Outcome, RunControl, RunToken};
use crate::error::{Error, Result};
use crate::pacer::{Pacer, PacerConfig};
use crate::sink::{Frame, Highlight, HighlightKind, Scene, Sinks, TreeNodeView};

/// Delay between nodes when highlighting a search path.
const PATH_STEP: Duration = Duration::from_millis(200);

fn join_order(order: &[i64]) -> String {
    order
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Checkpointed traversal over a BST or AVL tree.
#[derive(Debug)]
pub struct TreeEngine {
    tree: Tree,
    traversal: Traversal,
    control: RunControl,
    pacer: Pacer,
    sinks: Sinks,
    order: Vec<i64>,
    width: f64,
    height: f64,
}

impl TreeEngine {
    pub fn new(control: RunControl, sinks: Sinks) -> Self {
        Self {
            tree: Tree::default(),
            traversal: Traversal::default(),
            control,
            pacer: Pacer::new(PacerConfig::trees()),
            sinks,
            order: Vec::new(),
            width: 800.0,
            height: 350.0,
        }
    }

    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn traversal(&self) -> Traversal {
        self.traversal
    }

    /// Values visited so far in the current or last run.
    pub fn order(&self) -> &[i64] {
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

    pub fn set_traversal(&mut self, traversal: Traversal) -> Result<()> {
        self.ensure_idle()?;
        self.traversal = traversal;
        Ok(())
    }

    fn replace(&mut self, tree: Tree) {
        self.tree = tree;
        self.order.clear();
        self.sinks.render(&self.frame(Vec::new()));
        self.sinks.status(&format!(
            "Tree: {} | Traversal: {}",
            match self.tree.kind() {
                TreeKind::Bst => "BST",
                TreeKind::Avl => "AVL",
            },
            self.traversal.display_name()
        ));
    }

    /// Replace the tree with a random one.
    pub fn generate(&mut self, kind: TreeKind, config: &TreeConfig) -> Result<()> {
        self.ensure_idle()?;
        self.replace(Tree::generate(kind, config));
        Ok(())
    }

    /// Build a tree from user-typed integers, inserted left to right.
    pub fn build_from_text(&mut self, kind: TreeKind, text: &str) -> Result<()> {
        self.ensure_idle()?;
        let values = parse_tree_values(text)?;
        self.replace(Tree::build(kind, &values)?);
        Ok(())
    }

    /// Insert one value. Returns `false` for a duplicate.
    ///
    /// A tree already holding `MAX_TREE_NODES` values refuses new ones.
    pub fn insert(&mut self, value: i64) -> Result<bool> {
        self.ensure_idle()?;
        if self.tree.len() >= MAX_TREE_NODES && !self.tree.contains(value) {
            self.sinks
                .status(&format!("Tree is full ({MAX_TREE_NODES} nodes)"));
            return Err(ParseError::TooMany {
                max: MAX_TREE_NODES,
                got: self.tree.len() + 1,
            }
            .into());
        }
        let inserted = self.tree.insert(value);
        self.sinks.render(&self.frame(Vec::new()));
        if inserted {
            self.sinks.status(&format!("Inserted {value}"));
        } else {
            self.sinks.status(&format!("{value} is already in the tree"));
        }
        Ok(inserted)
    }

    fn frame(&self, highlights: Vec<Highlight>) -> Frame {
        let nodes = self
            .tree
            .layout(self.width, self.height)
            .into_iter()
            .map(|p| TreeNodeView {
                value: p.value,
                x: p.x,
                y: p.y,
                mark: self.tree.mark_of(p.value).unwrap_or_default(),
            })
            .collect();
        Frame::new(Scene::Tree {
            nodes,
            edges: self.tree.edges(),
        })
        .with_highlights(highlights)
    }

    async fn visit(&mut self, token: &RunToken, value: i64) -> Result<()> {
        self.tree.set_mark(value, NodeMark::Visiting);
        let frame = self
            .frame(vec![Highlight::node(value, HighlightKind::Visiting)])
            .with_caption(format!("Visiting {value}"));
        self.sinks.render(&frame);
        self.pacer.pace(token).await?;

        self.order.push(value);
        self.tree.set_mark(value, NodeMark::Visited);
        let frame = self
            .frame(vec![Highlight::node(value, HighlightKind::Visited)])
            .with_caption(join_order(&self.order));
        self.sinks.render(&frame);
        self.pacer.pace(token).await
    }

    /// Walk the tree in the selected order.
    ///
    /// Resolves with the visit order, or `Cancelled` with the order cleared
    /// if the control is reset mid-walk.
    pub async fn start(&mut self) -> Outcome<Vec<i64>> {
        if self.tree.is_empty() {
            return Outcome::Rejected;
        }
        let Some(token) = self.control.begin() else {
            return Outcome::Rejected;
        };

        info!(traversal = self.traversal.display_name(), nodes = self.tree.len(), "traversal started");
        self.tree.clear_marks();
        self.order.clear();

        let mut result = Ok(());
        for value in self.tree.traversal(self.traversal) {
            result = self.visit(&token, value).await;
            if result.is_err() {
                break;
            }
        }

        match result {
            Ok(()) => {
                self.sinks.status(&format!(
                    "{} traversal: {}",
                    self.traversal.display_name(),
                    join_order(&self.order)
                ));
                self.control.finish(&token);
                info!(traversal = self.traversal.display_name(), "traversal finished");
                Outcome::Completed(self.order.clone())
            }
            Err(e) => {
                debug!(error = %e, "traversal stopped");
                self.clear();
                Outcome::Cancelled
            }
        }
    }

    /// Drop the visit order and every mark.
    pub fn clear(&mut self) {
        self.order.clear();
        self.tree.clear_marks();
        self.sinks.render(&self.frame(Vec::new()));
    }

    /// Light up the search path from the root to `value`, one node at a time.
    pub async fn highlight_path(&mut self, value: i64) -> Result<Vec<i64>> {
        let Some(path) = self.tree.find_path(value) else {
            self.sinks.status(&format!("{value} is not in the tree"));
            return Ok(Vec::new());
        };
        let token = self.control.begin().ok_or(Error::Busy)?;
        self.tree.clear_marks();

        let mut lit = Vec::with_capacity(path.len());
        for (i, &node) in path.iter().enumerate() {
            if i > 0 {
                if let Err(e) = self.pacer.wait(&token, PATH_STEP).await {
                    self.clear();
                    return Err(e);
                }
            }
            self.tree.set_mark(node, NodeMark::Visiting);
            lit.push(Highlight::node(node, HighlightKind::Path));
            self.sinks.render(&self.frame(lit.clone()));
        }
        self.control.finish(&token);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::control::RunState;
    use crate::sink::RecordingSink;
    use tokio::time::{sleep, Instant};

    fn engine(control: RunControl) -> (TreeEngine, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let mut engine = TreeEngine::new(control, Sinks::recording(sink.clone()));
        engine.build_from_text(TreeKind::Bst, "50 30 70 20 40 60 80").unwrap();
        sink.clear();
        (engine, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn every_order_visits_every_node() {
        let cases = [
            (Traversal::InOrder, vec![20, 30, 40, 50, 60, 70, 80]),
            (Traversal::PreOrder, vec![50, 30, 20, 40, 70, 60, 80]),
            (Traversal::PostOrder, vec![20, 40, 30, 60, 80, 70, 50]),
            (Traversal::LevelOrder, vec![50, 30, 70, 20, 40, 60, 80]),
        ];
        for (traversal, expected) in cases {
            let (mut engine, _) = engine(RunControl::new());
            engine.set_traversal(traversal).unwrap();
            assert_eq!(engine.start().await.completed().unwrap(), expected);
            assert_eq!(engine.control().state(), RunState::Done);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn each_visit_renders_visiting_then_visited() {
        let (mut engine, sink) = engine(RunControl::new());
        engine.start().await;
        let frames = sink.frames();
        assert_eq!(frames.len(), 14);
        assert_eq!(frames[0].highlights, vec![Highlight::node(20, HighlightKind::Visiting)]);
        assert_eq!(frames[1].highlights, vec![Highlight::node(20, HighlightKind::Visited)]);
        assert_eq!(frames[13].caption.as_deref(), Some("20 → 30 → 40 → 50 → 60 → 70 → 80"));
    }

    #[tokio::test(start_paused = true)]
    async fn visit_paces_twice_per_node() {
        let (mut engine, _) = engine(RunControl::new());
        let start = Instant::now();
        engine.start().await;
        // speed 50 → 510 ms per pace, two per node
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(510 * 14));
        assert!(elapsed < Duration::from_millis(510 * 14 + 100));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_mid_run_clears_order() {
        let control = RunControl::new();
        let (mut engine, _) = engine(control.clone());
        let resetter = control.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(1500)).await;
            resetter.pause();
            sleep(Duration::from_millis(1000)).await;
            resetter.reset();
        });
        assert!(engine.start().await.is_cancelled());
        assert!(engine.order().is_empty());
        assert_eq!(control.state(), RunState::Idle);
        assert_eq!(engine.tree().mark_of(20), Some(NodeMark::None));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_tree_is_rejected() {
        let mut engine = TreeEngine::new(RunControl::new(), Sinks::recording(Arc::new(RecordingSink::new())));
        assert!(engine.start().await.is_rejected());
    }

    #[tokio::test(start_paused = true)]
    async fn highlight_path_marks_ancestors() {
        let (mut engine, sink) = engine(RunControl::new());
        let path = engine.highlight_path(60).await.unwrap();
        assert_eq!(path, vec![50, 70, 60]);
        assert_eq!(sink.last_frame().unwrap().highlights.len(), 3);
        assert!(engine.highlight_path(99).await.unwrap().is_empty());
    }

    #[test]
    fn insert_stops_at_node_limit() {
        let (mut engine, sink) = engine(RunControl::new());
        engine.build_from_text(TreeKind::Avl, "0").unwrap();
        for v in 1..MAX_TREE_NODES as i64 {
            assert!(engine.insert(v).unwrap());
        }
        assert_eq!(engine.tree().len(), MAX_TREE_NODES);

        let overflow = engine.insert(MAX_TREE_NODES as i64);
        assert_eq!(
            overflow,
            Err(Error::InvalidInput(ParseError::TooMany {
                max: MAX_TREE_NODES,
                got: MAX_TREE_NODES + 1,
            }))
        );
        assert_eq!(engine.tree().len(), MAX_TREE_NODES);
        assert!(sink.last_message().unwrap().starts_with("Tree is full"));
        assert!(!engine.insert(7).unwrap());
    }

    #[test]
    fn inserts_and_rejects_duplicates() {
        let (mut engine, sink) = engine(RunControl::new());
        assert!(engine.insert(65).unwrap());
        assert!(!engine.insert(65).unwrap());
        assert_eq!(sink.last_message().unwrap(), "65 is already in the tree");
        assert!(engine.build_from_text(TreeKind::Avl, "1 2 x").is_err());
    }
}
