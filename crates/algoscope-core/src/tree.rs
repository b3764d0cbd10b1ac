//! Binary search trees with an optional AVL balancing mode.
//!
//! Nodes are exclusively owned by their parent (`Option<Box<Node>>`).
//! Duplicate values are ignored on insert in both modes.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ParseError;

/// Upper bound on tree size accepted by builds.
pub const MAX_TREE_NODES: usize = 500;

/// Which insertion discipline a tree uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TreeKind {
    /// Plain binary search tree
    #[default]
    Bst,
    /// Height-balanced AVL tree
    Avl,
}

impl FromStr for TreeKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bst" => Ok(Self::Bst),
            "avl" => Ok(Self::Avl),
            other => Err(ParseError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Tree traversal orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Traversal {
    #[default]
    InOrder,
    PreOrder,
    PostOrder,
    LevelOrder,
}

impl Traversal {
    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Traversal::InOrder => "In-Order",
            Traversal::PreOrder => "Pre-Order",
            Traversal::PostOrder => "Post-Order",
            Traversal::LevelOrder => "Level-Order",
        }
    }
}

impl FromStr for Traversal {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "inorder" => Ok(Self::InOrder),
            "preorder" => Ok(Self::PreOrder),
            "postorder" => Ok(Self::PostOrder),
            "levelorder" => Ok(Self::LevelOrder),
            other => Err(ParseError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Display tag on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeMark {
    #[default]
    None,
    Visiting,
    Visited,
}

/// A tree node.
#[derive(Debug, Clone)]
pub struct Node {
    pub value: i64,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
    /// Subtree height; leaves have height 1
    pub height: u32,
    pub mark: NodeMark,
}

impl Node {
    fn new(value: i64) -> Self {
        Self {
            value,
            left: None,
            right: None,
            height: 1,
            mark: NodeMark::None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    /// Left height minus right height.
    pub fn balance(&self) -> i64 {
        i64::from(height_of(&self.left)) - i64::from(height_of(&self.right))
    }
}

fn height_of(node: &Option<Box<Node>>) -> u32 {
    node.as_ref().map_or(0, |n| n.height)
}

fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

fn rotate_left(mut x: Box<Node>) -> Box<Node> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

fn insert_bst(node: Option<Box<Node>>, value: i64, inserted: &mut bool) -> Box<Node> {
    let Some(mut node) = node else {
        *inserted = true;
        return Box::new(Node::new(value));
    };
    match value.cmp(&node.value) {
        Ordering::Less => node.left = Some(insert_bst(node.left.take(), value, inserted)),
        Ordering::Greater => node.right = Some(insert_bst(node.right.take(), value, inserted)),
        Ordering::Equal => return node,
    }
    node.update_height();
    node
}

fn insert_avl(node: Option<Box<Node>>, value: i64, inserted: &mut bool) -> Box<Node> {
    let Some(mut node) = node else {
        *inserted = true;
        return Box::new(Node::new(value));
    };
    match value.cmp(&node.value) {
        Ordering::Less => node.left = Some(insert_avl(node.left.take(), value, inserted)),
        Ordering::Greater => node.right = Some(insert_avl(node.right.take(), value, inserted)),
        Ordering::Equal => return node,
    }
    node.update_height();

    let balance = node.balance();
    if balance > 1 {
        // Left-right case first straightens the left child
        if node.left.as_ref().is_some_and(|l| value > l.value) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        // Right-left case
        if node.right.as_ref().is_some_and(|r| value < r.value) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

/// Configuration for random tree generation.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Fewest nodes generated
    pub min_nodes: usize,
    /// Most nodes generated
    pub max_nodes: usize,
    /// Largest node value; values are drawn from `1..=max_value`
    pub max_value: i64,
    /// Seed for deterministic generation
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_nodes: 7,
            max_nodes: 16,
            max_value: 99,
            seed: 42,
        }
    }
}

/// Position of a node in a rendered layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePosition {
    pub value: i64,
    pub x: f64,
    pub y: f64,
    pub level: usize,
}

/// A binary tree in BST or AVL mode.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    root: Option<Box<Node>>,
    kind: TreeKind,
    len: usize,
}

impl Tree {
    /// Create an empty tree.
    pub fn new(kind: TreeKind) -> Self {
        Self {
            root: None,
            kind,
            len: 0,
        }
    }

    /// Build a tree by inserting `values` in order.
    pub fn build(kind: TreeKind, values: &[i64]) -> Result<Self, ParseError> {
        if values.len() > MAX_TREE_NODES {
            return Err(ParseError::TooMany {
                max: MAX_TREE_NODES,
                got: values.len(),
            });
        }
        let mut tree = Self::new(kind);
        for &v in values {
            tree.insert(v);
        }
        Ok(tree)
    }

    /// Build a random tree of distinct values.
    pub fn generate(kind: TreeKind, config: &TreeConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let max_value = config.max_value.max(1);
        let hi = config.max_nodes.max(config.min_nodes);
        let count = rng
            .gen_range(config.min_nodes..=hi)
            .min(max_value as usize)
            .min(MAX_TREE_NODES);
        let mut values: Vec<i64> = Vec::with_capacity(count);
        while values.len() < count {
            let v = rng.gen_range(1..=max_value);
            if !values.contains(&v) {
                values.push(v);
            }
        }
        let mut tree = Self::new(kind);
        for v in values {
            tree.insert(v);
        }
        tree
    }

    /// Insert a value. Returns `false` if it was already present.
    pub fn insert(&mut self, value: i64) -> bool {
        let mut inserted = false;
        let root = self.root.take();
        self.root = Some(match self.kind {
            TreeKind::Bst => insert_bst(root, value, &mut inserted),
            TreeKind::Avl => insert_avl(root, value, &mut inserted),
        });
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels (0 for an empty tree).
    pub fn height(&self) -> u32 {
        height_of(&self.root)
    }

    /// Whether `value` is in the tree.
    pub fn contains(&self, value: i64) -> bool {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match value.cmp(&n.value) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    /// Values along the search path from the root to `value`.
    pub fn find_path(&self, value: i64) -> Option<Vec<i64>> {
        let mut path = Vec::new();
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            path.push(n.value);
            node = match value.cmp(&n.value) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
                Ordering::Equal => return Some(path),
            };
        }
        None
    }

    /// Node values in the given traversal order.
    pub fn traversal(&self, order: Traversal) -> Vec<i64> {
        fn walk(node: Option<&Node>, order: Traversal, out: &mut Vec<i64>) {
            let Some(n) = node else { return };
            match order {
                Traversal::PreOrder => {
                    out.push(n.value);
                    walk(n.left.as_deref(), order, out);
                    walk(n.right.as_deref(), order, out);
                }
                Traversal::PostOrder => {
                    walk(n.left.as_deref(), order, out);
                    walk(n.right.as_deref(), order, out);
                    out.push(n.value);
                }
                _ => {
                    walk(n.left.as_deref(), order, out);
                    out.push(n.value);
                    walk(n.right.as_deref(), order, out);
                }
            }
        }

        let mut out = Vec::with_capacity(self.len);
        if order == Traversal::LevelOrder {
            let mut queue: VecDeque<&Node> = self.root.as_deref().into_iter().collect();
            while let Some(n) = queue.pop_front() {
                out.push(n.value);
                queue.extend(n.left.as_deref());
                queue.extend(n.right.as_deref());
            }
        } else {
            walk(self.root.as_deref(), order, &mut out);
        }
        out
    }

    /// Balance factor of the node holding `value`.
    pub fn balance_factor(&self, value: i64) -> Option<i64> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match value.cmp(&n.value) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
                Ordering::Equal => return Some(n.balance()),
            };
        }
        None
    }

    /// Whether every node's balance factor is in {-1, 0, 1}.
    pub fn is_balanced(&self) -> bool {
        fn check(node: Option<&Node>) -> bool {
            match node {
                None => true,
                Some(n) => {
                    n.balance().abs() <= 1
                        && check(n.left.as_deref())
                        && check(n.right.as_deref())
                }
            }
        }
        check(self.root.as_deref())
    }

    /// Whether the search ordering holds everywhere.
    pub fn is_search_tree(&self) -> bool {
        fn check(node: Option<&Node>, lo: Option<i64>, hi: Option<i64>) -> bool {
            let Some(n) = node else { return true };
            if lo.is_some_and(|lo| n.value <= lo) || hi.is_some_and(|hi| n.value >= hi) {
                return false;
            }
            check(n.left.as_deref(), lo, Some(n.value)) && check(n.right.as_deref(), Some(n.value), hi)
        }
        check(self.root.as_deref(), None, None)
    }

    /// Set the display mark on the node holding `value`.
    pub fn set_mark(&mut self, value: i64, mark: NodeMark) -> bool {
        let mut node = self.root.as_deref_mut();
        while let Some(n) = node {
            node = match value.cmp(&n.value) {
                Ordering::Less => n.left.as_deref_mut(),
                Ordering::Greater => n.right.as_deref_mut(),
                Ordering::Equal => {
                    n.mark = mark;
                    return true;
                }
            };
        }
        false
    }

    /// Clear every display mark.
    pub fn clear_marks(&mut self) {
        fn clear(node: Option<&mut Node>) {
            if let Some(n) = node {
                n.mark = NodeMark::None;
                clear(n.left.as_deref_mut());
                clear(n.right.as_deref_mut());
            }
        }
        clear(self.root.as_deref_mut());
    }

    /// Mark of the node holding `value`.
    pub fn mark_of(&self, value: i64) -> Option<NodeMark> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match value.cmp(&n.value) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
                Ordering::Equal => return Some(n.mark),
            };
        }
        None
    }

    /// Parent/child value pairs, parents first.
    pub fn edges(&self) -> Vec<(i64, i64)> {
        let mut edges = Vec::new();
        let mut queue: VecDeque<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(n) = queue.pop_front() {
            for child in [n.left.as_deref(), n.right.as_deref()].into_iter().flatten() {
                edges.push((n.value, child.value));
                queue.push_back(child);
            }
        }
        edges
    }

    /// Level-by-level layout spread evenly across `width`.
    pub fn layout(&self, width: f64, height: f64) -> Vec<NodePosition> {
        let levels = self.height() as usize;
        if levels == 0 {
            return Vec::new();
        }
        let level_height = (height / (levels as f64 + 1.0)).floor().clamp(40.0, 100.0);

        let mut by_level: Vec<Vec<i64>> = vec![Vec::new(); levels];
        let mut queue: VecDeque<(&Node, usize)> = VecDeque::new();
        if let Some(root) = self.root.as_deref() {
            queue.push_back((root, 0));
        }
        while let Some((n, level)) = queue.pop_front() {
            by_level[level].push(n.value);
            if let Some(l) = n.left.as_deref() {
                queue.push_back((l, level + 1));
            }
            if let Some(r) = n.right.as_deref() {
                queue.push_back((r, level + 1));
            }
        }

        let mut positions = Vec::with_capacity(self.len);
        for (level, values) in by_level.iter().enumerate() {
            let spacing = width / (values.len() as f64 + 1.0);
            for (i, &value) in values.iter().enumerate() {
                positions.push(NodePosition {
                    value,
                    x: spacing * (i as f64 + 1.0),
                    y: level_height * (level as f64 + 1.0),
                    level,
                });
            }
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bst_shape_and_orders() {
        let tree = Tree::build(TreeKind::Bst, &[50, 30, 70, 20, 40, 60, 80]).unwrap();
        assert_eq!(tree.len(), 7);
        assert_eq!(tree.traversal(Traversal::InOrder), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(tree.traversal(Traversal::PreOrder), vec![50, 30, 20, 40, 70, 60, 80]);
        assert_eq!(tree.traversal(Traversal::PostOrder), vec![20, 40, 30, 60, 80, 70, 50]);
        assert_eq!(tree.traversal(Traversal::LevelOrder), vec![50, 30, 70, 20, 40, 60, 80]);
    }

    #[test]
    fn duplicates_ignored() {
        let mut tree = Tree::new(TreeKind::Bst);
        assert!(tree.insert(5));
        assert!(!tree.insert(5));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn avl_rotates_sorted_input() {
        let tree = Tree::build(TreeKind::Avl, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(tree.root().unwrap().value, 4);
        assert_eq!(tree.height(), 3);
        assert!(tree.is_balanced());

        let skewed = Tree::build(TreeKind::Bst, &[1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(skewed.height(), 7);
        assert!(!skewed.is_balanced());
    }

    #[test]
    fn avl_double_rotations() {
        let lr = Tree::build(TreeKind::Avl, &[30, 10, 20]).unwrap();
        assert_eq!(lr.root().unwrap().value, 20);
        let rl = Tree::build(TreeKind::Avl, &[10, 30, 20]).unwrap();
        assert_eq!(rl.root().unwrap().value, 20);
    }

    #[test]
    fn path_and_marks() {
        let mut tree = Tree::build(TreeKind::Bst, &[50, 30, 70, 40]).unwrap();
        assert_eq!(tree.find_path(40), Some(vec![50, 30, 40]));
        assert_eq!(tree.find_path(99), None);

        assert!(tree.set_mark(30, NodeMark::Visited));
        assert_eq!(tree.mark_of(30), Some(NodeMark::Visited));
        tree.clear_marks();
        assert_eq!(tree.mark_of(30), Some(NodeMark::None));
        assert!(!tree.set_mark(31, NodeMark::Visited));
    }

    #[test]
    fn layout_spreads_levels() {
        let tree = Tree::build(TreeKind::Bst, &[50, 30, 70]).unwrap();
        let layout = tree.layout(800.0, 350.0);
        assert_eq!(layout.len(), 3);
        let root = layout.iter().find(|p| p.value == 50).unwrap();
        assert_eq!(root.level, 0);
        assert!((root.x - 400.0).abs() < f64::EPSILON);
        let left = layout.iter().find(|p| p.value == 30).unwrap();
        assert!(left.x < root.x && left.y > root.y);
    }

    #[test]
    fn generated_tree_is_valid() {
        for kind in [TreeKind::Bst, TreeKind::Avl] {
            let tree = Tree::generate(kind, &TreeConfig::default());
            assert!((7..=16).contains(&tree.len()));
            assert!(tree.is_search_tree());
        }
    }

    #[test]
    fn names_parse() {
        assert_eq!("avl".parse::<TreeKind>(), Ok(TreeKind::Avl));
        assert_eq!("level-order".parse::<Traversal>(), Ok(Traversal::LevelOrder));
        assert_eq!("inorder".parse::<Traversal>(), Ok(Traversal::InOrder));
        assert!("sideways".parse::<Traversal>().is_err());
    }

    proptest! {
        #[test]
        fn in_order_is_strictly_ascending(values in proptest::collection::vec(-1000i64..1000, 0..60)) {
            for kind in [TreeKind::Bst, TreeKind::Avl] {
                let tree = Tree::build(kind, &values).unwrap();
                let order = tree.traversal(Traversal::InOrder);
                prop_assert!(order.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(tree.is_search_tree());
            }
        }

        #[test]
        fn avl_stays_balanced_after_every_insert(values in proptest::collection::vec(0i64..500, 1..80)) {
            let mut tree = Tree::new(TreeKind::Avl);
            for v in values {
                tree.insert(v);
                prop_assert!(tree.is_balanced());
            }
        }
    }
}
