//! Algoscope Core
//!
//! Data model for the algorithm visualizer. Everything here is synchronous
//! and free of rendering concerns.
//!
//! # Contents
//!
//! - **Sequences**: random and user-supplied arrays for the sorting engines
//! - **Trees**: BST and AVL insertion, traversal orders, layout
//! - **Graphs**: connected random graphs on a circular layout
//! - **Structures**: stack, queue, array, deque and circular queue
//! - **Tries**: standard, compressed and suffix tries
//! - **Complexity**: per-algorithm complexity metadata
//!
//! Generation is seeded (`ArrayConfig`, `TreeConfig`, `GraphConfig`) so a
//! run can be replayed exactly.

mod complexity;
mod error;
mod graph;
mod input;
mod sequence;
mod structures;
mod tree;
mod trie;

pub use complexity::{complexity_table, Complexity, SortAlgorithm};
pub use error::{ParseError, StructureError};
pub use graph::{Edge, Graph, GraphConfig, GraphNode, MAX_GRAPH_NODES};
pub use input::{parse_edges, parse_node_ids, parse_number_list, parse_tree_values, parse_value, EdgeSpec};
pub use sequence::{
    count_inversions, format_value, generate_sequence, is_sorted, parse_custom_sequence, ArrayConfig,
    MAX_SEQUENCE_LEN, MIN_CUSTOM_LEN,
};
pub use structures::{
    random_items, ArrayList, CircularQueue, Deque, DequeOp, Queue, Stack, DEFAULT_CIRCULAR_CAPACITY,
    MAX_CIRCULAR_CAPACITY, MIN_CIRCULAR_CAPACITY,
};
pub use tree::{Node, NodeMark, NodePosition, Traversal, Tree, TreeConfig, TreeKind, MAX_TREE_NODES};
pub use trie::{CompressedTrie, StandardTrie, SuffixTrie};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generators_agree_with_bounds() {
        assert!(generate_sequence(&ArrayConfig::default()).len() <= MAX_SEQUENCE_LEN);
        assert!(Tree::generate(TreeKind::Avl, &TreeConfig::default()).len() <= MAX_TREE_NODES);
        assert!(Graph::generate(&GraphConfig::default()).len() <= MAX_GRAPH_NODES);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn complexity_table_serializes_by_key() {
        let json = serde_json::to_value(complexity_table()).unwrap();
        assert_eq!(json["bubble"]["name"], "Bubble Sort");
        assert_eq!(json["merge"]["in_place"], false);
        assert_eq!(json["quick"]["time_worst"], "O(n²)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn algorithm_keys_are_lowercase_on_the_wire() {
        let json = serde_json::to_string(&SortAlgorithm::Heap).unwrap();
        assert_eq!(json, "\"heap\"");
        let back: SortAlgorithm = serde_json::from_str("\"quick\"").unwrap();
        assert_eq!(back, SortAlgorithm::Quick);
    }
}
