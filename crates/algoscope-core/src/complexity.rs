//! Sorting algorithm identifiers and their complexity metadata.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// The sorting algorithms the engines implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortAlgorithm {
    #[default]
    Bubble,
    Quick,
    Merge,
    Heap,
}

impl SortAlgorithm {
    pub const ALL: [SortAlgorithm; 4] = [
        SortAlgorithm::Bubble,
        SortAlgorithm::Quick,
        SortAlgorithm::Merge,
        SortAlgorithm::Heap,
    ];

    /// Short key used in the HTTP API and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            SortAlgorithm::Bubble => "bubble",
            SortAlgorithm::Quick => "quick",
            SortAlgorithm::Merge => "merge",
            SortAlgorithm::Heap => "heap",
        }
    }

    pub fn complexity(self) -> Complexity {
        match self {
            SortAlgorithm::Bubble => Complexity {
                name: "Bubble Sort",
                description: "Repeatedly steps through the list, compares adjacent elements and swaps them if they're in the wrong order.",
                time_best: "O(n)",
                time_average: "O(n²)",
                time_worst: "O(n²)",
                space: "O(1)",
                stable: true,
                in_place: true,
            },
            SortAlgorithm::Quick => Complexity {
                name: "Quick Sort",
                description: "Divides the array into partitions around a pivot element, then recursively sorts the partitions.",
                time_best: "O(n log n)",
                time_average: "O(n log n)",
                time_worst: "O(n²)",
                space: "O(log n)",
                stable: false,
                in_place: true,
            },
            SortAlgorithm::Merge => Complexity {
                name: "Merge Sort",
                description: "Divides the array into halves, recursively sorts them, then merges the sorted halves.",
                time_best: "O(n log n)",
                time_average: "O(n log n)",
                time_worst: "O(n log n)",
                space: "O(n)",
                stable: true,
                in_place: false,
            },
            SortAlgorithm::Heap => Complexity {
                name: "Heap Sort",
                description: "Builds a max heap from the array, then repeatedly extracts the maximum element.",
                time_best: "O(n log n)",
                time_average: "O(n log n)",
                time_worst: "O(n log n)",
                space: "O(1)",
                stable: false,
                in_place: true,
            },
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.complexity().name)
    }
}

impl FromStr for SortAlgorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.strip_suffix("sort").unwrap_or(&key).trim_end_matches(['-', '_', ' ']);
        SortAlgorithm::ALL
            .into_iter()
            .find(|a| a.key() == key)
            .ok_or_else(|| ParseError::UnknownAlgorithm(s.to_string()))
    }
}

/// Informational complexity facts for one algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Complexity {
    pub name: &'static str,
    pub description: &'static str,
    pub time_best: &'static str,
    pub time_average: &'static str,
    pub time_worst: &'static str,
    pub space: &'static str,
    pub stable: bool,
    pub in_place: bool,
}

/// Complexity metadata keyed by algorithm key.
pub fn complexity_table() -> BTreeMap<&'static str, Complexity> {
    SortAlgorithm::ALL
        .into_iter()
        .map(|a| (a.key(), a.complexity()))
        .collect()
}
