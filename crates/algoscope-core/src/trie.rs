//! String tries: standard, compressed (radix) and suffix.
//!
//! Children are kept in a `BTreeMap`, so `all_words` is lexicographic.

use std::collections::BTreeMap;

fn first_char(s: &str) -> Option<char> {
    s.chars().next()
}

/// Byte length of the longest common prefix, on char boundaries.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, ca), cb)| ca != cb)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    end_of_word: bool,
}

/// One node per character.
#[derive(Debug, Clone, Default)]
pub struct StandardTrie {
    root: TrieNode,
}

impl StandardTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for ch in word.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.end_of_word = true;
    }

    fn find(&self, prefix: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for ch in prefix.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }

    pub fn search(&self, word: &str) -> bool {
        self.find(word).is_some_and(|n| n.end_of_word)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.find(prefix).is_some()
    }

    /// Remove `word`, pruning branches that no longer lead to a word.
    /// Returns whether the word was present.
    pub fn delete(&mut self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        Self::delete_from(&mut self.root, &chars).is_some()
    }

    /// `Some(prune)` when the word was removed below `node`.
    fn delete_from(node: &mut TrieNode, word: &[char]) -> Option<bool> {
        let Some((&ch, rest)) = word.split_first() else {
            if !node.end_of_word {
                return None;
            }
            node.end_of_word = false;
            return Some(node.children.is_empty());
        };
        let child = node.children.get_mut(&ch)?;
        if Self::delete_from(child, rest)? {
            node.children.remove(&ch);
        }
        Some(node.children.is_empty() && !node.end_of_word)
    }

    pub fn all_words(&self) -> Vec<String> {
        fn collect(node: &TrieNode, prefix: &mut String, out: &mut Vec<String>) {
            if node.end_of_word {
                out.push(prefix.clone());
            }
            for (ch, child) in &node.children {
                prefix.push(*ch);
                collect(child, prefix, out);
                prefix.pop();
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut String::new(), &mut out);
        out
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        fn count(node: &TrieNode) -> usize {
            1 + node.children.values().map(count).sum::<usize>()
        }
        count(&self.root)
    }
}

#[derive(Debug, Clone, Default)]
struct RadixNode {
    label: String,
    children: BTreeMap<char, RadixNode>,
    end_of_word: bool,
}

impl RadixNode {
    fn leaf(label: &str) -> Self {
        Self {
            label: label.to_string(),
            children: BTreeMap::new(),
            end_of_word: true,
        }
    }
}

/// Radix trie: chains of single-child nodes are collapsed into one edge label.
#[derive(Debug, Clone, Default)]
pub struct CompressedTrie {
    root: RadixNode,
}

impl CompressedTrie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word: &str) {
        Self::insert_into(&mut self.root, word);
    }

    fn insert_into(node: &mut RadixNode, word: &str) {
        let Some(first) = first_char(word) else {
            node.end_of_word = true;
            return;
        };
        let Some(child) = node.children.get_mut(&first) else {
            node.children.insert(first, RadixNode::leaf(word));
            return;
        };
        let common = common_prefix_len(word, &child.label);
        if common == child.label.len() {
            Self::insert_into(child, &word[common..]);
            return;
        }

        // Split the edge at the divergence point.
        let tail = RadixNode {
            label: child.label[common..].to_string(),
            children: std::mem::take(&mut child.children),
            end_of_word: child.end_of_word,
        };
        child.label.truncate(common);
        child.end_of_word = false;
        if let Some(ch) = first_char(&tail.label) {
            child.children.insert(ch, tail);
        }
        let rest = &word[common..];
        match first_char(rest) {
            None => child.end_of_word = true,
            Some(ch) => {
                child.children.insert(ch, RadixNode::leaf(rest));
            }
        }
    }

    pub fn search(&self, word: &str) -> bool {
        let mut node = &self.root;
        let mut rest = word;
        loop {
            let Some(first) = first_char(rest) else {
                return node.end_of_word;
            };
            let Some(child) = node.children.get(&first) else {
                return false;
            };
            let Some(tail) = rest.strip_prefix(child.label.as_str()) else {
                return false;
            };
            rest = tail;
            node = child;
        }
    }

    /// Whether any stored word begins with `prefix`. The prefix may end
    /// partway through an edge label.
    pub fn starts_with(&self, prefix: &str) -> bool {
        let mut node = &self.root;
        let mut rest = prefix;
        loop {
            let Some(first) = first_char(rest) else {
                return true;
            };
            let Some(child) = node.children.get(&first) else {
                return false;
            };
            if child.label.starts_with(rest) {
                return true;
            }
            let Some(tail) = rest.strip_prefix(child.label.as_str()) else {
                return false;
            };
            rest = tail;
            node = child;
        }
    }

    /// Remove `word`. Emptied branches are pruned and a non-word node left
    /// with a single child is merged into it.
    pub fn delete(&mut self, word: &str) -> bool {
        Self::delete_from(&mut self.root, word).is_some()
    }

    fn delete_from(node: &mut RadixNode, word: &str) -> Option<bool> {
        let Some(first) = first_char(word) else {
            if !node.end_of_word {
                return None;
            }
            node.end_of_word = false;
            return Some(node.children.is_empty());
        };
        let child = node.children.get_mut(&first)?;
        let rest = word.strip_prefix(child.label.as_str())?;
        if !Self::delete_from(child, rest)? {
            Self::merge_single_child(child);
            return Some(false);
        }
        node.children.remove(&first);
        Some(node.children.is_empty() && !node.end_of_word)
    }

    fn merge_single_child(node: &mut RadixNode) {
        if node.end_of_word || node.children.len() != 1 {
            return;
        }
        let Some((_, only)) = node.children.pop_first() else {
            return;
        };
        node.label.push_str(&only.label);
        node.children = only.children;
        node.end_of_word = only.end_of_word;
    }

    pub fn all_words(&self) -> Vec<String> {
        fn collect(node: &RadixNode, prefix: &mut String, out: &mut Vec<String>) {
            prefix.push_str(&node.label);
            if node.end_of_word {
                out.push(prefix.clone());
            }
            for child in node.children.values() {
                collect(child, prefix, out);
            }
            prefix.truncate(prefix.len() - node.label.len());
        }
        let mut out = Vec::new();
        collect(&self.root, &mut String::new(), &mut out);
        out
    }

    /// Edge labels in depth-first order, root excluded.
    pub fn labels(&self) -> Vec<String> {
        fn collect(node: &RadixNode, out: &mut Vec<String>) {
            for child in node.children.values() {
                out.push(child.label.clone());
                collect(child, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }
}

#[derive(Debug, Clone, Default)]
struct SuffixNode {
    children: BTreeMap<char, SuffixNode>,
    indexes: Vec<usize>,
}

/// Trie of every suffix of a text; each node remembers which suffixes pass
/// through it.
#[derive(Debug, Clone)]
pub struct SuffixTrie {
    root: SuffixNode,
    text: String,
}

impl SuffixTrie {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut root = SuffixNode::default();
        for start in 0..chars.len() {
            let mut node = &mut root;
            for ch in &chars[start..] {
                node = node.children.entry(*ch).or_default();
                node.indexes.push(start);
            }
        }
        Self {
            root,
            text: text.to_string(),
        }
    }

    /// Every start position (in chars) where `pattern` occurs, ascending.
    pub fn search(&self, pattern: &str) -> Vec<usize> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let mut node = &self.root;
        for ch in pattern.chars() {
            match node.children.get(&ch) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }
        node.indexes.clone()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_trie_operations() {
        let mut trie = StandardTrie::new();
        for w in ["tea", "ten", "to", "inn", "in"] {
            trie.insert(w);
        }
        assert!(trie.search("ten"));
        assert!(!trie.search("te"));
        assert!(trie.starts_with("te"));
        assert!(!trie.starts_with("x"));
        assert_eq!(trie.all_words(), vec!["in", "inn", "tea", "ten", "to"]);

        assert!(trie.delete("inn"));
        assert!(!trie.delete("inn"));
        assert!(trie.search("in"));
        assert!(!trie.starts_with("inn"));
    }

    #[test]
    fn standard_trie_prunes_branches() {
        let mut trie = StandardTrie::new();
        trie.insert("abc");
        assert_eq!(trie.node_count(), 4);
        assert!(trie.delete("abc"));
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn compressed_trie_splits_edges() {
        let mut trie = CompressedTrie::new();
        trie.insert("romane");
        trie.insert("romanus");
        trie.insert("romulus");
        assert_eq!(trie.labels(), vec!["rom", "an", "e", "us", "ulus"]);
        assert!(trie.search("romanus"));
        assert!(!trie.search("roman"));
        assert!(trie.starts_with("roma"));
        assert!(trie.starts_with("romu"));
        assert!(!trie.starts_with("rome"));
        assert_eq!(trie.all_words(), vec!["romane", "romanus", "romulus"]);
    }

    #[test]
    fn compressed_trie_word_at_split_point() {
        let mut trie = CompressedTrie::new();
        trie.insert("test");
        trie.insert("te");
        assert!(trie.search("te"));
        assert!(trie.search("test"));
        assert_eq!(trie.labels(), vec!["te", "st"]);
    }

    #[test]
    fn compressed_trie_delete_merges() {
        let mut trie = CompressedTrie::new();
        trie.insert("romane");
        trie.insert("romanus");
        assert!(trie.delete("romane"));
        assert_eq!(trie.labels(), vec!["romanus"]);
        assert!(trie.search("romanus"));
        assert!(!trie.delete("roman"));
        assert!(trie.delete("romanus"));
        assert!(trie.all_words().is_empty());
    }

    #[test]
    fn suffix_trie_finds_all_occurrences() {
        let trie = SuffixTrie::new("banana");
        assert_eq!(trie.search("ana"), vec![1, 3]);
        assert_eq!(trie.search("a"), vec![1, 3, 5]);
        assert_eq!(trie.search("banana"), vec![0]);
        assert!(trie.search("nab").is_empty());
        assert!(trie.search("").is_empty());
        assert_eq!(trie.text(), "banana");
    }
}
