//! Tree node data model
//!
//! A [`Node`] owns its children; a tree is simply its root node. Identity is
//! the `id` string alone. Uniqueness of ids within one tree is assumed and
//! never checked.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::domain::iter::{PostOrderIter, PreOrderIter};

/// A vertex of a rooted, ordered tree carrying an opaque payload.
///
/// The tree operations accept any payload. Serde is a different matter: the
/// payload is flattened into the node's object, so `T` must serialize as a
/// struct, a map or `()`. Scalar payloads such as `u32` fail to serialize
/// with "can only flatten structs and maps".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node<T> {
    /// Identifier, unique within the tree
    pub id: String,
    /// Caller payload, serialized inline with `id` and `children`
    #[serde(flatten)]
    pub data: T,
    /// Ordered children, may be empty
    #[serde(default = "Vec::new")]
    pub children: Vec<Node<T>>,
}

impl<T> Node<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node<T>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of levels in this subtree; a leaf has height 1.
    pub fn height(&self) -> usize {
        // Post-order leaves the heights of a node's children on top of the stack
        let mut heights: Vec<usize> = Vec::new();
        for node in self.iter_postorder() {
            let split = heights.len() - node.children.len();
            let tallest = heights.drain(split..).max().unwrap_or(0);
            heights.push(tallest + 1);
        }
        heights.pop().unwrap_or(1)
    }

    /// Ids of all leaf nodes, in pre-order.
    pub fn leaves(&self) -> Vec<&str> {
        self.iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.id.as_str())
            .collect()
    }

    /// Pre-order iterator: a node before its children, children left to right.
    pub fn iter(&self) -> PreOrderIter<'_, T> {
        PreOrderIter::new(self)
    }

    /// Post-order iterator: children left to right before their parent.
    pub fn iter_postorder(&self) -> PostOrderIter<'_, T> {
        PostOrderIter::new(self)
    }
}

impl<T: Default> Node<T> {
    /// Node with a default payload and no children.
    pub fn leaf(id: impl Into<String>) -> Self {
        Self::new(id, T::default())
    }
}

impl<'a, T> IntoIterator for &'a Node<T> {
    type Item = &'a Node<T>;
    type IntoIter = PreOrderIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A node found inside a tree, together with its ancestors.
///
/// Borrows from the searched tree. Dereferences to the matched [`Node`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInTree<'a, T> {
    /// The matched node
    pub node: &'a Node<T>,
    /// Ancestors, nearest parent first, ending at the root
    pub path_to_root: Vec<&'a Node<T>>,
}

impl<'a, T> NodeInTree<'a, T> {
    /// Distance from the root; the root itself is at depth 0.
    pub fn depth(&self) -> usize {
        self.path_to_root.len()
    }

    /// Ancestor ids, nearest parent first.
    pub fn path_ids(&self) -> Vec<&'a str> {
        self.path_to_root.iter().map(|n| n.id.as_str()).collect()
    }
}

impl<T> Deref for NodeInTree<'_, T> {
    type Target = Node<T>;

    fn deref(&self) -> &Self::Target {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node<()> {
        Node::leaf("A").with_children([
            Node::leaf("B").with_children([Node::leaf("D")]),
            Node::leaf("C"),
        ])
    }

    #[test]
    fn given_tree_when_counting_then_includes_root() {
        assert_eq!(sample().len(), 4);
        assert_eq!(Node::<()>::leaf("X").len(), 1);
    }

    #[test]
    fn given_tree_when_measuring_height_then_counts_levels() {
        assert_eq!(sample().height(), 3);
        assert_eq!(Node::<()>::leaf("X").height(), 1);
    }

    #[test]
    fn given_uneven_branches_when_measuring_height_then_uses_tallest() {
        let tree: Node<()> = Node::leaf("A").with_children([
            Node::leaf("B"),
            Node::leaf("C").with_children([
                Node::leaf("E").with_children([Node::leaf("G")]),
                Node::leaf("F"),
            ]),
            Node::leaf("D"),
        ]);
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.children[1].height(), 3);
    }

    #[test]
    fn given_deep_chain_when_measuring_height_then_does_not_overflow() {
        let mut tree = Node::<()>::leaf("0");
        for i in 1..50_000 {
            tree = Node::leaf(i.to_string()).with_children([tree]);
        }
        assert_eq!(tree.height(), 50_000);
        let mut current = Some(tree);
        while let Some(mut node) = current {
            current = node.children.pop();
        }
    }

    #[test]
    fn given_tree_when_collecting_leaves_then_returns_preorder_ids() {
        assert_eq!(sample().leaves(), vec!["D", "C"]);
    }

    #[test]
    fn given_payload_when_deserializing_then_fields_sit_beside_id() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Label {
            label: String,
        }

        let json = r#"{"id": "A", "label": "root", "children": [{"id": "B", "label": "leaf"}]}"#;
        let node: Node<Label> = serde_json::from_str(json).expect("parse node");

        assert_eq!(node.id, "A");
        assert_eq!(node.data.label, "root");
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].is_leaf());
    }

    #[test]
    fn given_map_payload_when_serializing_then_keys_sit_beside_id() {
        let mut data = serde_json::Map::new();
        data.insert("label".into(), "root".into());
        let tree = Node::new("A", data.clone()).with_children([Node::new("B", data)]);

        let value = serde_json::to_value(&tree).expect("map payload serializes");
        assert_eq!(value["label"], "root");
        assert_eq!(value["children"][0]["id"], "B");

        let back: Node<serde_json::Map<String, serde_json::Value>> =
            serde_json::from_value(value).expect("round trip");
        assert_eq!(back, tree);
    }

    #[test]
    fn given_unit_payload_when_serializing_then_only_structure_remains() {
        let json = serde_json::to_string(&sample()).expect("unit payload serializes");
        assert_eq!(
            json,
            r#"{"id":"A","children":[{"id":"B","children":[{"id":"D","children":[]}]},{"id":"C","children":[]}]}"#
        );
    }

    #[test]
    fn given_scalar_payload_when_serializing_then_fails() {
        let tree = Node::new("A", 1_u32).with_children([Node::new("B", 2)]);
        let err = serde_json::to_string(&tree).expect_err("scalars cannot be flattened");
        assert!(err.to_string().contains("can only flatten structs and maps"));
    }

    #[test]
    fn given_node_in_tree_when_deref_then_reads_node_fields() {
        let tree = sample();
        let found = NodeInTree {
            node: &tree.children[0],
            path_to_root: vec![&tree],
        };
        assert_eq!(found.id, "B");
        assert_eq!(found.depth(), 1);
        assert_eq!(found.path_ids(), vec!["A"]);
    }
}
