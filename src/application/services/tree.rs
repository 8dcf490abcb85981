//! Tree service
//!
//! Stateless operations over a borrowed tree: traversal, search by id with
//! ancestor reconstruction, depth lookup and flattening.
//!
//! None of these validate the tree. Cycles cannot be expressed with owned
//! children; duplicate ids are accepted and give unspecified (but terminating)
//! results.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::domain::iter::walk_while;
use crate::domain::{Node, NodeInTree};

/// Service for generic tree operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeService;

impl TreeService {
    /// Create a new tree service.
    pub fn new() -> Self {
        Self
    }

    /// Visit every node in pre-order, the root included.
    ///
    /// There is no early exit; use [`Node::iter`] for that.
    #[instrument(level = "trace", skip_all, fields(root = %root.id))]
    pub fn traverse<'a, T, F>(&self, root: &'a Node<T>, mut visit: F)
    where
        F: FnMut(&'a Node<T>),
    {
        walk_while(root, |node| {
            visit(node);
            true
        });
    }

    /// Find the node with `id` and the chain of its ancestors.
    ///
    /// The walk records `child id -> parent` for every visited node and stops
    /// descending once it reaches a match; siblings of the match are still
    /// walked. With duplicate ids the last unpruned match wins.
    ///
    /// `path_to_root` is nearest parent first and ends at the root. It is empty
    /// when `id` is the root's own id.
    #[instrument(level = "debug", skip(self, root), fields(root = %root.id))]
    pub fn search_by_id<'a, T>(&self, root: &'a Node<T>, id: &str) -> Option<NodeInTree<'a, T>> {
        let mut matching: Option<&'a Node<T>> = None;
        let mut parents: HashMap<&'a str, &'a Node<T>> = HashMap::new();

        walk_while(root, |node| {
            for child in &node.children {
                parents.insert(child.id.as_str(), node);
            }
            if node.id == id {
                matching = Some(node);
                return false;
            }
            true
        });

        let Some(node) = matching else {
            debug!("search_by_id: no node with id {:?}", id);
            return None;
        };

        let path_to_root = Self::build_path(id, &parents);
        debug!(
            "search_by_id: found {:?} at depth {}",
            id,
            path_to_root.len()
        );
        Some(NodeInTree { node, path_to_root })
    }

    /// Depth of the node with `node.id`, root = 0, or `-1` when absent.
    ///
    /// The node is matched by id, not by identity.
    #[instrument(level = "debug", skip_all, fields(id = %node.id))]
    pub fn get_node_depth<T>(&self, root: &Node<T>, node: &Node<T>) -> isize {
        self.depth_of(root, &node.id)
            .and_then(|depth| isize::try_from(depth).ok())
            .unwrap_or(-1)
    }

    /// Depth of the node with `id`, root = 0.
    pub fn depth_of<T>(&self, root: &Node<T>, id: &str) -> Option<usize> {
        self.search_by_id(root, id).map(|found| found.depth())
    }

    /// Deep copy of every node, in pre-order.
    ///
    /// Copied nodes keep copies of their children, so each element still holds
    /// its whole subtree.
    #[instrument(level = "debug", skip_all, fields(root = %root.id))]
    pub fn flatten<T: Clone>(&self, root: &Node<T>) -> Vec<Node<T>> {
        let mut result = vec![root.clone()];
        let mut i = 0;
        while i < result.len() {
            if !result[i].is_leaf() {
                let children = result[i].children.clone();
                result.splice(i + 1..i + 1, children);
            }
            i += 1;
        }
        trace!("flatten: {} nodes", result.len());
        result
    }

    /// Follow the parent table from `id` until a lookup misses.
    ///
    /// A well-formed tree ends at the root. The step limit keeps duplicate ids
    /// that alias an ancestor from looping. Empty ids are ordinary keys: a
    /// node with id `""` still gets its full chain, where a falsy-key loop
    /// would stop immediately and return an empty path.
    fn build_path<'a, T>(id: &str, parents: &HashMap<&'a str, &'a Node<T>>) -> Vec<&'a Node<T>> {
        let mut path = Vec::new();
        let mut key = id;
        while let Some(&parent) = parents.get(key) {
            if path.len() == parents.len() {
                debug!("build_path: step limit reached for {:?}", id);
                break;
            }
            path.push(parent);
            key = parent.id.as_str();
        }
        path
    }
}
