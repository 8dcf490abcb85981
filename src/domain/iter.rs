use tracing::instrument;

use crate::domain::Node;

/// Depth-first pre-order iterator over a borrowed tree.
///
/// Uses an explicit stack, so deep trees do not grow the call stack.
pub struct PreOrderIter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> PreOrderIter<'a, T> {
    pub(crate) fn new(root: &'a Node<T>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a, T> Iterator for PreOrderIter<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

/// Depth-first post-order iterator over a borrowed tree.
pub struct PostOrderIter<'a, T> {
    stack: Vec<(&'a Node<T>, bool)>,
}

impl<'a, T> PostOrderIter<'a, T> {
    pub(crate) fn new(root: &'a Node<T>) -> Self {
        Self {
            stack: vec![(root, false)],
        }
    }
}

impl<'a, T> Iterator for PostOrderIter<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if visited {
                return Some(current);
            }
            self.stack.push((current, true));
            for child in current.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Pre-order walk that skips the subtree of any node for which `f` returns false.
///
/// The node itself is still passed to `f`; only its descendants are pruned.
/// Siblings and the rest of the tree are visited as usual.
#[instrument(level = "trace", skip_all, fields(root = %root.id))]
pub(crate) fn walk_while<'a, T, F>(root: &'a Node<T>, mut f: F)
where
    F: FnMut(&'a Node<T>) -> bool,
{
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        if f(current) {
            stack.extend(current.children.iter().rev());
        }
    }
}
