//! Generic operations over rooted, ordered trees of typed nodes.
//!
//! [`TreeService`] offers pre-order traversal, search by id with the path to
//! the root, depth lookup and flattening into a pre-order list of copies.
//!
//! ```
//! use treewalk::{Node, TreeService};
//!
//! let tree: Node<()> = Node::leaf("A").with_children([
//!     Node::leaf("B").with_children([Node::leaf("D")]),
//!     Node::leaf("C"),
//! ]);
//! let service = TreeService::new();
//!
//! let found = service.search_by_id(&tree, "D").expect("D is present");
//! assert_eq!(found.path_ids(), vec!["B", "A"]);
//! assert_eq!(service.get_node_depth(&tree, &Node::leaf("D")), 2);
//! assert_eq!(service.flatten(&tree).len(), 4);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use application::TreeService;
pub use domain::{Node, NodeInTree};
