//! Loading tree documents
//!
//! A document is one JSON object per node: `id`, optional `children`, and
//! any other keys as payload.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Node;

/// Payload of a loaded node: every key other than `id` and `children`.
pub type Payload = Map<String, Value>;

/// Path that selects stdin instead of a file.
pub const STDIN_PATH: &str = "-";

/// Origin reported in errors for documents read from stdin.
const STDIN_ORIGIN: &str = "<stdin>";

/// Load a tree from `path`, or from stdin when `path` is `-`.
pub fn load_tree(path: &Path) -> ApplicationResult<Node<Payload>> {
    if path == Path::new(STDIN_PATH) {
        debug!("load_tree: reading stdin");
        return read_tree(std::io::stdin().lock(), STDIN_ORIGIN);
    }
    debug!("load_tree: path={}", path.display());
    let file = std::fs::File::open(path).with_path_context("open tree", path)?;
    read_tree(file, &path.display().to_string())
}

/// Parse a tree document from any reader; `origin` names it in errors.
pub fn read_tree<R: Read>(mut reader: R, origin: &str) -> ApplicationResult<Node<Payload>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| ApplicationError::Io {
            context: format!("read tree: {}", origin),
            source: e,
        })?;
    parse_tree(&content, origin)
}

/// Parse a tree document held in memory.
pub fn parse_tree(content: &str, origin: &str) -> ApplicationResult<Node<Payload>> {
    serde_json::from_str(content).map_err(|e| ApplicationError::Parse {
        context: origin.to_string(),
        source: e,
    })
}
