//! Directed "depends on" relation between two nodes.

use std::fmt;

use super::Node;

/// An edge from `start` (the dependent) to `end` (the dependency).
///
/// Edges compare structurally, so two edges between the same nodes with
/// different labels are distinct, while identical edges collapse in a set.
///
/// # Example
///
/// ```
/// use dependify::graph::{Edge, Node};
///
/// let api = Node::project("/repo/Api/Api.csproj").unwrap();
/// let core = Node::project("/repo/Core/Core.csproj").unwrap();
///
/// let edge = Edge::new(api, core);
/// assert_eq!(edge.label(), "");
/// assert_eq!(edge.to_string(), "Api.csproj -> Core.csproj");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    start: Node,
    end: Node,
    label: String,
}

impl Edge {
    /// Creates an unlabeled edge.
    pub fn new(start: Node, end: Node) -> Self {
        Self::with_label(start, end, String::new())
    }

    /// Creates an edge carrying a label.
    pub fn with_label(start: Node, end: Node, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// The dependent node.
    pub fn start(&self) -> &Node {
        &self.start
    }

    /// The dependency node.
    pub fn end(&self) -> &Node {
        &self.end
    }

    /// Free-form label; empty when unlabeled.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true if either endpoint is `node`.
    pub fn touches(&self, node: &Node) -> bool {
        &self.start == node || &self.end == node
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}
