//! Mutable staging area for assembling a [`DependencyGraph`].

use std::collections::{HashMap, HashSet};

use super::{DependencyGraph, Edge, Node};

/// Accumulates nodes and edges, then freezes them into a [`DependencyGraph`].
///
/// Nodes and edges are deduplicated by value. The builder also tracks which
/// nodes have had their outgoing dependencies resolved ("scanned"), so an
/// external driver can expand the graph breadth-first by repeatedly
/// resolving [`not_scanned_nodes`](Self::not_scanned_nodes) until none are
/// left.
///
/// A builder is meant for a single writer; give each scan its own instance.
///
/// # Example
///
/// ```rust
/// use dependify::graph::{DependencyGraphBuilder, Edge, Node};
///
/// let sln = Node::solution(Some("/repo/App.sln")).unwrap();
/// let api = Node::project("/repo/Api/Api.csproj").unwrap();
///
/// let mut builder = DependencyGraphBuilder::new(sln.clone());
/// builder
///     .with_node(api.clone())
///     .with_node(api.clone())
///     .with_edge(Edge::new(sln.clone(), api.clone()));
/// builder.mark_scanned(&sln);
///
/// assert_eq!(builder.not_scanned_nodes(), vec![&api]);
///
/// let graph = builder.build();
/// assert_eq!(graph.node_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyGraphBuilder {
    root: Option<Node>,
    /// Append-only node arena, in insertion order
    nodes: Vec<Node>,
    /// Node value -> position in `nodes`
    node_keys: HashMap<Node, usize>,
    /// Append-only edge arena, in insertion order
    edges: Vec<Edge>,
    edge_keys: HashSet<Edge>,
    /// Positions of nodes whose dependencies have been resolved
    scanned: HashSet<usize>,
}

impl DependencyGraphBuilder {
    /// Creates a builder rooted at `root`; the root is added as a node.
    pub fn new(root: Node) -> Self {
        let mut builder = Self {
            root: Some(root.clone()),
            ..Self::default()
        };
        builder.insert(root);
        builder
    }

    /// Creates a builder for a graph without a root.
    pub fn rootless() -> Self {
        Self::default()
    }

    /// The root the graph will be built with.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Adds a node unless an equal one is already present.
    pub fn with_node(&mut self, node: Node) -> &mut Self {
        self.insert(node);
        self
    }

    /// Adds a node and marks it as scanned.
    pub fn with_scanned_node(&mut self, node: Node) -> &mut Self {
        let idx = self.insert(node);
        self.scanned.insert(idx);
        self
    }

    /// Adds every node from `nodes`.
    pub fn with_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> &mut Self {
        for node in nodes {
            self.insert(node);
        }
        self
    }

    /// Adds an edge unless an identical one is already present.
    ///
    /// Endpoints are not added as nodes; missing ones are filled in by
    /// [`build`](Self::build) but never appear in the scan frontier.
    pub fn with_edge(&mut self, edge: Edge) -> &mut Self {
        if !self.edge_keys.contains(&edge) {
            self.edge_keys.insert(edge.clone());
            self.edges.push(edge);
        }
        self
    }

    /// Adds every edge from `edges`.
    pub fn with_edges(&mut self, edges: impl IntoIterator<Item = Edge>) -> &mut Self {
        for edge in edges {
            self.with_edge(edge);
        }
        self
    }

    /// Marks an already added node as scanned.
    ///
    /// Returns `false` if `node` has not been added.
    pub fn mark_scanned(&mut self, node: &Node) -> bool {
        match self.node_keys.get(node) {
            Some(&idx) => {
                self.scanned.insert(idx);
                true
            }
            None => false,
        }
    }

    /// Checks if `node` has been added and marked as scanned.
    pub fn is_scanned(&self, node: &Node) -> bool {
        self.node_keys
            .get(node)
            .is_some_and(|idx| self.scanned.contains(idx))
    }

    /// Gets the frontier: added nodes not yet marked as scanned, in insertion order.
    pub fn not_scanned_nodes(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.scanned.contains(idx))
            .map(|(_, node)| node)
            .collect()
    }

    /// Checks if a node has been added.
    pub fn contains(&self, node: &Node) -> bool {
        self.node_keys.contains_key(node)
    }

    /// Nodes added so far, in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges added so far, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of distinct nodes added.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of distinct edges added.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Freezes the accumulated nodes and edges into an immutable graph.
    pub fn build(self) -> DependencyGraph {
        DependencyGraph::from_parts(self.root, self.nodes, self.edges)
    }

    fn insert(&mut self, node: Node) -> usize {
        if let Some(&idx) = self.node_keys.get(&node) {
            return idx;
        }

        let idx = self.nodes.len();
        self.node_keys.insert(node.clone(), idx);
        self.nodes.push(node);
        idx
    }
}
