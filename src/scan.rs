//! Breadth-first expansion of a graph through an external reference resolver.
//!
//! The builder only tracks which nodes have been resolved. Working out what
//! a node actually references (reading project files, package manifests)
//! belongs to a [`ReferenceResolver`] supplied by the caller. [`expand`]
//! feeds the builder's not-scanned frontier to the resolver pass after pass
//! until every node has been resolved.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

use tracing::{debug, info, warn};

use crate::graph::{DependencyGraphBuilder, Edge, Node};

/// Resolves the direct references of a node.
pub trait ReferenceResolver {
    /// Error reported when a node cannot be analyzed.
    type Error: fmt::Display;

    /// Returns the edges from `node` to each of its direct references.
    fn resolve(&mut self, node: &Node) -> Result<Vec<Edge>, Self::Error>;
}

impl<F, E> ReferenceResolver for F
where
    F: FnMut(&Node) -> Result<Vec<Edge>, E>,
    E: fmt::Display,
{
    type Error = E;

    fn resolve(&mut self, node: &Node) -> Result<Vec<Edge>, E> {
        self(node)
    }
}

/// A resolver answering from a fixed table of references.
///
/// Nodes without an entry have no references.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    references: HashMap<Node, Vec<Edge>>,
}

impl StaticResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edge as a reference of its start node.
    pub fn with_reference(mut self, edge: Edge) -> Self {
        self.references
            .entry(edge.start().clone())
            .or_default()
            .push(edge);
        self
    }
}

impl ReferenceResolver for StaticResolver {
    type Error = Infallible;

    fn resolve(&mut self, node: &Node) -> Result<Vec<Edge>, Infallible> {
        Ok(self.references.get(node).cloned().unwrap_or_default())
    }
}

/// A node the resolver could not analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanFailure {
    /// The node that failed to resolve
    pub node: Node,
    /// Rendered resolver error
    pub message: String,
}

/// Outcome of an [`expand`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Number of passes over a non-empty frontier
    pub passes: usize,
    /// Number of nodes handed to the resolver
    pub resolved: usize,
    /// Nodes whose resolution failed; they contribute no references
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Returns true if every node resolved successfully.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Expands `builder` until no unscanned nodes remain.
///
/// Each pass resolves the current frontier, adds every discovered reference
/// (both endpoints as nodes, plus the edge) and marks each resolved node as
/// scanned. A node whose resolution fails is logged, recorded in the report
/// and still marked as scanned: it is not retried and adds nothing. Since
/// every pass marks its whole frontier, the loop ends once no new nodes are
/// discovered.
///
/// # Example
///
/// ```rust
/// use dependify::graph::{DependencyGraphBuilder, Edge, Node};
/// use dependify::scan::{expand, StaticResolver};
///
/// let sln = Node::solution(Some("/repo/App.sln")).unwrap();
/// let api = Node::project("/repo/Api/Api.csproj").unwrap();
/// let core = Node::project("/repo/Core/Core.csproj").unwrap();
///
/// let mut resolver = StaticResolver::new()
///     .with_reference(Edge::new(sln.clone(), api.clone()))
///     .with_reference(Edge::new(api.clone(), core.clone()));
///
/// let mut builder = DependencyGraphBuilder::new(sln);
/// let report = expand(&mut builder, &mut resolver);
///
/// assert_eq!(report.passes, 3);
/// assert!(builder.not_scanned_nodes().is_empty());
/// assert_eq!(builder.build().edge_count(), 2);
/// ```
pub fn expand<R>(builder: &mut DependencyGraphBuilder, resolver: &mut R) -> ScanReport
where
    R: ReferenceResolver + ?Sized,
{
    let mut report = ScanReport::default();

    loop {
        let frontier: Vec<Node> = builder.not_scanned_nodes().into_iter().cloned().collect();
        if frontier.is_empty() {
            break;
        }

        report.passes += 1;
        debug!(pass = report.passes, frontier = frontier.len(), "expanding frontier");

        for node in frontier {
            report.resolved += 1;

            match resolver.resolve(&node) {
                Ok(edges) => {
                    for edge in edges {
                        builder
                            .with_node(edge.start().clone())
                            .with_node(edge.end().clone())
                            .with_edge(edge);
                    }
                }
                Err(err) => {
                    warn!(node = node.id(), error = %err, "failed to resolve references");
                    report.failures.push(ScanFailure {
                        message: err.to_string(),
                        node: node.clone(),
                    });
                }
            }

            builder.mark_scanned(&node);
        }
    }

    info!(
        passes = report.passes,
        resolved = report.resolved,
        failures = report.failures.len(),
        nodes = builder.node_count(),
        edges = builder.edge_count(),
        "dependency scan complete"
    );

    report
}
