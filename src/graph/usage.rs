//! Per-node usage summary.

use super::{DependencyGraph, Node};

/// Direct dependencies and dependents of a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeUsage<'a> {
    /// The summarized node
    pub node: &'a Node,
    /// Projects the node depends on directly
    pub depends_on_projects: Vec<&'a Node>,
    /// Packages the node depends on directly
    pub depends_on_packages: Vec<&'a Node>,
    /// Projects that depend on the node directly
    pub used_by: Vec<&'a Node>,
}

impl NodeUsage<'_> {
    /// Number of direct project dependencies.
    pub fn depends_on_projects_count(&self) -> usize {
        self.depends_on_projects.len()
    }

    /// Number of direct package dependencies.
    pub fn depends_on_packages_count(&self) -> usize {
        self.depends_on_packages.len()
    }

    /// Number of projects depending on the node.
    pub fn used_by_count(&self) -> usize {
        self.used_by.len()
    }
}

impl DependencyGraph {
    /// Summarizes the direct project/package dependencies and project dependents of `node`.
    ///
    /// A node outside the graph yields empty lists.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dependify::graph::{DependencyGraph, Edge, Node};
    ///
    /// let api = Node::project("/repo/Api/Api.csproj").unwrap();
    /// let core = Node::project("/repo/Core/Core.csproj").unwrap();
    /// let serilog = Node::package("Serilog", Some("3.1.1")).unwrap();
    ///
    /// let mut builder = DependencyGraph::builder(api.clone());
    /// builder
    ///     .with_nodes([core.clone(), serilog.clone()])
    ///     .with_edge(Edge::new(api.clone(), core.clone()))
    ///     .with_edge(Edge::new(api.clone(), serilog.clone()));
    /// let graph = builder.build();
    ///
    /// let usage = graph.usage(&api);
    /// assert_eq!(usage.depends_on_projects_count(), 1);
    /// assert_eq!(usage.depends_on_packages_count(), 1);
    /// assert_eq!(graph.usage(&core).used_by_count(), 1);
    /// ```
    pub fn usage<'a>(&'a self, node: &'a Node) -> NodeUsage<'a> {
        let descendants = self.find_descendants(node);

        NodeUsage {
            node,
            depends_on_projects: descendants.iter().copied().filter(|n| n.is_project()).collect(),
            depends_on_packages: descendants.iter().copied().filter(|n| n.is_package()).collect(),
            used_by: self
                .find_ascendants(node)
                .into_iter()
                .filter(|n| n.is_project())
                .collect(),
        }
    }
}
