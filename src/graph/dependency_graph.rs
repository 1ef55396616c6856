//! Immutable dependency graph backed by petgraph.
//!
//! Provides ascendant/descendant lookups, transitive subgraph extraction
//! with node filtering, and root removal. Every shape-changing operation
//! returns a new graph.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

use super::{DependencyGraphBuilder, Edge, Node, NodeType};

/// An immutable directed graph of solutions, projects and packages.
///
/// Edges point from the dependent node to its dependency. Nodes and edges
/// are unique by value and iterate in the order they were first added.
/// Cycles are allowed.
///
/// # Example
///
/// ```rust
/// use dependify::graph::{DependencyGraph, Edge, Node};
///
/// let sln = Node::solution(Some("/repo/App.sln")).unwrap();
/// let api = Node::project("/repo/Api/Api.csproj").unwrap();
/// let core = Node::project("/repo/Core/Core.csproj").unwrap();
///
/// let mut builder = DependencyGraph::builder(sln.clone());
/// builder
///     .with_node(api.clone())
///     .with_node(core.clone())
///     .with_edge(Edge::new(sln.clone(), api.clone()))
///     .with_edge(Edge::new(api.clone(), core.clone()));
/// let graph = builder.build();
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.find_descendants(&api), vec![&core]);
/// assert_eq!(graph.find_ascendants(&api), vec![&sln]);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Distinguished entry node, if any
    root: Option<Node>,
    /// The underlying directed graph; edge weights carry the full edge
    graph: DiGraph<Node, Edge>,
    /// Maps nodes to their indices for O(1) lookup
    node_indices: HashMap<Node, NodeIndex>,
}

impl DependencyGraph {
    /// Starts building a graph rooted at `root`.
    pub fn builder(root: Node) -> DependencyGraphBuilder {
        DependencyGraphBuilder::new(root)
    }

    /// Freezes a node and edge collection into a graph.
    ///
    /// Duplicates are dropped. Edge endpoints missing from `nodes` are added
    /// so that every edge refers to a member node.
    pub(crate) fn from_parts(
        root: Option<Node>,
        nodes: impl IntoIterator<Item = Node>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for node in nodes {
            intern(&mut graph, &mut node_indices, &node);
        }

        let declared = graph.node_count();
        let mut seen = HashSet::new();

        for edge in edges {
            if seen.contains(&edge) {
                continue;
            }
            let from = intern(&mut graph, &mut node_indices, edge.start());
            let to = intern(&mut graph, &mut node_indices, edge.end());
            seen.insert(edge.clone());
            graph.add_edge(from, to, edge);
        }

        if graph.node_count() > declared {
            debug!(
                count = graph.node_count() - declared,
                "added edge endpoints missing from the node set"
            );
        }

        debug!(
            root = root.as_ref().map(Node::id),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built dependency graph"
        );

        Self {
            root,
            graph,
            node_indices,
        }
    }

    /// The root node, if the graph has one.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.node_weights()
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.graph.edge_weights()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, node: &Node) -> bool {
        self.node_indices.contains_key(node)
    }

    /// Checks if an identical edge exists in the graph.
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        let (Some(&from), Some(&to)) = (
            self.node_indices.get(edge.start()),
            self.node_indices.get(edge.end()),
        ) else {
            return false;
        };

        self.graph
            .edges_connecting(from, to)
            .any(|candidate| candidate.weight() == edge)
    }

    /// Finds the first node, in insertion order, whose id is `id`.
    ///
    /// Ids are display names and may repeat; prefer node values for identity.
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.graph.node_weights().find(|node| node.id() == id)
    }

    /// Gets nodes of a single kind, in insertion order.
    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<&Node> {
        self.graph
            .node_weights()
            .filter(|node| node.node_type() == node_type)
            .collect()
    }

    /// Gets the direct dependencies of `node` (targets of its outgoing edges).
    ///
    /// Each node appears once even when several labeled edges lead to it.
    /// Returns an empty vector when `node` is not in the graph.
    pub fn find_descendants(&self, node: &Node) -> Vec<&Node> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Gets the direct dependents of `node` (sources of its incoming edges).
    ///
    /// Returns an empty vector when `node` is not in the graph.
    pub fn find_ascendants(&self, node: &Node) -> Vec<&Node> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: &Node, direction: Direction) -> Vec<&Node> {
        let Some(&idx) = self.node_indices.get(node) else {
            return Vec::new();
        };

        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort_unstable();
        found.dedup();

        found.into_iter().map(|i| &self.graph[i]).collect()
    }

    /// Extracts everything transitively reachable from `node`, rooted at `node`.
    ///
    /// Equivalent to [`subgraph_filtered`](Self::subgraph_filtered) with a
    /// filter accepting every node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dependify::graph::{DependencyGraph, Edge, Node};
    ///
    /// let a = Node::project("/repo/A/A.csproj").unwrap();
    /// let b = Node::project("/repo/B/B.csproj").unwrap();
    /// let c = Node::project("/repo/C/C.csproj").unwrap();
    ///
    /// let mut builder = DependencyGraph::builder(a.clone());
    /// builder
    ///     .with_nodes([b.clone(), c.clone()])
    ///     .with_edge(Edge::new(b.clone(), c.clone()))
    ///     .with_edge(Edge::new(a.clone(), c.clone()));
    /// let graph = builder.build();
    ///
    /// let sub = graph.subgraph(&b);
    /// assert_eq!(sub.root(), Some(&b));
    /// assert_eq!(sub.node_count(), 2);
    /// assert_eq!(sub.edge_count(), 1);
    /// ```
    pub fn subgraph(&self, node: &Node) -> Self {
        self.subgraph_filtered(node, |_| true)
    }

    /// Extracts the filtered transitive closure below `node`, rooted at `node`.
    ///
    /// `node` is always included. A descendant failing `filter` is left out
    /// and is not expanded further, so nodes reachable only through it are
    /// left out too. An edge is kept when its start is in the closure and
    /// its end passes `filter`. Cycles are traversed once.
    ///
    /// # Notes
    ///
    /// Asking for a node that is not in the graph is not an error. The
    /// result is rooted at `node` and holds just `node`, with no edges, so
    /// its descendants and ascendants are empty. Check
    /// [`contains`](Self::contains) first to tell the two cases apart.
    pub fn subgraph_filtered<F>(&self, node: &Node, filter: F) -> Self
    where
        F: Fn(&Node) -> bool,
    {
        let Some(&start) = self.node_indices.get(node) else {
            return Self::from_parts(Some(node.clone()), [node.clone()], Vec::new());
        };

        let closure = self.closure([start], &filter);
        debug!(root = node.id(), nodes = closure.len(), "extracted subgraph");

        self.restrict(Some(node.clone()), &closure, &filter)
    }

    /// Merges the filtered closures of every node passing `filter`.
    ///
    /// The result is rooted at the placeholder solution, which is not added
    /// to the node set. Used to build one view across several independent
    /// roots.
    pub fn merged_subgraph<F>(&self, filter: F) -> Self
    where
        F: Fn(&Node) -> bool,
    {
        let starts: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&idx| filter(&self.graph[idx]))
            .collect();

        let closure = self.closure(starts, &filter);
        debug!(nodes = closure.len(), "extracted merged subgraph");

        self.restrict(Some(Node::empty_solution()), &closure, &filter)
    }

    /// Copies the graph without its root node or any edge touching it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use dependify::graph::{DependencyGraph, Edge, Node};
    ///
    /// let sln = Node::solution(Some("/repo/App.sln")).unwrap();
    /// let api = Node::project("/repo/Api/Api.csproj").unwrap();
    ///
    /// let mut builder = DependencyGraph::builder(sln.clone());
    /// builder.with_node(api.clone()).with_edge(Edge::new(sln.clone(), api.clone()));
    ///
    /// let graph = builder.build().copy_without_root();
    /// assert!(graph.root().is_none());
    /// assert!(!graph.contains(&sln));
    /// assert_eq!(graph.edge_count(), 0);
    /// ```
    pub fn copy_without_root(&self) -> Self {
        let root = self.root.as_ref();

        Self::from_parts(
            None,
            self.nodes().filter(|node| Some(*node) != root).cloned(),
            self.edges()
                .filter(|edge| root.map_or(true, |root| !edge.touches(root)))
                .cloned(),
        )
    }

    /// Breadth-first closure from `starts` through nodes passing `filter`.
    ///
    /// Start nodes are always part of the closure. Returned indices are in
    /// insertion order.
    fn closure<F>(&self, starts: impl IntoIterator<Item = NodeIndex>, filter: &F) -> Vec<NodeIndex>
    where
        F: Fn(&Node) -> bool,
    {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        for start in starts {
            if visited.insert(start) {
                queue.push_back(start);
            }
        }

        while let Some(current) = queue.pop_front() {
            for next in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if !visited.contains(&next) && filter(&self.graph[next]) {
                    visited.insert(next);
                    queue.push_back(next);
                }
            }
        }

        let mut closure: Vec<NodeIndex> = visited.into_iter().collect();
        closure.sort_unstable();
        closure
    }

    fn restrict<F>(&self, root: Option<Node>, closure: &[NodeIndex], filter: &F) -> Self
    where
        F: Fn(&Node) -> bool,
    {
        let members: HashSet<NodeIndex> = closure.iter().copied().collect();

        let nodes = closure.iter().map(|&idx| self.graph[idx].clone());
        let edges = self
            .graph
            .edge_references()
            .filter(|edge| members.contains(&edge.source()) && filter(&self.graph[edge.target()]))
            .map(|edge| edge.weight().clone());

        Self::from_parts(root, nodes, edges)
    }
}

fn intern(
    graph: &mut DiGraph<Node, Edge>,
    node_indices: &mut HashMap<Node, NodeIndex>,
    node: &Node,
) -> NodeIndex {
    if let Some(&idx) = node_indices.get(node) {
        return idx;
    }

    let idx = graph.add_node(node.clone());
    node_indices.insert(node.clone(), idx);
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Node {
        Node::project(&format!("/repo/{name}/{name}.csproj")).unwrap()
    }

    fn package(name: &str) -> Node {
        Node::package(name, Some("1.0.0")).unwrap()
    }

    fn graph_of(root: &Node, nodes: &[&Node], edges: &[(&Node, &Node)]) -> DependencyGraph {
        let mut builder = DependencyGraph::builder(root.clone());
        builder.with_nodes(nodes.iter().map(|&n| n.clone()));
        builder.with_edges(edges.iter().map(|&(s, e)| Edge::new(s.clone(), e.clone())));
        builder.build()
    }

    fn ids<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<String> {
        let mut ids: Vec<String> = nodes.into_iter().map(|n| n.id().to_string()).collect();
        ids.sort();
        ids
    }

    fn edge_ids(graph: &DependencyGraph) -> Vec<String> {
        let mut edges: Vec<String> = graph.edges().map(|e| e.to_string()).collect();
        edges.sort();
        edges
    }

    /// A -> B -> C, A -> D
    fn diamond() -> (DependencyGraph, [Node; 4]) {
        let (a, b, c, d) = (project("A"), project("B"), project("C"), project("D"));
        let graph = graph_of(&a, &[&b, &c, &d], &[(&a, &b), (&b, &c), (&a, &d)]);
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_create_graph() {
        let (graph, [a, ..]) = diamond();

        assert_eq!(graph.root(), Some(&a));
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert!(!graph.is_empty());
        assert!(graph.contains(&a));
        assert!(!graph.contains(&project("Z")));
    }

    #[test]
    fn test_find_descendants_and_ascendants() {
        let (graph, [a, b, c, d]) = diamond();

        assert_eq!(graph.find_descendants(&a), vec![&b, &d]);
        assert_eq!(graph.find_descendants(&b), vec![&c]);
        assert!(graph.find_descendants(&c).is_empty());

        assert_eq!(graph.find_ascendants(&c), vec![&b]);
        assert!(graph.find_ascendants(&a).is_empty());
    }

    #[test]
    fn test_descendant_ascendant_symmetry() {
        let (graph, _) = diamond();

        for edge in graph.edges() {
            assert!(graph.find_descendants(edge.start()).contains(&edge.end()));
            assert!(graph.find_ascendants(edge.end()).contains(&edge.start()));
        }
    }

    #[test]
    fn test_labeled_parallel_edges_yield_single_descendant() {
        let (a, b) = (project("A"), project("B"));
        let mut builder = DependencyGraph::builder(a.clone());
        builder
            .with_node(b.clone())
            .with_edge(Edge::with_label(a.clone(), b.clone(), "net6.0"))
            .with_edge(Edge::with_label(a.clone(), b.clone(), "net8.0"));
        let graph = builder.build();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.find_descendants(&a), vec![&b]);
        assert_eq!(graph.find_ascendants(&b), vec![&a]);
    }

    #[test]
    fn test_queries_on_missing_node_are_empty() {
        let (graph, _) = diamond();
        let stranger = project("Z");

        assert!(graph.find_descendants(&stranger).is_empty());
        assert!(graph.find_ascendants(&stranger).is_empty());

        let sub = graph.subgraph(&stranger);
        assert_eq!(sub.root(), Some(&stranger));
        assert_eq!(sub.node_count(), 1);
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn test_subgraph_closure() {
        let (graph, [a, ..]) = diamond();
        let sub = graph.subgraph(&a);

        assert_eq!(sub.root(), Some(&a));
        assert_eq!(ids(sub.nodes()), ["A.csproj", "B.csproj", "C.csproj", "D.csproj"]);
        assert_eq!(
            edge_ids(&sub),
            [
                "A.csproj -> B.csproj",
                "A.csproj -> D.csproj",
                "B.csproj -> C.csproj"
            ]
        );
    }

    #[test]
    fn test_subgraph_from_inner_node() {
        let (graph, [_, b, ..]) = diamond();
        let sub = graph.subgraph(&b);

        assert_eq!(ids(sub.nodes()), ["B.csproj", "C.csproj"]);
        assert_eq!(edge_ids(&sub), ["B.csproj -> C.csproj"]);
    }

    #[test]
    fn test_subgraph_filter_excludes_node_and_edges() {
        let (graph, [a, _, _, d]) = diamond();
        let sub = graph.subgraph_filtered(&a, |n| n != &d);

        assert_eq!(ids(sub.nodes()), ["A.csproj", "B.csproj", "C.csproj"]);
        assert_eq!(
            edge_ids(&sub),
            ["A.csproj -> B.csproj", "B.csproj -> C.csproj"]
        );
    }

    #[test]
    fn test_subgraph_filter_stops_expansion() {
        // A -> B -> C: excluding B hides C as well
        let (a, b, c) = (project("A"), project("B"), project("C"));
        let graph = graph_of(&a, &[&b, &c], &[(&a, &b), (&b, &c)]);

        let sub = graph.subgraph_filtered(&a, |n| n != &b);

        assert_eq!(ids(sub.nodes()), ["A.csproj"]);
        assert_eq!(sub.edge_count(), 0);
    }

    #[test]
    fn test_subgraph_root_always_included() {
        let (graph, [a, ..]) = diamond();
        let sub = graph.subgraph_filtered(&a, |n| n != &a);

        assert!(sub.contains(&a));
        assert_eq!(sub.node_count(), 4);
    }

    #[test]
    fn test_subgraph_cycle_safety() {
        let (a, b) = (project("A"), project("B"));
        let graph = graph_of(&a, &[&b], &[(&a, &b), (&b, &a)]);

        let sub = graph.subgraph(&a);

        assert_eq!(ids(sub.nodes()), ["A.csproj", "B.csproj"]);
        assert_eq!(
            edge_ids(&sub),
            ["A.csproj -> B.csproj", "B.csproj -> A.csproj"]
        );
    }

    #[test]
    fn test_subgraph_self_loop() {
        let a = project("A");
        let graph = graph_of(&a, &[], &[(&a, &a)]);

        let sub = graph.subgraph(&a);
        assert_eq!(sub.node_count(), 1);
        assert_eq!(sub.edge_count(), 1);
    }

    #[test]
    fn test_subgraph_deep_chain() {
        let nodes: Vec<Node> = (0..2_000).map(|i| project(&format!("P{i}"))).collect();
        let mut builder = DependencyGraph::builder(nodes[0].clone());
        builder.with_nodes(nodes.iter().cloned());
        builder.with_edges(nodes.windows(2).map(|w| Edge::new(w[0].clone(), w[1].clone())));
        let graph = builder.build();

        let sub = graph.subgraph(&nodes[0]);
        assert_eq!(sub.node_count(), 2_000);
        assert_eq!(sub.edge_count(), 1_999);
    }

    #[test]
    fn test_subgraph_excluding_packages() {
        let (api, core) = (project("Api"), project("Core"));
        let (serilog, polly) = (package("Serilog"), package("Polly"));
        let graph = graph_of(
            &api,
            &[&core, &serilog, &polly],
            &[(&api, &core), (&api, &serilog), (&core, &polly)],
        );

        let sub = graph.subgraph_filtered(&api, |n| !n.is_package());

        assert_eq!(ids(sub.nodes()), ["Api.csproj", "Core.csproj"]);
        assert_eq!(edge_ids(&sub), ["Api.csproj -> Core.csproj"]);
    }

    #[test]
    fn test_merged_subgraph() {
        let sln_a = Node::solution(Some("/repo/A.sln")).unwrap();
        let sln_b = Node::solution(Some("/repo/B.sln")).unwrap();
        let (x, y, z) = (project("X"), project("Y"), project("Z"));

        let graph = graph_of(
            &Node::empty_solution(),
            &[&sln_a, &sln_b, &x, &y, &z],
            &[(&sln_a, &x), (&sln_b, &y), (&x, &y), (&y, &z)],
        );

        let merged = graph.merged_subgraph(|n| n.is_project());

        assert!(merged.root().unwrap().is_empty_solution());
        assert!(!merged.contains(&Node::empty_solution()));
        assert_eq!(ids(merged.nodes()), ["X.csproj", "Y.csproj", "Z.csproj"]);
        assert_eq!(
            edge_ids(&merged),
            ["X.csproj -> Y.csproj", "Y.csproj -> Z.csproj"]
        );
    }

    #[test]
    fn test_merged_subgraph_nothing_matches() {
        let (graph, _) = diamond();
        let merged = graph.merged_subgraph(|n| n.is_package());

        assert!(merged.is_empty());
        assert_eq!(merged.edge_count(), 0);
        assert!(merged.root().is_some());
    }

    #[test]
    fn test_copy_without_root() {
        let (r, a, b) = (
            Node::solution(Some("/repo/R.sln")).unwrap(),
            project("A"),
            project("B"),
        );
        let graph = graph_of(&r, &[&a, &b], &[(&r, &a), (&a, &b)]);

        let copy = graph.copy_without_root();

        assert!(copy.root().is_none());
        assert_eq!(ids(copy.nodes()), ["A.csproj", "B.csproj"]);
        assert_eq!(edge_ids(&copy), ["A.csproj -> B.csproj"]);

        // the source graph is untouched
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_copy_without_root_when_rootless() {
        let (graph, _) = diamond();
        let once = graph.copy_without_root();
        let twice = once.copy_without_root();

        assert_eq!(twice.node_count(), 3);
        assert_eq!(twice.edge_count(), once.edge_count());
    }

    #[test]
    fn test_edge_endpoints_added_implicitly() {
        let (a, b) = (project("A"), project("B"));
        let mut builder = DependencyGraph::builder(a.clone());
        builder.with_edge(Edge::new(a.clone(), b.clone()));
        let graph = builder.build();

        assert!(graph.contains(&b));
        assert_eq!(graph.find_descendants(&a), vec![&b]);
    }

    #[test]
    fn test_contains_edge() {
        let (graph, [a, b, c, _]) = diamond();

        assert!(graph.contains_edge(&Edge::new(a.clone(), b.clone())));
        assert!(!graph.contains_edge(&Edge::with_label(a.clone(), b, "x")));
        assert!(!graph.contains_edge(&Edge::new(a, c)));
    }

    #[test]
    fn test_find_by_id_and_type() {
        let (api, serilog) = (project("Api"), package("Serilog"));
        let graph = graph_of(&api, &[&serilog], &[(&api, &serilog)]);

        assert_eq!(graph.find_by_id("Serilog"), Some(&serilog));
        assert_eq!(graph.find_by_id("missing"), None);
        assert_eq!(graph.nodes_of_type(NodeType::Package), vec![&serilog]);
        assert_eq!(graph.nodes_of_type(NodeType::Project), vec![&api]);
        assert!(graph.nodes_of_type(NodeType::Solution).is_empty());
    }

    #[test]
    fn test_graph_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DependencyGraph>();
    }
}
