//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`Node`] and [`Edge`] model, the
//! [`DependencyGraphBuilder`] used to assemble a graph incrementally, and the
//! immutable [`DependencyGraph`] answering queries over it.
//!
//! # Example
//!
//! ```rust
//! use dependify::graph::{DependencyGraph, Edge, Node};
//!
//! let sln = Node::solution(Some("/repo/App.sln")).unwrap();
//! let api = Node::project("/repo/src/Api/Api.csproj").unwrap();
//! let serilog = Node::package("Serilog", Some("3.1.1")).unwrap();
//!
//! let mut builder = DependencyGraph::builder(sln.clone());
//! builder
//!     .with_node(api.clone())
//!     .with_node(serilog.clone())
//!     .with_edge(Edge::new(sln, api.clone()))
//!     .with_edge(Edge::new(api.clone(), serilog));
//! let graph = builder.build();
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! assert_eq!(graph.subgraph(&api).node_count(), 2);
//! ```

mod builder;
mod dependency_graph;
mod edge;
mod node;
mod usage;

pub use builder::DependencyGraphBuilder;
pub use dependency_graph::DependencyGraph;
pub use edge::Edge;
pub use node::{Node, NodeType, EMPTY_SOLUTION_ID, PACKAGE_REGISTRY_URL};
pub use usage::NodeUsage;
