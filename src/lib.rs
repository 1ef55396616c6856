//! Dependify - dependency graph model and renderers for .NET solutions
//!
//! This crate models the relationships between solutions, projects and
//! packages as an immutable directed graph, answers queries over it
//! (ascendants, descendants, filtered subgraphs, usage summaries) and
//! renders it as Graphviz DOT, Mermaid flowcharts, Mermaid C4 diagrams or
//! JSON.
//!
//! Reading project files is left to the caller: implement
//! [`scan::ReferenceResolver`] and drive a [`graph::DependencyGraphBuilder`]
//! with [`scan::expand`].

pub mod error;
pub mod export;
pub mod graph;
pub mod paths;
pub mod scan;

pub use error::{GraphError, GraphResult};
