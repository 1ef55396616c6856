//! Export functionality for dependency graphs.
//!
//! This module renders a [`DependencyGraph`] into diagram and interchange
//! formats: Graphviz DOT, Mermaid flowcharts, Mermaid C4 component diagrams
//! and JSON.
//!
//! Exporters never modify the graph. Output follows the graph's iteration
//! order, which is the order nodes and edges were first added.

pub mod dot;
pub mod json;
pub mod mermaid;
pub mod mermaid_c4;

pub use mermaid::{MermaidOptions, Orientation};

use crate::graph::DependencyGraph;
use std::io::{self, Write};

/// Fill color used for project nodes.
pub(crate) const PROJECT_BACKGROUND_COLOR: &str = "#74200154";

/// Fill color used for package nodes.
pub(crate) const PACKAGE_BACKGROUND_COLOR: &str = "#22aaee";

/// Indentation unit for nested output lines.
pub(crate) const INDENT: &str = "    ";

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Graphviz DOT digraph
    Dot,
    /// Mermaid flowchart
    #[default]
    Mermaid,
    /// Mermaid C4 component diagram
    MermaidC4,
    /// JSON document with typed nodes
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "graphviz" => Ok(ExportFormat::Dot),
            "mermaid" => Ok(ExportFormat::Mermaid),
            "c4" | "mermaid-c4" => Ok(ExportFormat::MermaidC4),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: dot, mermaid, c4, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Mermaid => write!(f, "mermaid"),
            ExportFormat::MermaidC4 => write!(f, "c4"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()>;
}

/// Export a graph in the specified format.
///
/// `mermaid` is only consulted for [`ExportFormat::Mermaid`].
pub fn export<W: Write>(
    format: ExportFormat,
    graph: &DependencyGraph,
    mermaid: &MermaidOptions,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Dot => dot::DotExporter.export(graph, writer),
        ExportFormat::Mermaid => mermaid::MermaidExporter::new(mermaid.clone()).export(graph, writer),
        ExportFormat::MermaidC4 => mermaid_c4::MermaidC4Exporter.export(graph, writer),
        ExportFormat::Json => json::JsonExporter.export(graph, writer),
    }
}

/// Export a graph to a string.
///
/// # Example
///
/// ```rust
/// use dependify::export::{export_to_string, ExportFormat, MermaidOptions};
/// use dependify::graph::{DependencyGraph, Edge, Node};
///
/// let api = Node::project("/repo/Api/Api.csproj").unwrap();
/// let core = Node::project("/repo/Core/Core.csproj").unwrap();
///
/// let mut builder = DependencyGraph::builder(api.clone());
/// builder.with_node(core.clone()).with_edge(Edge::new(api, core));
/// let graph = builder.build();
///
/// let dot = export_to_string(ExportFormat::Dot, &graph, &MermaidOptions::default()).unwrap();
/// assert!(dot.contains("\"Api.csproj\" -> \"Core.csproj\";"));
/// ```
pub fn export_to_string(
    format: ExportFormat,
    graph: &DependencyGraph,
    mermaid: &MermaidOptions,
) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, graph, mermaid, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("dot".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert_eq!("GraphViz".parse::<ExportFormat>().unwrap(), ExportFormat::Dot);
        assert_eq!(
            "mermaid".parse::<ExportFormat>().unwrap(),
            ExportFormat::Mermaid
        );
        assert_eq!("c4".parse::<ExportFormat>().unwrap(), ExportFormat::MermaidC4);
        assert_eq!(
            "mermaid-c4".parse::<ExportFormat>().unwrap(),
            ExportFormat::MermaidC4
        );
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("tui".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display_round_trips() {
        for format in [
            ExportFormat::Dot,
            ExportFormat::Mermaid,
            ExportFormat::MermaidC4,
            ExportFormat::Json,
        ] {
            assert_eq!(format.to_string().parse::<ExportFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_export_dispatch() {
        let graph = testing::sample_graph();
        let options = MermaidOptions::default();

        let dot = export_to_string(ExportFormat::Dot, &graph, &options).unwrap();
        assert!(dot.starts_with("digraph dependencies {"));

        let mermaid = export_to_string(ExportFormat::Mermaid, &graph, &options).unwrap();
        assert!(mermaid.starts_with("graph LR"));

        let c4 = export_to_string(ExportFormat::MermaidC4, &graph, &options).unwrap();
        assert!(c4.starts_with("C4Component"));

        let json = export_to_string(ExportFormat::Json, &graph, &options).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&json).is_ok());
    }
}
