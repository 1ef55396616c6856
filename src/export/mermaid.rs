//! Mermaid flowchart export implementation.

use super::{Exporter, INDENT, PACKAGE_BACKGROUND_COLOR, PROJECT_BACKGROUND_COLOR};
use crate::graph::{DependencyGraph, NodeType};
use std::io::{self, Write};

/// Stroke applied to edges pointing at packages.
const PACKAGE_LINK_STYLE: &str = "stroke:#1976D2,stroke-width:1px;";

/// Flow direction of a Mermaid flowchart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Left to right
    #[default]
    LeftRight,
    /// Right to left
    RightLeft,
    /// Top to bottom (`TB`)
    TopBottom,
    /// Top down (`TD`), an alias Mermaid treats like `TB`
    TopDown,
    /// Bottom to top
    BottomTop,
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LR" => Ok(Orientation::LeftRight),
            "RL" => Ok(Orientation::RightLeft),
            "TB" => Ok(Orientation::TopBottom),
            "TD" => Ok(Orientation::TopDown),
            "BT" => Ok(Orientation::BottomTop),
            _ => Err(format!(
                "Unknown orientation: '{}'. Valid orientations: LR, RL, TB, TD, BT",
                s
            )),
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::LeftRight => write!(f, "LR"),
            Orientation::RightLeft => write!(f, "RL"),
            Orientation::TopBottom => write!(f, "TB"),
            Orientation::TopDown => write!(f, "TD"),
            Orientation::BottomTop => write!(f, "BT"),
        }
    }
}

/// Options for the Mermaid flowchart exporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MermaidOptions {
    /// Declare package nodes inside a `Packages` subgraph
    pub show_packages: bool,
    /// Flow direction of the chart
    pub orientation: Orientation,
    /// Suppress link styles and class definitions
    pub no_style: bool,
}

impl Default for MermaidOptions {
    fn default() -> Self {
        Self {
            show_packages: true,
            orientation: Orientation::default(),
            no_style: false,
        }
    }
}

/// Mermaid flowchart exporter implementation.
#[derive(Debug, Clone, Default)]
pub struct MermaidExporter {
    options: MermaidOptions,
}

impl MermaidExporter {
    /// Creates an exporter with the given options.
    pub fn new(options: MermaidOptions) -> Self {
        Self { options }
    }
}

impl Exporter for MermaidExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        let options = &self.options;

        writeln!(writer, "graph {}", options.orientation)?;

        for node in graph.nodes_of_type(NodeType::Solution) {
            writeln!(writer, "{INDENT}{}", node.id())?;
        }

        for node in graph.nodes_of_type(NodeType::Project) {
            writeln!(writer, "{INDENT}{}:::project", node.id())?;
        }

        let packages = graph.nodes_of_type(NodeType::Package);

        if !packages.is_empty() && options.show_packages {
            writeln!(writer, "{INDENT}subgraph Packages")?;
            for node in &packages {
                writeln!(
                    writer,
                    "{INDENT}{id}[{id}:{version}]:::package",
                    id = node.id(),
                    version = node.version().unwrap_or_default()
                )?;
            }
            writeln!(writer, "{INDENT}end")?;
        }

        // linkStyle indices count every edge, styled or not
        for (index, edge) in graph.edges().enumerate() {
            let (start, end) = (edge.start().id(), edge.end().id());

            if edge.label().is_empty() {
                writeln!(writer, "{INDENT}{start} --> {end}")?;
            } else {
                writeln!(writer, "{INDENT}{start} -->|{}| {end}", edge.label())?;
            }

            if !options.no_style && edge.end().is_package() {
                writeln!(writer, "{INDENT}linkStyle {index} {PACKAGE_LINK_STYLE}")?;
            }
        }

        if !options.no_style {
            writeln!(writer, "{INDENT}classDef project fill:{PROJECT_BACKGROUND_COLOR};")?;
            writeln!(writer, "{INDENT}classDef package fill:{PACKAGE_BACKGROUND_COLOR};")?;
        }

        Ok(())
    }
}
