//! Graphviz DOT export implementation.

use super::{Exporter, INDENT, PACKAGE_BACKGROUND_COLOR, PROJECT_BACKGROUND_COLOR};
use crate::graph::{DependencyGraph, NodeType};
use std::io::{self, Write};

/// DOT exporter implementation.
///
/// Projects and packages are declared with a fill color; solutions are left
/// for Graphviz to create from the edges referencing them.
pub struct DotExporter;

impl DotExporter {
    /// Escape a value for use inside a quoted DOT identifier.
    fn quote(value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\\\""))
    }
}

impl Exporter for DotExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "digraph dependencies {{")?;

        for node in graph.nodes() {
            let color = match node.node_type() {
                NodeType::Project => PROJECT_BACKGROUND_COLOR,
                NodeType::Package => PACKAGE_BACKGROUND_COLOR,
                NodeType::Solution => continue,
            };
            let id = Self::quote(node.id());

            writeln!(
                writer,
                "{INDENT}{id} [label={id}, fillcolor=\"{color}\", style=filled];"
            )?;
        }

        for edge in graph.edges() {
            let (start, end) = (Self::quote(edge.start().id()), Self::quote(edge.end().id()));

            if edge.label().is_empty() {
                writeln!(writer, "{INDENT}{start} -> {end};")?;
            } else {
                let label = Self::quote(edge.label());
                writeln!(writer, "{INDENT}{start} -> {end} [label={label}];")?;
            }
        }

        writeln!(writer, "}}")
    }
}
