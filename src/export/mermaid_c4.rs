//! Mermaid C4 component diagram export implementation.

use super::{Exporter, INDENT};
use crate::graph::{DependencyGraph, NodeType};
use std::io::{self, Write};

/// Style override applied to every package component.
const PACKAGE_STYLE: &str = "$fontColor=\"white\", $bgColor=\"grey\", $borderColor=\"#99CB0E\"";

/// Mermaid C4 exporter implementation.
///
/// Each project becomes a container boundary holding its own component and,
/// when it references packages, a nested `Packages` boundary. Project to
/// project references are emitted as `Rel` lines after all boundaries.
pub struct MermaidC4Exporter;

impl Exporter for MermaidC4Exporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "C4Component")?;

        if let Some(root) = graph.root() {
            writeln!(writer, "title {}", root.id())?;
        }

        let projects = graph.nodes_of_type(NodeType::Project);

        for project in &projects {
            let id = project.id();

            writeln!(writer, "Container_Boundary({id}, \"{id}\", \"\", \"\") {{")?;
            writeln!(writer, "{INDENT}Component({id}, \"{id}\", \"Project\", \"\")")?;

            let packages: Vec<_> = graph
                .find_descendants(project)
                .into_iter()
                .filter(|node| node.is_package())
                .collect();

            if !packages.is_empty() {
                writeln!(
                    writer,
                    "{INDENT}Container_Boundary(Packages.{id}, \"Packages\", \"\", \"\") {{"
                )?;
                for package in packages {
                    let pid = package.id();
                    writeln!(
                        writer,
                        "{INDENT}{INDENT}Component({pid}, \"{pid}:{}\", \"Package\", \"\")",
                        package.version().unwrap_or_default()
                    )?;
                    writeln!(writer, "{INDENT}{INDENT}UpdateElementStyle({pid}, {PACKAGE_STYLE})")?;
                }
                writeln!(writer, "{INDENT}}}")?;
            }

            writeln!(writer, "}}")?;
        }

        for project in &projects {
            for child in graph.find_descendants(project) {
                if child.is_project() {
                    writeln!(writer, "Rel({}, {}, \"\")", project.id(), child.id())?;
                }
            }
        }

        Ok(())
    }
}
