//! JSON export and import.
//!
//! Graphs are written as an indented camelCase document with `root`, `nodes`
//! and `edges`. Every node carries a `$type` discriminator naming its
//! variant so the polymorphic node set can be read back:
//!
//! ```json
//! {
//!   "$type": "PackageReferenceNode",
//!   "id": "Serilog",
//!   "path": "https://www.nuget.org/packages/Serilog/3.1.1",
//!   "type": "Package",
//!   "version": "3.1.1"
//! }
//! ```

use super::Exporter;
use crate::error::{GraphError, GraphResult};
use crate::graph::{DependencyGraph, Edge, Node, NodeType};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;
use tracing::debug;

const SOLUTION_DISCRIMINATOR: &str = "SolutionReferenceNode";
const PROJECT_DISCRIMINATOR: &str = "ProjectReferenceNode";
const PACKAGE_DISCRIMINATOR: &str = "PackageReferenceNode";

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serialized form of a [`Node`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonNode {
    #[serde(rename = "$type")]
    kind: String,
    id: String,
    #[serde(default)]
    path: String,
    /// Display name of the variant; informational only on read
    #[serde(rename = "type", default, skip_deserializing)]
    node_type: String,
    /// Present, possibly `null`, on packages only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", skip_deserializing)]
    is_empty: Option<bool>,
}

/// Serialized form of an [`Edge`].
#[derive(Debug, Serialize, Deserialize)]
struct JsonEdge {
    start: JsonNode,
    end: JsonNode,
    #[serde(default)]
    label: String,
}

/// Root JSON document.
#[derive(Debug, Serialize, Deserialize)]
struct JsonGraph {
    #[serde(default)]
    root: Option<JsonNode>,
    #[serde(default)]
    nodes: Vec<JsonNode>,
    #[serde(default)]
    edges: Vec<JsonEdge>,
}

impl From<&Node> for JsonNode {
    fn from(node: &Node) -> Self {
        let kind = match node.node_type() {
            NodeType::Solution => SOLUTION_DISCRIMINATOR,
            NodeType::Project => PROJECT_DISCRIMINATOR,
            NodeType::Package => PACKAGE_DISCRIMINATOR,
        };

        Self {
            kind: kind.to_string(),
            id: node.id().to_string(),
            path: node.path().to_string(),
            node_type: node.node_type().to_string(),
            version: node
                .is_package()
                .then(|| node.version().map(str::to_string)),
            is_empty: (node.node_type() == NodeType::Solution).then(|| node.is_empty_solution()),
        }
    }
}

impl TryFrom<JsonNode> for Node {
    type Error = GraphError;

    fn try_from(value: JsonNode) -> GraphResult<Self> {
        let node_type = match value.kind.as_str() {
            SOLUTION_DISCRIMINATOR => NodeType::Solution,
            PROJECT_DISCRIMINATOR => NodeType::Project,
            PACKAGE_DISCRIMINATOR => NodeType::Package,
            _ => return Err(GraphError::UnknownNodeType(value.kind)),
        };

        Node::from_stored(node_type, value.id, value.path, value.version.flatten())
    }
}

impl From<&DependencyGraph> for JsonGraph {
    fn from(graph: &DependencyGraph) -> Self {
        Self {
            root: graph.root().map(JsonNode::from),
            nodes: graph.nodes().map(JsonNode::from).collect(),
            edges: graph
                .edges()
                .map(|edge| JsonEdge {
                    start: edge.start().into(),
                    end: edge.end().into(),
                    label: edge.label().to_string(),
                })
                .collect(),
        }
    }
}

impl TryFrom<JsonGraph> for DependencyGraph {
    type Error = GraphError;

    fn try_from(value: JsonGraph) -> GraphResult<Self> {
        let root = value.root.map(Node::try_from).transpose()?;

        let nodes = value
            .nodes
            .into_iter()
            .map(Node::try_from)
            .collect::<GraphResult<Vec<_>>>()?;

        let edges = value
            .edges
            .into_iter()
            .map(|edge| -> GraphResult<Edge> {
                Ok(Edge::with_label(
                    edge.start.try_into()?,
                    edge.end.try_into()?,
                    edge.label,
                ))
            })
            .collect::<GraphResult<Vec<_>>>()?;

        debug!(nodes = nodes.len(), edges = edges.len(), "imported JSON graph");

        Ok(DependencyGraph::from_parts(root, nodes, edges))
    }
}

/// Serializes a graph to an indented JSON string.
pub fn to_json_string(graph: &DependencyGraph) -> GraphResult<String> {
    Ok(serde_json::to_string_pretty(&JsonGraph::from(graph))?)
}

/// Parses a graph from a JSON string.
///
/// # Errors
///
/// Fails on malformed JSON, a missing edge endpoint, an unknown `$type`
/// discriminator or an empty node id.
///
/// # Example
///
/// ```rust
/// use dependify::export::json::{parse_str, to_json_string};
/// use dependify::graph::{DependencyGraph, Edge, Node};
///
/// let api = Node::project("/repo/Api/Api.csproj").unwrap();
/// let serilog = Node::package("Serilog", Some("3.1.1")).unwrap();
///
/// let mut builder = DependencyGraph::builder(api.clone());
/// builder.with_node(serilog.clone()).with_edge(Edge::new(api, serilog.clone()));
///
/// let json = to_json_string(&builder.build()).unwrap();
/// let graph = parse_str(&json).unwrap();
/// assert!(graph.contains(&serilog));
/// ```
pub fn parse_str(input: &str) -> GraphResult<DependencyGraph> {
    let document: JsonGraph = serde_json::from_str(input)?;
    document.try_into()
}

/// Parses a graph from a reader.
pub fn parse_reader<R: Read>(reader: R) -> GraphResult<DependencyGraph> {
    let document: JsonGraph = serde_json::from_reader(reader)?;
    document.try_into()
}

/// Parses a graph from a JSON file.
pub fn parse_file(path: impl AsRef<Path>) -> GraphResult<DependencyGraph> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading JSON graph");

    let file = File::open(path)?;
    parse_reader(BufReader::new(file))
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, graph: &DependencyGraph, writer: &mut W) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&JsonGraph::from(graph))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}
