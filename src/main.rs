use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dependify::export::{self, json, ExportFormat, MermaidOptions, Orientation};
use dependify::graph::{DependencyGraph, Node};
use dependify::paths::{common_prefix, remove_prefix};

#[derive(Parser)]
#[command(name = "dependify")]
#[command(version, about = "Render and query .NET dependency graphs", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON graph as a diagram
    Render {
        /// Path to a graph previously exported as JSON
        graph: PathBuf,

        /// Output format (dot, mermaid, c4, json)
        #[arg(short, long, default_value = "mermaid")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mermaid flow direction (LR, RL, TB, TD, BT)
        #[arg(long, default_value = "LR")]
        orientation: Orientation,

        /// Do not declare the Mermaid packages subgraph
        #[arg(long)]
        no_packages: bool,

        /// Skip Mermaid link styles and class definitions
        #[arg(long)]
        no_style: bool,

        /// Drop the root node and its edges
        #[arg(long)]
        exclude_root: bool,

        /// Only render what is reachable from the node with this id
        #[arg(short, long)]
        node: Option<String>,

        /// Leave package nodes out of the rendered subgraph
        #[arg(long)]
        exclude_packages: bool,
    },

    /// Show the direct dependencies or dependents of a node
    Query {
        /// Path to a graph previously exported as JSON
        graph: PathBuf,

        /// Id of the node to inspect
        id: String,

        /// List dependents instead of dependencies
        #[arg(short, long)]
        ascendants: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            graph,
            format,
            output,
            orientation,
            no_packages,
            no_style,
            exclude_root,
            node,
            exclude_packages,
        } => {
            let options = MermaidOptions {
                show_packages: !no_packages,
                orientation,
                no_style,
            };
            let view = RenderView {
                node: node.as_deref(),
                exclude_packages,
                exclude_root,
            };
            render(&graph, format, &options, &view, output.as_deref())
        }
        Commands::Query {
            graph,
            id,
            ascendants,
        } => query(&graph, &id, ascendants),
    }
}

/// Narrowing applied to a graph before rendering.
struct RenderView<'a> {
    node: Option<&'a str>,
    exclude_packages: bool,
    exclude_root: bool,
}

fn load(path: &Path) -> Result<DependencyGraph> {
    json::parse_file(path).with_context(|| format!("Failed to load graph from {}", path.display()))
}

fn find_node<'a>(graph: &'a DependencyGraph, id: &str) -> Result<&'a Node> {
    match graph.find_by_id(id) {
        Some(node) => Ok(node),
        None => bail!("No node with id '{}' in the graph", id),
    }
}

fn render(
    path: &Path,
    format: ExportFormat,
    options: &MermaidOptions,
    view: &RenderView<'_>,
    output: Option<&Path>,
) -> Result<()> {
    let mut graph = load(path)?;

    if let Some(id) = view.node {
        let node = find_node(&graph, id)?.clone();
        graph = if view.exclude_packages {
            graph.subgraph_filtered(&node, |n| !n.is_package())
        } else {
            graph.subgraph(&node)
        };
    }

    if view.exclude_root {
        graph = graph.copy_without_root();
    }

    info!(
        %format,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "rendering graph"
    );

    match output {
        Some(target) => {
            let file = File::create(target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
            let mut writer = BufWriter::new(file);
            export::export(format, &graph, options, &mut writer)
                .and_then(|()| writer.flush())
                .with_context(|| format!("Failed to write {}", target.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            export::export(format, &graph, options, &mut writer)
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}

fn query(path: &Path, id: &str, ascendants: bool) -> Result<()> {
    let graph = load(path)?;
    let node = find_node(&graph, id)?;
    let prefix = common_prefix(graph.nodes());

    let usage = graph.usage(node);
    println!("{} ({})", node.id(), node.node_type());
    println!("  depends on projects: {}", usage.depends_on_projects_count());
    println!("  depends on packages: {}", usage.depends_on_packages_count());
    println!("  used by projects:    {}", usage.used_by_count());
    println!();

    let (title, mut related) = if ascendants {
        ("Ascendants", graph.find_ascendants(node))
    } else {
        ("Descendants", graph.find_descendants(node))
    };
    related.sort_by(|a, b| a.id().cmp(b.id()));

    println!("{} ({}):", title, related.len());
    for other in related {
        let location = match other.version() {
            Some(version) => version,
            None if prefix.is_empty() => other.path(),
            None => remove_prefix(other.path(), &prefix),
        };
        println!("  {}  {}", other.id(), location);
    }

    Ok(())
}
