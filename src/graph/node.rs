//! Graph node model: solutions, projects and packages.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{GraphError, GraphResult};
use crate::paths::{absolutize, normalize_path, split_file};

/// Id of the placeholder solution used when projects are not grouped by a real solution.
pub const EMPTY_SOLUTION_ID: &str = "$default.sln";

/// Base URL used to synthesize the path of a package node.
pub const PACKAGE_REGISTRY_URL: &str = "https://www.nuget.org/packages";

/// Discriminates the kind of entity a [`Node`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
    /// A solution file grouping projects
    Solution,
    /// A project file
    Project,
    /// An external package
    Package,
}

impl NodeType {
    /// Returns the display name of the node type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solution => "Solution",
            Self::Project => "Project",
            Self::Package => "Package",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single entity in the dependency graph.
///
/// Two nodes are equal when they are the same variant with the same path
/// (and, for packages, the same version). The `id` is a short display name
/// and is not guaranteed to be unique.
///
/// # Example
///
/// ```
/// use dependify::graph::{Node, NodeType};
///
/// let node = Node::project("/repo/src/Api/Api.csproj").unwrap();
/// assert_eq!(node.id(), "Api.csproj");
/// assert_eq!(node.directory_path(), "/repo/src/Api");
/// assert_eq!(node.node_type(), NodeType::Project);
/// ```
#[derive(Debug, Clone)]
pub enum Node {
    /// A solution, or the placeholder solution when `path` is empty
    Solution {
        /// File name, or [`EMPTY_SOLUTION_ID`] for the placeholder
        id: String,
        /// Normalized absolute path to the solution file
        path: String,
        /// Normalized directory containing the solution file
        directory_path: String,
    },
    /// A project file
    Project {
        /// File name of the project
        id: String,
        /// Normalized absolute path to the project file
        path: String,
        /// Normalized directory containing the project file
        directory_path: String,
    },
    /// An external package
    Package {
        /// Package name
        id: String,
        /// Registry URL of the package
        path: String,
        /// Requested version, when known
        version: Option<String>,
    },
}

impl Node {
    /// Creates a project node from a project file path.
    ///
    /// Relative paths are resolved against the current directory and all
    /// separators are normalized to `/`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] when `path` is blank or does
    /// not name a file.
    pub fn project(path: &str) -> GraphResult<Self> {
        let (id, path, directory_path) = file_parts(path)?;
        Ok(Self::Project {
            id,
            path,
            directory_path,
        })
    }

    /// Creates a solution node, or the placeholder solution when `path` is absent or blank.
    ///
    /// # Example
    ///
    /// ```
    /// use dependify::graph::Node;
    ///
    /// let placeholder = Node::solution(None).unwrap();
    /// assert!(placeholder.is_empty_solution());
    /// assert_eq!(placeholder.id(), "$default.sln");
    /// assert_eq!(placeholder.path(), "");
    /// ```
    pub fn solution(path: Option<&str>) -> GraphResult<Self> {
        match path.filter(|p| !p.trim().is_empty()) {
            Some(path) => {
                let (id, path, directory_path) = file_parts(path)?;
                Ok(Self::Solution {
                    id,
                    path,
                    directory_path,
                })
            }
            None => Ok(Self::empty_solution()),
        }
    }

    /// Creates the placeholder solution used as a synthetic root.
    pub fn empty_solution() -> Self {
        Self::Solution {
            id: EMPTY_SOLUTION_ID.to_string(),
            path: String::new(),
            directory_path: String::new(),
        }
    }

    /// Creates a package node.
    ///
    /// A blank version is treated as unknown.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidArgument`] when `name` is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use dependify::graph::Node;
    ///
    /// let node = Node::package("Serilog", Some("3.1.1")).unwrap();
    /// assert_eq!(node.path(), "https://www.nuget.org/packages/Serilog/3.1.1");
    /// assert_eq!(node.version(), Some("3.1.1"));
    /// assert!(Node::package("  ", None).is_err());
    /// ```
    pub fn package(name: &str, version: Option<&str>) -> GraphResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GraphError::empty("name"));
        }

        let version = version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self::Package {
            id: name.to_string(),
            path: format!(
                "{PACKAGE_REGISTRY_URL}/{name}/{}",
                version.as_deref().unwrap_or_default()
            ),
            version,
        })
    }

    /// Rebuilds a node from serialized fields.
    ///
    /// Unlike the public constructors this keeps `id` verbatim and never
    /// resolves relative paths. Separators are normalized and the directory
    /// is derived from the stored path. A package stored without a path gets
    /// its registry URL back.
    pub(crate) fn from_stored(
        node_type: NodeType,
        id: String,
        path: String,
        version: Option<String>,
    ) -> GraphResult<Self> {
        if id.trim().is_empty() {
            return Err(GraphError::empty("id"));
        }

        match node_type {
            NodeType::Package if path.trim().is_empty() => Self::package(&id, version.as_deref()),
            NodeType::Package => Ok(Self::Package { id, path, version }),
            NodeType::Solution if path.trim().is_empty() => Ok(Self::empty_solution()),
            NodeType::Solution | NodeType::Project => {
                let path = normalize_path(&path);
                let directory_path = split_file(&path)?.0.to_string();
                Ok(if node_type == NodeType::Solution {
                    Self::Solution {
                        id,
                        path,
                        directory_path,
                    }
                } else {
                    Self::Project {
                        id,
                        path,
                        directory_path,
                    }
                })
            }
        }
    }

    /// Short display name of the node.
    pub fn id(&self) -> &str {
        match self {
            Self::Solution { id, .. } | Self::Project { id, .. } | Self::Package { id, .. } => id,
        }
    }

    /// Full locator: a file path for solutions and projects, a registry URL for packages.
    pub fn path(&self) -> &str {
        match self {
            Self::Solution { path, .. } | Self::Project { path, .. } | Self::Package { path, .. } => {
                path
            }
        }
    }

    /// Directory containing the node's file; empty for packages.
    pub fn directory_path(&self) -> &str {
        match self {
            Self::Solution { directory_path, .. } | Self::Project { directory_path, .. } => {
                directory_path
            }
            Self::Package { .. } => "",
        }
    }

    /// The package version, if this is a package with a known version.
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Package { version, .. } => version.as_deref(),
            _ => None,
        }
    }

    /// Returns the kind of this node.
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Solution { .. } => NodeType::Solution,
            Self::Project { .. } => NodeType::Project,
            Self::Package { .. } => NodeType::Package,
        }
    }

    /// Returns true for the placeholder solution.
    pub fn is_empty_solution(&self) -> bool {
        matches!(self, Self::Solution { id, .. } if id == EMPTY_SOLUTION_ID)
    }

    /// Returns true if this node is a project.
    pub fn is_project(&self) -> bool {
        matches!(self, Self::Project { .. })
    }

    /// Returns true if this node is a package.
    pub fn is_package(&self) -> bool {
        matches!(self, Self::Package { .. })
    }
}

fn file_parts(path: &str) -> GraphResult<(String, String, String)> {
    if path.trim().is_empty() {
        return Err(GraphError::empty("path"));
    }

    let path = absolutize(path)?;
    let (directory, name) = split_file(&path)?;
    let (id, directory_path) = (name.to_string(), directory.to_string());
    Ok((id, path, directory_path))
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.node_type() == other.node_type()
            && self.path() == other.path()
            && self.version() == other.version()
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_type().hash(state);
        self.path().hash(state);
        self.version().hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
