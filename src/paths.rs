//! Path helpers for node identity and display.
//!
//! All paths handled by the graph use forward slashes regardless of the host
//! platform, so node equality and prefix computations are stable.

use std::env;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Node, NodeType};

/// Replaces every backslash with a forward slash.
///
/// # Example
///
/// ```
/// use dependify::paths::normalize_path;
///
/// assert_eq!(normalize_path(r"C:\repo\src\App.csproj"), "C:/repo/src/App.csproj");
/// ```
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Strips `prefix` from the start of `value`, along with any separators left behind.
///
/// Returns `value` unchanged when it does not start with `prefix`.
///
/// # Example
///
/// ```
/// use dependify::paths::remove_prefix;
///
/// assert_eq!(remove_prefix("/repo/src/App/App.csproj", "/repo/src"), "App/App.csproj");
/// assert_eq!(remove_prefix("/other/App.csproj", "/repo/src"), "/other/App.csproj");
/// ```
pub fn remove_prefix<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.strip_prefix(prefix) {
        Some(rest) => rest.trim_start_matches(['/', '\\']),
        None => value,
    }
}

/// Computes the directory shared by the paths of all project nodes.
///
/// The longest common prefix of the project paths is cut back to its last
/// `/`. Returns an empty string when there are no project nodes or the
/// common prefix contains no separator.
///
/// # Example
///
/// ```
/// use dependify::graph::Node;
/// use dependify::paths::common_prefix;
///
/// let nodes = vec![
///     Node::project("/repo/src/Api/Api.csproj").unwrap(),
///     Node::project("/repo/src/Core/Core.csproj").unwrap(),
///     Node::package("Serilog", Some("3.1.1")).unwrap(),
/// ];
///
/// assert_eq!(common_prefix(&nodes), "/repo/src");
/// ```
pub fn common_prefix<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> String {
    let mut paths = nodes
        .into_iter()
        .filter(|node| node.node_type() == NodeType::Project)
        .map(Node::path);

    let Some(first) = paths.next() else {
        return String::new();
    };

    let shared = paths.fold(first.len(), |len, path| {
        first.as_bytes()[..len]
            .iter()
            .zip(path.as_bytes())
            .take_while(|(a, b)| a == b)
            .count()
    });

    match first.as_bytes()[..shared].iter().rposition(|&b| b == b'/') {
        Some(idx) => first[..idx].to_string(),
        None => String::new(),
    }
}

/// Turns `path` into a normalized absolute path.
///
/// Relative paths are resolved against the current directory. `.` and `..`
/// segments are folded lexically; the file system is never consulted.
pub(crate) fn absolutize(path: &str) -> GraphResult<String> {
    let path = normalize_path(path.trim());

    let full = if is_absolute(&path) {
        path
    } else {
        let cwd = env::current_dir()?;
        let cwd = normalize_path(&cwd.to_string_lossy());
        format!("{}/{}", cwd.trim_end_matches('/'), path)
    };

    Ok(collapse(&full))
}

/// Splits a normalized path into its parent directory and file name.
pub(crate) fn split_file(path: &str) -> GraphResult<(&str, &str)> {
    let idx = path.rfind('/');
    let name = idx.map_or(path, |i| &path[i + 1..]);

    if name.is_empty() {
        return Err(GraphError::InvalidArgument {
            name: "path",
            reason: format!("'{path}' does not name a file"),
        });
    }

    // A file directly under a root keeps the root as its directory.
    let dir = match idx {
        None => "",
        Some(0) => "/",
        Some(i) if path[..i].ends_with(':') => &path[..=i],
        Some(i) => &path[..i],
    };

    Ok((dir, name))
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || drive_prefix(path).is_some()
}

/// Returns `X:` for paths of the form `X:/...`.
fn drive_prefix(path: &str) -> Option<&str> {
    let bytes = path.as_bytes();
    (bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/')
        .then(|| &path[..2])
}

fn collapse(path: &str) -> String {
    let (root, rest) = if let Some(drive) = drive_prefix(path) {
        (format!("{drive}/"), &path[3..])
    } else if let Some(rest) = path.strip_prefix("//") {
        ("//".to_string(), rest)
    } else if let Some(rest) = path.strip_prefix('/') {
        ("/".to_string(), rest)
    } else {
        (String::new(), path)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    root + &segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(r"src\App\App.csproj"), "src/App/App.csproj");
        assert_eq!(normalize_path("/already/fine"), "/already/fine");
    }

    #[test]
    fn test_absolutize_collapses_segments() {
        assert_eq!(
            absolutize("/repo/src/./App/../Core/Core.csproj").unwrap(),
            "/repo/src/Core/Core.csproj"
        );
        assert_eq!(
            absolutize(r"C:\repo\src\App\App.csproj").unwrap(),
            "C:/repo/src/App/App.csproj"
        );
        assert_eq!(absolutize("//server/share/A.sln").unwrap(), "//server/share/A.sln");
    }

    #[test]
    fn test_absolutize_relative_uses_current_dir() {
        let cwd = normalize_path(&env::current_dir().unwrap().to_string_lossy());
        let resolved = absolutize("App/App.csproj").unwrap();

        assert!(resolved.starts_with(cwd.trim_end_matches('/')));
        assert!(resolved.ends_with("/App/App.csproj"));
    }

    #[test]
    fn test_split_file() {
        assert_eq!(
            split_file("/repo/src/App.csproj").unwrap(),
            ("/repo/src", "App.csproj")
        );
        assert_eq!(split_file("/App.csproj").unwrap(), ("/", "App.csproj"));
        assert_eq!(split_file("C:/App.csproj").unwrap(), ("C:/", "App.csproj"));
        assert!(split_file("/repo/").is_err());
    }

    #[test]
    fn test_remove_prefix() {
        assert_eq!(remove_prefix("/repo/a/b.csproj", "/repo"), "a/b.csproj");
        assert_eq!(remove_prefix("/repo/a/b.csproj", ""), "repo/a/b.csproj");
        assert_eq!(remove_prefix("/x/b.csproj", "/repo"), "/x/b.csproj");
    }

    #[test]
    fn test_common_prefix_projects_only() {
        let nodes = vec![
            Node::project("/repo/src/Api/Api.csproj").unwrap(),
            Node::project("/repo/tests/Api.Tests/Api.Tests.csproj").unwrap(),
            Node::solution(Some("/elsewhere/All.sln")).unwrap(),
        ];

        assert_eq!(common_prefix(&nodes), "/repo");
    }

    #[test]
    fn test_common_prefix_single_project() {
        let nodes = vec![Node::project("/repo/src/Api/Api.csproj").unwrap()];
        assert_eq!(common_prefix(&nodes), "/repo/src/Api");
    }

    #[test]
    fn test_common_prefix_without_projects() {
        let nodes = vec![Node::package("Serilog", None).unwrap()];
        assert_eq!(common_prefix(&nodes), "");
        assert_eq!(common_prefix(std::iter::empty()), "");
    }
}
