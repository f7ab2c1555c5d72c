//! Query parameters and result types for the coordinator.

use athanor_core::RecipeNode;
use athanor_graph::traversal::SearchStep;
use serde::Serialize;

/// Default number of paths returned by multi-path queries.
pub const DEFAULT_MAX_PATHS: usize = 5;

/// Which search family answers the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// Forward breadth-first search from the bases.
    #[default]
    Bfs,
    /// Target-to-base depth-first search over the reverse index.
    Dfs,
    /// Advertised meeting-in-the-middle search; currently behaves as
    /// single-path BFS and returns no trees in multi mode.
    Bidirectional,
}

impl Algorithm {
    /// The wire name of this algorithm.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
            Self::Bidirectional => "bidirectional",
        }
    }

    /// Parse a wire parameter; anything unrecognized falls back to BFS.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        match param {
            "dfs" => Self::Dfs,
            "bidirectional" => Self::Bidirectional,
            _ => Self::Bfs,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recipe-synthesis query.
#[derive(Debug, Clone)]
pub struct FindQuery {
    /// Name of the element to synthesize.
    pub target: String,
    /// Search family to dispatch to.
    pub algorithm: Algorithm,
    /// Whether to enumerate multiple distinct recipe trees.
    pub multi: bool,
    /// Number of trees to return in multi mode.
    pub max_paths: usize,
}

impl FindQuery {
    /// Create a query with the default algorithm (BFS), multi mode, and
    /// path count.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            algorithm: Algorithm::default(),
            multi: true,
            max_paths: DEFAULT_MAX_PATHS,
        }
    }

    /// Select the search family.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Ask for a single recipe tree.
    #[must_use]
    pub const fn single_path(mut self) -> Self {
        self.multi = false;
        self
    }

    /// Set the number of trees for multi mode; zero is ignored.
    #[must_use]
    pub const fn with_max_paths(mut self, max_paths: usize) -> Self {
        if max_paths > 0 {
            self.max_paths = max_paths;
        }
        self
    }
}

/// The tree payload of a result: one tree for single-path modes, a list
/// for multi.
///
/// Serializes untagged, so single-path results are a JSON object and
/// multi-path results a JSON array.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TreeReply {
    /// One recipe tree.
    Single(RecipeNode),
    /// Zero or more distinct recipe trees.
    Many(Vec<RecipeNode>),
}

impl TreeReply {
    /// Number of trees in the reply.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(trees) => trees.len(),
        }
    }
}

/// Outcome of a [`FindQuery`].
///
/// [`FindQuery`]: crate::FindQuery
#[derive(Debug, Clone)]
pub struct FindResult {
    /// The synthesized tree(s).
    pub tree: TreeReply,
    /// Nodes visited, accumulated across all underlying searches.
    pub nodes_visited: usize,
    /// BFS trace; populated only for single-path BFS queries.
    pub search_steps: Vec<SearchStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_round_trips_wire_names() {
        for algorithm in [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Bidirectional] {
            assert_eq!(Algorithm::from_param(algorithm.as_str()), algorithm);
        }
    }

    #[test]
    fn unknown_algorithm_defaults_to_bfs() {
        assert_eq!(Algorithm::from_param("dijkstra"), Algorithm::Bfs);
        assert_eq!(Algorithm::from_param(""), Algorithm::Bfs);
    }

    #[test]
    fn query_defaults() {
        let query = FindQuery::new("Mud");
        assert_eq!(query.algorithm, Algorithm::Bfs);
        assert!(query.multi);
        assert_eq!(query.max_paths, DEFAULT_MAX_PATHS);
    }

    #[test]
    fn zero_max_paths_is_ignored() {
        let query = FindQuery::new("Mud").with_max_paths(0);
        assert_eq!(query.max_paths, DEFAULT_MAX_PATHS);
    }

    #[test]
    fn tree_reply_serializes_untagged() {
        let single = TreeReply::Single(RecipeNode::leaf("Water"));
        assert_eq!(serde_json::to_string(&single).expect("json"), r#"{"name":"Water"}"#);

        let many = TreeReply::Many(vec![RecipeNode::leaf("Water")]);
        assert_eq!(serde_json::to_string(&many).expect("json"), r#"[{"name":"Water"}]"#);
    }
}
