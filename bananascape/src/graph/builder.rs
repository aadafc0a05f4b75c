//! Graph builder with compile-time validation.

use super::{CompiledGraph, Node, RouterFn, Target};
use crate::errors::{GraphErrorInfo, GraphValidationError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Default maximum number of node executions per run.
pub const DEFAULT_STEP_LIMIT: usize = 100;

/// An outgoing edge of a node.
pub(crate) enum Edge<S> {
    /// Always continue to the target.
    Direct(Target),
    /// Ask the router for a branch key and continue to the mapped target.
    Conditional {
        router: RouterFn<S>,
        branches: BTreeMap<String, Target>,
    },
}

impl<S> Edge<S> {
    fn targets(&self) -> Vec<&Target> {
        match self {
            Self::Direct(target) => vec![target],
            Self::Conditional { branches, .. } => branches.values().collect(),
        }
    }
}

impl<S> fmt::Debug for Edge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(target) => f.debug_tuple("Direct").field(target).finish(),
            Self::Conditional { branches, .. } => f
                .debug_struct("Conditional")
                .field("branches", branches)
                .finish_non_exhaustive(),
        }
    }
}

/// Builder for creating validated workflow graphs.
///
/// Builder calls never fail; every structural problem is reported by
/// [`GraphBuilder::compile`].
pub struct GraphBuilder<S: Send + 'static> {
    name: String,
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    node_order: Vec<String>,
    duplicate_nodes: Vec<String>,
    edges: Vec<(String, Edge<S>)>,
    entry: Option<String>,
    step_limit: usize,
}

impl<S: Send + 'static> fmt::Debug for GraphBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("name", &self.name)
            .field("nodes", &self.node_order)
            .field("entry", &self.entry)
            .field("step_limit", &self.step_limit)
            .finish_non_exhaustive()
    }
}

impl<S: Send + 'static> GraphBuilder<S> {
    /// Creates a new graph builder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: HashMap::new(),
            node_order: Vec::new(),
            duplicate_nodes: Vec::new(),
            edges: Vec::new(),
            entry: None,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Adds a node under its own name.
    #[must_use]
    pub fn add_node(self, node: impl Node<S> + 'static) -> Self {
        self.add_shared_node(Arc::new(node))
    }

    /// Adds an already shared node under its own name.
    #[must_use]
    pub fn add_shared_node(mut self, node: Arc<dyn Node<S>>) -> Self {
        let name = node.name().to_string();
        if self.nodes.contains_key(&name) {
            self.duplicate_nodes.push(name);
        } else {
            self.node_order.push(name.clone());
            self.nodes.insert(name, node);
        }
        self
    }

    /// Sets the node execution starts at.
    #[must_use]
    pub fn set_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry = Some(name.into());
        self
    }

    /// Adds an unconditional edge.
    #[must_use]
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<Target>) -> Self {
        self.edges.push((source.into(), Edge::Direct(target.into())));
        self
    }

    /// Adds a conditional edge: `router` picks a key, `branches` maps keys to targets.
    #[must_use]
    pub fn add_conditional_edges<R, I, K>(
        mut self,
        source: impl Into<String>,
        router: R,
        branches: I,
    ) -> Self
    where
        R: Fn(&S) -> &'static str + Send + Sync + 'static,
        I: IntoIterator<Item = (K, Target)>,
        K: Into<String>,
    {
        let branches = branches
            .into_iter()
            .map(|(key, target)| (key.into(), target))
            .collect();
        self.edges.push((
            source.into(),
            Edge::Conditional {
                router: Arc::new(router),
                branches,
            },
        ));
        self
    }

    /// Sets the maximum number of node executions per run.
    #[must_use]
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    /// Returns the graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of distinct nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Validates the graph and freezes it for execution.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph is empty, has no known entry point,
    /// declares a node twice, references an unknown node, gives a node more
    /// than one outgoing edge, leaves a node without one, or declares a
    /// conditional edge with no branches.
    pub fn compile(self) -> Result<CompiledGraph<S>, GraphValidationError> {
        if self.nodes.is_empty() {
            return Err(GraphValidationError::new(format!(
                "Graph '{}' has no nodes",
                self.name
            ))
            .with_error_info(
                GraphErrorInfo::new("GRAPH-EMPTY", "Cannot compile an empty graph")
                    .with_fix_hint("Add at least one node before compiling."),
            ));
        }

        if let Some(name) = self.duplicate_nodes.first() {
            return Err(GraphValidationError::new(format!(
                "Node '{name}' is declared more than once"
            ))
            .with_nodes(vec![name.clone()])
            .with_error_info(
                GraphErrorInfo::new("GRAPH-DUPLICATE-NODE", "Duplicate node name")
                    .with_fix_hint("Give every node a unique name."),
            ));
        }

        let entry = match self.entry {
            Some(ref entry) => entry.clone(),
            None => {
                return Err(GraphValidationError::new(format!(
                    "Graph '{}' has no entry point",
                    self.name
                ))
                .with_error_info(
                    GraphErrorInfo::new("GRAPH-NO-ENTRY", "Entry point not set")
                        .with_fix_hint("Call set_entry_point with the first node's name."),
                ));
            }
        };
        if !self.nodes.contains_key(&entry) {
            return Err(unknown_node(&entry, "entry point"));
        }

        let mut edges: HashMap<String, Edge<S>> = HashMap::new();
        for (source, edge) in self.edges {
            if !self.nodes.contains_key(&source) {
                return Err(unknown_node(&source, "edge source"));
            }
            if let Edge::Conditional { ref branches, .. } = edge {
                if branches.is_empty() {
                    return Err(GraphValidationError::new(format!(
                        "Conditional edge from '{source}' declares no branches"
                    ))
                    .with_nodes(vec![source.clone()])
                    .with_error_info(
                        GraphErrorInfo::new("GRAPH-EMPTY-BRANCHES", "Conditional edge without branches")
                            .with_fix_hint("Map every key the router can return to a target."),
                    ));
                }
            }
            for target in edge.targets() {
                if let Target::Node(name) = target {
                    if !self.nodes.contains_key(name) {
                        return Err(unknown_node(name, "edge target").with_nodes(vec![
                            source.clone(),
                            name.clone(),
                        ]));
                    }
                }
            }
            if edges.contains_key(&source) {
                return Err(GraphValidationError::new(format!(
                    "Node '{source}' has more than one outgoing edge"
                ))
                .with_nodes(vec![source.clone()])
                .with_error_info(
                    GraphErrorInfo::new("GRAPH-DUPLICATE-EDGE", "Ambiguous outgoing edge")
                        .with_fix_hint("Use a single conditional edge to choose between targets."),
                ));
            }
            edges.insert(source, edge);
        }

        if let Some(name) = self.node_order.iter().find(|name| !edges.contains_key(*name)) {
            return Err(GraphValidationError::new(format!(
                "Node '{name}' has no outgoing edge"
            ))
            .with_nodes(vec![name.clone()])
            .with_error_info(
                GraphErrorInfo::new("GRAPH-DANGLING-NODE", "Node without outgoing edge")
                    .with_fix_hint("Add an edge to another node or to Target::End."),
            ));
        }

        Ok(CompiledGraph::new(
            self.name,
            self.nodes,
            self.node_order,
            edges,
            entry,
            self.step_limit,
        ))
    }
}

fn unknown_node(name: &str, role: &str) -> GraphValidationError {
    GraphValidationError::new(format!("Unknown node '{name}' used as {role}"))
        .with_nodes(vec![name.to_string()])
        .with_error_info(
            GraphErrorInfo::new("GRAPH-UNKNOWN-NODE", format!("Node '{name}' not found"))
                .with_context_entry("role", role)
                .with_fix_hint("Add the node before compiling, or check the name for typos."),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::FnNode;

    fn inc(name: &str) -> FnNode<u32, impl Fn(u32) -> Result<u32, crate::errors::BananascapeError> + Send + Sync> {
        FnNode::new(name, |n: u32| Ok(n + 1))
    }

    #[test]
    fn test_compile_linear_graph() {
        let graph = GraphBuilder::new("linear")
            .add_node(inc("a"))
            .add_node(inc("b"))
            .set_entry_point("a")
            .add_edge("a", "b")
            .add_edge("b", Target::End)
            .compile()
            .unwrap();

        assert_eq!(graph.name(), "linear");
        assert_eq!(graph.entry_point(), "a");
        assert_eq!(graph.node_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_graph_rejected() {
        let err = GraphBuilder::<u32>::new("empty").compile().unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-EMPTY"));
    }

    #[test]
    fn test_missing_entry_rejected() {
        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .add_edge("a", Target::End)
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-NO-ENTRY"));

        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .set_entry_point("nope")
            .add_edge("a", Target::End)
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-UNKNOWN-NODE"));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .add_node(inc("a"))
            .set_entry_point("a")
            .add_edge("a", Target::End)
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-DUPLICATE-NODE"));
        assert_eq!(err.nodes, vec!["a"]);
    }

    #[test]
    fn test_unknown_edge_target_rejected() {
        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .set_entry_point("a")
            .add_edge("a", "b")
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-UNKNOWN-NODE"));
        assert_eq!(err.nodes, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_branch_target_rejected() {
        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .set_entry_point("a")
            .add_conditional_edges("a", |_: &u32| "x", [("x", Target::node("ghost"))])
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-UNKNOWN-NODE"));
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .set_entry_point("a")
            .add_edge("a", Target::End)
            .add_edge("a", "a")
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-DUPLICATE-EDGE"));
    }

    #[test]
    fn test_dangling_node_rejected() {
        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .add_node(inc("b"))
            .set_entry_point("a")
            .add_edge("a", Target::End)
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-DANGLING-NODE"));
        assert_eq!(err.nodes, vec!["b"]);
    }

    #[test]
    fn test_empty_branches_rejected() {
        let err = GraphBuilder::new("g")
            .add_node(inc("a"))
            .set_entry_point("a")
            .add_conditional_edges("a", |_: &u32| "x", Vec::<(String, Target)>::new())
            .compile()
            .unwrap_err();
        assert_eq!(err.code(), Some("GRAPH-EMPTY-BRANCHES"));
    }
}
