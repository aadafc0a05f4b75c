//! Execution of compiled workflow graphs.

use super::{Edge, Node, Target};
use crate::context::RunContext;
use crate::errors::BananascapeError;
use crate::utils::elapsed_ms;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Result of a traced graph run.
#[derive(Debug)]
pub struct GraphRun<S> {
    /// The final state.
    pub state: S,
    /// Node names in execution order.
    pub path: Vec<String>,
    /// Total execution time in milliseconds.
    pub duration_ms: f64,
}

impl<S> GraphRun<S> {
    /// Returns the number of node executions.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len()
    }
}

/// A validated workflow graph, ready to run.
pub struct CompiledGraph<S: Send + 'static> {
    name: String,
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    node_order: Vec<String>,
    edges: HashMap<String, Edge<S>>,
    entry: String,
    step_limit: usize,
}

impl<S: Send + 'static> fmt::Debug for CompiledGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("name", &self.name)
            .field("nodes", &self.node_order)
            .field("edges", &self.edges)
            .field("entry", &self.entry)
            .field("step_limit", &self.step_limit)
            .finish()
    }
}

impl<S: Send + 'static> CompiledGraph<S> {
    pub(crate) fn new(
        name: String,
        nodes: HashMap<String, Arc<dyn Node<S>>>,
        node_order: Vec<String>,
        edges: HashMap<String, Edge<S>>,
        entry: String,
        step_limit: usize,
    ) -> Self {
        Self {
            name,
            nodes,
            node_order,
            edges,
            entry,
            step_limit,
        }
    }

    /// Returns the graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the entry node name.
    #[must_use]
    pub fn entry_point(&self) -> &str {
        &self.entry
    }

    /// Returns node names in declaration order.
    #[must_use]
    pub fn node_names(&self) -> Vec<&str> {
        self.node_order.iter().map(String::as_str).collect()
    }

    /// Returns the step limit.
    #[must_use]
    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Runs the graph to completion and returns the final state.
    pub async fn invoke(&self, state: S, ctx: &RunContext) -> Result<S, BananascapeError> {
        Ok(self.invoke_traced(state, ctx).await?.state)
    }

    /// Runs the graph to completion, recording the path taken.
    ///
    /// # Errors
    ///
    /// Returns the first error a node raises, [`BananascapeError::UnknownBranch`]
    /// when a router returns an undeclared key, and
    /// [`BananascapeError::StepLimitExceeded`] when the run does not reach the
    /// end within the step limit.
    pub async fn invoke_traced(
        &self,
        state: S,
        ctx: &RunContext,
    ) -> Result<GraphRun<S>, BananascapeError> {
        let start = Instant::now();
        let mut state = state;
        let mut path: Vec<String> = Vec::new();
        let mut current = self.entry.clone();

        ctx.emit_event(
            "workflow.started",
            Some(serde_json::json!({
                "graph": &self.name,
                "entry": &self.entry,
            })),
        );

        loop {
            if path.len() >= self.step_limit {
                warn!(graph = %self.name, limit = self.step_limit, "Step limit exceeded");
                ctx.emit_event(
                    "workflow.failed",
                    Some(serde_json::json!({
                        "graph": &self.name,
                        "reason": "step_limit",
                        "steps": path.len(),
                    })),
                );
                return Err(BananascapeError::StepLimitExceeded {
                    graph: self.name.clone(),
                    limit: self.step_limit,
                });
            }

            let node = self.nodes.get(&current).ok_or_else(|| {
                BananascapeError::Internal(format!("Node '{current}' vanished from graph"))
            })?;

            debug!(graph = %self.name, node = %current, step = path.len() + 1, "Running node");
            ctx.emit_event(
                "node.started",
                Some(serde_json::json!({
                    "node": &current,
                    "step": path.len() + 1,
                })),
            );

            let node_start = Instant::now();
            state = match node.run(state, ctx).await {
                Ok(next) => next,
                Err(err) => {
                    ctx.emit_event(
                        "node.failed",
                        Some(serde_json::json!({
                            "node": &current,
                            "error": err.to_string(),
                            "duration_ms": elapsed_ms(node_start),
                        })),
                    );
                    return Err(err);
                }
            };

            ctx.emit_event(
                "node.completed",
                Some(serde_json::json!({
                    "node": &current,
                    "duration_ms": elapsed_ms(node_start),
                })),
            );
            path.push(current.clone());

            match self.next_target(&current, &state)? {
                Target::End => break,
                Target::Node(next) => current = next,
            }
        }

        let duration_ms = elapsed_ms(start);
        ctx.emit_event(
            "workflow.completed",
            Some(serde_json::json!({
                "graph": &self.name,
                "steps": path.len(),
                "duration_ms": duration_ms,
            })),
        );

        Ok(GraphRun {
            state,
            path,
            duration_ms,
        })
    }

    fn next_target(&self, node: &str, state: &S) -> Result<Target, BananascapeError> {
        let edge = self.edges.get(node).ok_or_else(|| {
            BananascapeError::Internal(format!("Node '{node}' has no outgoing edge"))
        })?;

        match edge {
            Edge::Direct(target) => Ok(target.clone()),
            Edge::Conditional { router, branches } => {
                let key = router(state);
                branches
                    .get(key)
                    .cloned()
                    .ok_or_else(|| BananascapeError::UnknownBranch {
                        node: node.to_string(),
                        branch: key.to_string(),
                    })
            }
        }
    }
}
