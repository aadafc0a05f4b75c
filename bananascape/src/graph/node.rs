//! Node trait, closure adapters, and edge targets.

use crate::context::RunContext;
use crate::errors::BananascapeError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// One named step of a workflow graph.
///
/// A node owns the state while it runs and hands it back when done. Failures
/// that the workflow should record and route on belong in the state; an `Err`
/// aborts the whole run.
#[async_trait]
pub trait Node<S: Send + 'static>: Send + Sync + Debug {
    /// Returns the name of the node.
    fn name(&self) -> &str;

    /// Runs the node against the current state.
    async fn run(&self, state: S, ctx: &RunContext) -> Result<S, BananascapeError>;
}

/// Routes a conditional edge by returning a branch key for the current state.
pub type RouterFn<S> = Arc<dyn Fn(&S) -> &'static str + Send + Sync>;

/// Where an edge leads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// Another node, by name.
    Node(String),
    /// The end of the workflow.
    End,
}

impl Target {
    /// Creates a node target.
    #[must_use]
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node(name.into())
    }
}

impl From<&str> for Target {
    fn from(name: &str) -> Self {
        Self::Node(name.to_string())
    }
}

/// A node backed by a synchronous closure.
pub struct FnNode<S, F>
where
    F: Fn(S) -> Result<S, BananascapeError> + Send + Sync,
{
    name: String,
    func: F,
    _state: PhantomData<fn(S) -> S>,
}

impl<S, F> FnNode<S, F>
where
    F: Fn(S) -> Result<S, BananascapeError> + Send + Sync,
{
    /// Creates a new closure-backed node.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _state: PhantomData,
        }
    }
}

impl<S, F> Debug for FnNode<S, F>
where
    F: Fn(S) -> Result<S, BananascapeError> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnNode").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<S, F> Node<S> for FnNode<S, F>
where
    S: Send + 'static,
    F: Fn(S) -> Result<S, BananascapeError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: S, _ctx: &RunContext) -> Result<S, BananascapeError> {
        (self.func)(state)
    }
}

/// A node backed by an async closure.
pub struct AsyncFnNode<S, F, Fut>
where
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = Result<S, BananascapeError>> + Send,
{
    name: String,
    func: F,
    _phantom: PhantomData<fn(S) -> Fut>,
}

impl<S, F, Fut> AsyncFnNode<S, F, Fut>
where
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = Result<S, BananascapeError>> + Send,
{
    /// Creates a new async closure-backed node.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _phantom: PhantomData,
        }
    }
}

impl<S, F, Fut> Debug for AsyncFnNode<S, F, Fut>
where
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = Result<S, BananascapeError>> + Send,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncFnNode").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<S, F, Fut> Node<S> for AsyncFnNode<S, F, Fut>
where
    S: Send + 'static,
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = Result<S, BananascapeError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, state: S, _ctx: &RunContext) -> Result<S, BananascapeError> {
        (self.func)(state).await
    }
}
