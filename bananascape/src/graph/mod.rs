//! Typed workflow graphs.
//!
//! A workflow is a set of named nodes over a state value `S`. Each node takes
//! the state, returns the updated state, and hands control to the next node
//! along its outgoing edge. Edges are either direct or conditional: a
//! conditional edge asks a router for a branch key and looks the key up in
//! its branch table. Execution ends when an edge points at [`Target::End`].
//!
//! ```rust,ignore
//! let graph = GraphBuilder::new("counter")
//!     .add_node(FnNode::new("increment", |n: u32| Ok(n + 1)))
//!     .set_entry_point("increment")
//!     .add_conditional_edges(
//!         "increment",
//!         |n: &u32| if *n >= 5 { "end" } else { "continue" },
//!         [("continue", Target::node("increment")), ("end", Target::End)],
//!     )
//!     .compile()?;
//!
//! let result = graph.invoke(0, &RunContext::new("counter")).await?;
//! assert_eq!(result, 5);
//! ```

mod builder;
mod compiled;
mod node;

pub use builder::{GraphBuilder, DEFAULT_STEP_LIMIT};
pub use compiled::{CompiledGraph, GraphRun};
pub use node::{AsyncFnNode, FnNode, Node, RouterFn, Target};

pub(crate) use builder::Edge;
