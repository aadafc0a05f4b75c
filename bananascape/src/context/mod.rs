//! Per-run context handed to every workflow node.
//!
//! This module provides:
//! - Run identity (correlation IDs)
//! - The run context that carries the identity and the event sink

mod identity;
mod run;

pub use identity::RunIdentity;
pub use run::RunContext;
