//! Small helpers shared across workflows: timestamps and input validation.

pub mod timestamps;
mod validation;

pub use timestamps::{elapsed_ms, iso_timestamp};
pub use validation::validate_subject;
