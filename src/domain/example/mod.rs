//! Synthetic test examples generated against a machine policy.
//!
//! An example set is created wholesale per machine-policy revision and
//! replaced wholesale on regeneration; it is never merged with a prior
//! set, so labels applied to a stale set can never leak forward.

mod set;

pub use set::{ExampleError, ExampleLabel, ExampleRecord, ExampleSet, GeneratedExample};
