//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.

mod generation_client;

pub use generation_client::{DerivedPolicies, GenerationClient, GenerationFailure};
