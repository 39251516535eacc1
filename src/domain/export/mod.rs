//! Export - pure projection of final documents into markdown artifacts.

mod projector;

pub use projector::{render_policy_markdown, PolicyArtifact, PolicyBundle};
