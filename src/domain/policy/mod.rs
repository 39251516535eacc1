//! Policy documents - the three variants and their field model.
//!
//! A policy exists in three coordinated renditions: a public-facing
//! policy, a moderator guidance document, and a machine-readable policy
//! consumed by classifiers. All three share one field vocabulary; the
//! variant determines which fields are meaningful and in what order they
//! render.

mod document;
mod field;
mod variant;

pub use document::{DocumentError, OutputFormat, PolicyDocument, Severity};
pub use field::{FieldKey, FieldKind, FieldValue};
pub use variant::PolicyVariant;
