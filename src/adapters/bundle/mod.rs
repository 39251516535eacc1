//! Bundle adapters - persisting the exported artifacts.

mod fs_writer;

pub use fs_writer::{BundleWriteError, FsBundleWriter};
