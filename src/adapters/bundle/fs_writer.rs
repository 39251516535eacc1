//! Filesystem bundle writer.
//!
//! The mechanical last step after projection: write the three rendered
//! artifacts into an output directory. No state-machine behavior, no
//! knowledge of the workflow.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::export::PolicyBundle;

/// Errors from writing a bundle to disk.
#[derive(Debug, Error)]
pub enum BundleWriteError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Writes exported bundles into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct FsBundleWriter {
    root: PathBuf,
}

impl FsBundleWriter {
    /// Creates a writer targeting `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes every artifact in the bundle, returning the written paths
    /// in bundle order.
    pub fn write(&self, bundle: &PolicyBundle) -> Result<Vec<PathBuf>, BundleWriteError> {
        fs::create_dir_all(&self.root).map_err(|source| BundleWriteError::CreateDir {
            path: self.root.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(bundle.artifacts().len());
        for artifact in bundle.artifacts() {
            let path = self.root.join(&artifact.filename);
            fs::write(&path, &artifact.content).map_err(|source| {
                BundleWriteError::WriteFile {
                    path: path.clone(),
                    source,
                }
            })?;
            tracing::info!(path = %path.display(), "wrote policy artifact");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::policy::{FieldKey, PolicyDocument, PolicyVariant};

    fn bundle() -> PolicyBundle {
        let public = PolicyDocument::new(PolicyVariant::Public, "X")
            .unwrap()
            .with_field(FieldKey::Summary, "public text")
            .unwrap();
        let moderator = PolicyDocument::new(PolicyVariant::Moderator, "X")
            .unwrap()
            .with_field(FieldKey::Description, "moderator text")
            .unwrap();
        let machine = PolicyDocument::new(PolicyVariant::Machine, "X")
            .unwrap()
            .with_field(FieldKey::Description, "machine text")
            .unwrap();
        PolicyBundle::project(&public, &moderator, &machine)
    }

    #[test]
    fn writes_three_files_with_fixed_names() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FsBundleWriter::new(dir.path());

        let written = writer.write(&bundle()).unwrap();
        assert_eq!(written.len(), 3);

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["public-policy.md", "moderator-policy.md", "machine-policy.md"]
        );

        let content = fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("# Public Policy"));
        assert!(content.contains("public text"));
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("policies");
        let writer = FsBundleWriter::new(&nested);

        writer.write(&bundle()).unwrap();
        assert!(nested.join("machine-policy.md").exists());
    }
}
