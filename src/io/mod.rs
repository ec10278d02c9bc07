//! Model persistence

mod artifact;

pub use artifact::{ArtifactError, ArtifactMetadata, ModelArtifact, Result};
