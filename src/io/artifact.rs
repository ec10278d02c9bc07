//! Saving and loading trained models as JSON artifacts

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoder::EncoderRegistry;
use crate::train::{SoftmaxHead, TrainConfig, TrainError, TrainableClassifier};

/// Errors from artifact persistence
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The classifier could not be captured or rebuilt
    #[error("training error: {0}")]
    Train(#[from] TrainError),
}

/// Result type for artifact operations
pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Descriptive metadata stored alongside the weights
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Human-readable artifact name
    pub name: String,
    /// Encoder identifier the head was trained against
    pub model_id: String,
    /// Number of output classes
    pub num_classes: usize,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Full training configuration of the saved model
    pub config: TrainConfig,
    /// Validation accuracy from the search, when known
    pub validation_score: Option<f64>,
}

/// A trained model in portable form: metadata plus head parameters.
///
/// The encoder itself is not serialized; it is rebuilt from `model_id` at
/// load time, and the restore step rejects a head whose shape does not
/// match the rebuilt encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Descriptive metadata
    pub metadata: ArtifactMetadata,
    /// Trained head parameters
    pub head: SoftmaxHead,
}

impl ModelArtifact {
    /// Capture a trained classifier as an artifact.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Untrained`] (wrapped) if the classifier has
    /// not been fit.
    pub fn from_classifier(
        name: impl Into<String>,
        classifier: &TrainableClassifier,
        validation_score: Option<f64>,
    ) -> Result<Self> {
        let head = classifier.head().ok_or(TrainError::Untrained)?.clone();
        let config = classifier.config().clone();
        Ok(Self {
            metadata: ArtifactMetadata {
                name: name.into(),
                model_id: config.model_id.clone(),
                num_classes: classifier.num_classes(),
                created_at: Utc::now(),
                config,
                validation_score,
            },
            head,
        })
    }

    /// Write the artifact as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read an artifact from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Rebuild a ready-to-predict classifier from the artifact.
    ///
    /// # Errors
    ///
    /// Fails if the encoder cannot be resolved or the saved head's shape
    /// does not match it.
    pub fn into_classifier(self, registry: Arc<EncoderRegistry>) -> Result<TrainableClassifier> {
        let classifier = TrainableClassifier::restore(
            self.metadata.config,
            self.metadata.num_classes,
            registry,
            self.head,
        )?;
        Ok(classifier)
    }
}
