//! Text encoder capability and registry
//!
//! The classifier depends only on the [`TextEncoder`] surface: a batch of
//! texts in, one fixed-length feature vector per text out. Pretrained
//! transformer internals stay behind this trait; callers register their own
//! factories on an [`EncoderRegistry`] for real encoder families. The
//! built-in `hashing-<dim>` family is a deterministic feature-hashing
//! reference encoder used for tests and as a cheap baseline.

mod hashing;

pub use hashing::HashingEncoder;

use std::collections::HashMap;
use thiserror::Error;

/// Encoder errors
#[derive(Debug, Error)]
pub enum EncoderError {
    /// The named pretrained encoder cannot be resolved
    #[error("cannot resolve encoder for model id '{0}'")]
    Load(String),

    /// A returned feature vector does not match the encoder's dimensionality
    #[error("encoder '{id}' returned a {got}-dim vector, expected {expected}")]
    Shape {
        id: String,
        expected: usize,
        got: usize,
    },
}

/// Result type for encoder operations
pub type Result<T> = std::result::Result<T, EncoderError>;

/// Opaque text-to-representation capability.
///
/// Implementations must return exactly one vector per input text, each of
/// length [`dim`](TextEncoder::dim), preserving input order.
pub trait TextEncoder {
    /// Encode a batch of texts into fixed-length feature vectors
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Feature dimensionality
    fn dim(&self) -> usize;

    /// Model identifier this encoder was resolved from
    fn id(&self) -> &str;
}

/// Verify that an encoder's output honors its declared dimensionality.
///
/// Registered factories are outside this crate's control, so batch shapes
/// are checked at the trust boundary before any head math runs.
pub fn check_batch_shape(encoder: &dyn TextEncoder, features: &[Vec<f32>]) -> Result<()> {
    let expected = encoder.dim();
    for vector in features {
        if vector.len() != expected {
            return Err(EncoderError::Shape {
                id: encoder.id().to_string(),
                expected,
                got: vector.len(),
            });
        }
    }
    Ok(())
}

type EncoderFactory = Box<dyn Fn() -> Box<dyn TextEncoder> + Send + Sync>;

/// Maps model identifier strings to encoder factories.
///
/// Unknown identifiers fail with [`EncoderError::Load`]. The `hashing-<dim>`
/// family (e.g. `hashing-256`) is resolved without registration.
#[derive(Default)]
pub struct EncoderRegistry {
    factories: HashMap<String, EncoderFactory>,
}

impl EncoderRegistry {
    /// Create a registry resolving only the built-in encoder family
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a model identifier
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn TextEncoder> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
    }

    /// Resolve a model identifier into a fresh encoder instance.
    ///
    /// # Errors
    ///
    /// Returns [`EncoderError::Load`] if no factory matches the identifier.
    pub fn load(&self, id: &str) -> Result<Box<dyn TextEncoder>> {
        if let Some(factory) = self.factories.get(id) {
            return Ok(factory());
        }
        if let Some(dim) = id
            .strip_prefix("hashing-")
            .and_then(|d| d.parse::<usize>().ok())
        {
            if dim > 0 {
                return Ok(Box::new(HashingEncoder::new(id, dim)));
            }
        }
        Err(EncoderError::Load(id.to_string()))
    }
}
