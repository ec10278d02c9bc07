//! Feature-hashing bag-of-words reference encoder

use super::{Result, TextEncoder};

/// FNV-1a 64-bit hash. Hand-rolled so feature slots are stable across
/// platforms and std releases.
fn fnv1a(token: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x100_0000_01b3;

    let mut hash = OFFSET;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Deterministic feature-hashing encoder.
///
/// Tokenizes on whitespace, hashes each lowercased token into one of `dim`
/// slots with a sign bit to reduce collision bias, and L2-normalizes the
/// resulting counts. Same text always produces the same vector.
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    id: String,
    dim: usize,
}

impl HashingEncoder {
    /// Create an encoder with the given identifier and dimensionality
    #[must_use]
    pub fn new(id: impl Into<String>, dim: usize) -> Self {
        assert!(dim > 0, "encoder dimensionality must be positive");
        Self { id: id.into(), dim }
    }
}

impl TextEncoder for HashingEncoder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let features = texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; self.dim];
                for token in text.split_whitespace() {
                    let hash = fnv1a(&token.to_lowercase());
                    let slot = (hash % self.dim as u64) as usize;
                    let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
                    vector[slot] += sign;
                }
                let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for v in &mut vector {
                        *v /= norm;
                    }
                }
                vector
            })
            .collect();
        Ok(features)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = HashingEncoder::new("hashing-64", 64);
        let a = encoder.encode(&["acute renal failure"]).unwrap();
        let b = encoder.encode(&["acute renal failure"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_batch_shape() {
        let encoder = HashingEncoder::new("hashing-32", 32);
        let features = encoder.encode(&["sepsis", "hip fracture", "stroke"]).unwrap();
        assert_eq!(features.len(), 3);
        assert!(features.iter().all(|f| f.len() == 32));
    }

    #[test]
    fn test_encode_case_insensitive() {
        let encoder = HashingEncoder::new("hashing-64", 64);
        let a = encoder.encode(&["Sepsis"]).unwrap();
        let b = encoder.encode(&["sepsis"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_distinct_texts_differ() {
        let encoder = HashingEncoder::new("hashing-64", 64);
        let features = encoder.encode(&["acute sepsis", "hip fracture"]).unwrap();
        assert_ne!(features[0], features[1]);
    }

    #[test]
    fn test_encode_is_l2_normalized() {
        let encoder = HashingEncoder::new("hashing-64", 64);
        let features = encoder.encode(&["acute on chronic renal failure"]).unwrap();
        let norm: f32 = features[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_fnv1a_known_value() {
        // FNV-1a reference: hash of empty input is the offset basis.
        assert_eq!(fnv1a(""), 0xcbf2_9ce4_8422_2325);
        assert_ne!(fnv1a("a"), fnv1a("b"));
    }
}
