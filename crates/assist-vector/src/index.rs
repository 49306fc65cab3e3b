//! In-memory flat vector index
//!
//! Exact nearest-neighbor search by Euclidean distance. The index is built
//! once from the knowledge base question embeddings and never mutated, so
//! concurrent readers need no locking. A linear scan is exact and entirely
//! adequate at knowledge-base scale.

use assist_core::{AssistError, Result};

/// Exact 1-nearest-neighbor index over a fixed set of vectors.
///
/// Stored vector `i` corresponds to position `i` in the collection the index
/// was built from, so a search result can be mapped straight back to its
/// knowledge entry.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    /// Build an index from pre-computed vectors.
    ///
    /// All vectors must share one non-zero dimension. An empty set is
    /// rejected; callers model "no knowledge base" as "no index".
    pub fn from_vectors(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let Some(first) = vectors.first() else {
            return Err(AssistError::SearchError(
                "Cannot build an index from zero vectors".to_string(),
            ));
        };

        let dimension = first.len();
        if dimension == 0 {
            return Err(AssistError::SearchError(
                "Cannot build an index from zero-dimensional vectors".to_string(),
            ));
        }

        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(AssistError::SearchError(format!(
                    "Vector {i} has dimension {}, expected {dimension}",
                    vector.len()
                )));
            }
        }

        Ok(Self { dimension, vectors })
    }

    /// Position of the nearest stored vector and its Euclidean distance.
    pub fn nearest(&self, query: &[f32]) -> Result<(usize, f32)> {
        if query.len() != self.dimension {
            return Err(AssistError::SearchError(format!(
                "Query has dimension {}, expected {}",
                query.len(),
                self.dimension
            )));
        }

        let mut best_index = 0;
        let mut best_distance = f32::INFINITY;
        for (i, vector) in self.vectors.iter().enumerate() {
            let distance = euclidean_distance(query, vector);
            if distance < best_distance {
                best_index = i;
                best_distance = distance;
            }
        }

        Ok((best_index, best_distance))
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Always false: construction rejects empty vector sets.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimension shared by all stored vectors.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Euclidean (L2) distance between two equal-length vectors.
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    let sum: f32 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum();
    sum.sqrt()
}

// ============================================================================
// Tests
// ============================================================================
