//! Few-shot example store — a fixed table of example rewrites with
//! precomputed embedding vectors, loaded once at startup.
//!
//! Selection is a single linear scan: score every stored vector against the
//! query by cosine similarity and take the top K. The table is small (a few
//! hundred entries at most), so no index structure is used.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::embedding::cosine_similarity;

#[derive(Debug, Error)]
pub enum ExampleStoreError {
    #[error("Failed to read example file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse example file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Example file contains no examples")]
    Empty,

    #[error("Example {index} has a {found}-dim embedding, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("Query embedding is {found}-dim, store is {expected}-dim")]
    QueryDimension { expected: usize, found: usize },
}

/// One stored rewrite example: a dysfunctional original, its functional
/// rewrite, and the precomputed embedding of the original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FewShotExample {
    pub original: String,
    pub functional: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ExampleFile {
    examples: Vec<FewShotExample>,
}

/// An example paired with its similarity to the current query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredExample<'a> {
    pub example: &'a FewShotExample,
    pub similarity: f32,
}

/// The in-memory example table. Immutable after load.
#[derive(Debug)]
pub struct ExampleStore {
    examples: Vec<FewShotExample>,
    dimension: usize,
}

impl ExampleStore {
    /// Loads and validates the example table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ExampleStoreError> {
        let raw = std::fs::read_to_string(path)?;
        let file: ExampleFile = serde_json::from_str(&raw)?;
        Self::from_examples(file.examples)
    }

    /// Builds a store from already-parsed examples, enforcing that the table
    /// is non-empty and that every embedding shares one dimension.
    pub fn from_examples(examples: Vec<FewShotExample>) -> Result<Self, ExampleStoreError> {
        let dimension = examples
            .first()
            .map(|e| e.embedding.len())
            .ok_or(ExampleStoreError::Empty)?;

        for (index, example) in examples.iter().enumerate() {
            if example.embedding.len() != dimension {
                return Err(ExampleStoreError::DimensionMismatch {
                    index,
                    expected: dimension,
                    found: example.embedding.len(),
                });
            }
        }

        Ok(Self {
            examples,
            dimension,
        })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Ranks every stored example against the query by cosine similarity
    /// and returns the top `k`, most similar first. `k` is clamped to the
    /// store size.
    pub fn select<'a>(
        &'a self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredExample<'a>>, ExampleStoreError> {
        if query.len() != self.dimension {
            return Err(ExampleStoreError::QueryDimension {
                expected: self.dimension,
                found: query.len(),
            });
        }

        let mut scored: Vec<ScoredExample<'a>> = self
            .examples
            .iter()
            .map(|example| ScoredExample {
                example,
                similarity: cosine_similarity(query, &example.embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        scored.truncate(k);
        Ok(scored)
    }
}
