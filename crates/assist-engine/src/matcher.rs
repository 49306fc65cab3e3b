//! Semantic knowledge base matcher
//!
//! Embeds the canonical questions once at startup, then answers lookups by
//! nearest-neighbour search over the question vectors. A match only counts
//! when its similarity clears the configured threshold; everything below
//! falls through to the LLM path.

use std::sync::Arc;

use assist_core::{AssistError, KnowledgeBase, KnowledgeEntry, Result};
use assist_vector::{EmbeddingClient, FlatIndex};

/// Convert a Euclidean distance into a similarity in (0, 1].
///
/// Identical vectors score 1.0 and the score decays smoothly with distance.
pub fn similarity_from_distance(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// Outcome of a knowledge base lookup
#[derive(Debug, Clone)]
pub struct KbMatch {
    /// The matched entry, present only when the threshold was cleared
    pub entry: Option<KnowledgeEntry>,

    /// Similarity of the nearest neighbour (0.0 when the base is empty)
    pub similarity: f32,
}

impl KbMatch {
    fn miss(similarity: f32) -> Self {
        Self {
            entry: None,
            similarity,
        }
    }
}

/// Nearest-neighbour matcher over the knowledge base questions
pub struct KnowledgeMatcher {
    knowledge_base: KnowledgeBase,
    index: Option<FlatIndex>,
    embedder: Arc<dyn EmbeddingClient>,
    threshold: f32,
}

impl KnowledgeMatcher {
    /// Embed all questions and build the search index.
    ///
    /// An empty knowledge base is valid and produces a matcher that always
    /// misses.
    pub async fn build(
        knowledge_base: KnowledgeBase,
        embedder: Arc<dyn EmbeddingClient>,
        threshold: f32,
    ) -> Result<Self> {
        let index = if knowledge_base.is_empty() {
            tracing::warn!("Knowledge base is empty, all lookups will miss");
            None
        } else {
            let questions: Vec<String> =
                knowledge_base.questions().map(str::to_string).collect();
            let vectors = embedder.embed_batch(&questions).await?;
            let index = FlatIndex::from_vectors(vectors)?;
            tracing::info!(
                entries = knowledge_base.len(),
                dimension = index.dimension(),
                "Knowledge base indexed"
            );
            Some(index)
        };

        Ok(Self {
            knowledge_base,
            index,
            embedder,
            threshold,
        })
    }

    /// Find the entry closest to the query, if it clears the threshold
    pub async fn match_query(&self, query: &str) -> Result<KbMatch> {
        let Some(index) = &self.index else {
            return Ok(KbMatch::miss(0.0));
        };

        let vector = self.embedder.embed(query).await?;
        let (position, distance) = index.nearest(&vector)?;
        let similarity = similarity_from_distance(distance);

        if similarity < self.threshold {
            tracing::debug!(similarity, threshold = self.threshold, "Below match threshold");
            return Ok(KbMatch::miss(similarity));
        }

        let entry = self
            .knowledge_base
            .get(position)
            .cloned()
            .ok_or_else(|| {
                AssistError::SearchError(format!("Index position {position} has no knowledge entry"))
            })?;

        Ok(KbMatch {
            entry: Some(entry),
            similarity,
        })
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.knowledge_base.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knowledge_base.is_empty()
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Dimension of the embedding space the index was built in
    pub fn embedding_dimension(&self) -> usize {
        self.embedder.dimension()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Embedder that maps known texts to fixed 2D vectors
    struct StaticEmbedder;

    #[async_trait]
    impl EmbeddingClient for StaticEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(match text {
                "reset password" => vec![0.0, 0.0],
                "close to reset" => vec![0.2, 0.0],
                "create project" => vec![10.0, 0.0],
                _ => vec![100.0, 100.0],
            })
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let mut vectors = Vec::with_capacity(texts.len());
            for text in texts {
                vectors.push(self.embed(text).await?);
            }
            Ok(vectors)
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    fn sample_base() -> KnowledgeBase {
        KnowledgeBase::from_entries(vec![
            KnowledgeEntry::new("reset password", "Go to Settings > Security.", "Account"),
            KnowledgeEntry::new("create project", "Use the New Project button.", "Projects"),
        ])
    }

    #[test]
    fn test_similarity_curve() {
        assert_eq!(similarity_from_distance(0.0), 1.0);
        assert_eq!(similarity_from_distance(1.0), 0.5);
        assert!(similarity_from_distance(0.5) > similarity_from_distance(2.0));
        assert!(similarity_from_distance(1000.0) > 0.0);
    }

    #[test]
    fn test_empty_base_always_misses() {
        tokio_test::block_on(async {
            let matcher =
                KnowledgeMatcher::build(KnowledgeBase::from_entries(vec![]), Arc::new(StaticEmbedder), 0.65)
                    .await
                    .unwrap();

            let result = matcher.match_query("reset password").await.unwrap();
            assert!(result.entry.is_none());
            assert_eq!(result.similarity, 0.0);
        });
    }

    #[test]
    fn test_exact_match_scores_one() {
        tokio_test::block_on(async {
            let matcher = KnowledgeMatcher::build(sample_base(), Arc::new(StaticEmbedder), 0.65)
                .await
                .unwrap();

            let result = matcher.match_query("reset password").await.unwrap();
            assert_eq!(result.similarity, 1.0);
            assert_eq!(
                result.entry.unwrap().answer,
                "Go to Settings > Security."
            );
        });
    }

    #[test]
    fn test_near_match_clears_threshold() {
        tokio_test::block_on(async {
            let matcher = KnowledgeMatcher::build(sample_base(), Arc::new(StaticEmbedder), 0.65)
                .await
                .unwrap();

            // Distance 0.2 from "reset password" gives similarity 1/1.2.
            let result = matcher.match_query("close to reset").await.unwrap();
            assert!(result.similarity > 0.8);
            assert_eq!(result.entry.unwrap().category, "Account");
        });
    }

    #[test]
    fn test_distant_query_misses() {
        tokio_test::block_on(async {
            let matcher = KnowledgeMatcher::build(sample_base(), Arc::new(StaticEmbedder), 0.65)
                .await
                .unwrap();

            let result = matcher.match_query("what is the weather").await.unwrap();
            assert!(result.entry.is_none());
            assert!(result.similarity < 0.65);
        });
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        tokio_test::block_on(async {
            // Distance 1.0 gives similarity exactly 0.5.
            struct UnitApart;

            #[async_trait]
            impl EmbeddingClient for UnitApart {
                async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
                    Ok(vec![1.0, 0.0])
                }

                async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
                    Ok(texts.iter().map(|_| vec![0.0, 0.0]).collect())
                }

                fn dimension(&self) -> usize {
                    2
                }
            }

            let base = KnowledgeBase::from_entries(vec![KnowledgeEntry::new(
                "question",
                "answer",
                "General",
            )]);
            let matcher = KnowledgeMatcher::build(base, Arc::new(UnitApart), 0.5)
                .await
                .unwrap();

            let result = matcher.match_query("anything").await.unwrap();
            assert_eq!(result.similarity, 0.5);
            assert!(result.entry.is_some());
        });
    }

    #[test]
    fn test_matcher_reports_shape() {
        tokio_test::block_on(async {
            let matcher = KnowledgeMatcher::build(sample_base(), Arc::new(StaticEmbedder), 0.65)
                .await
                .unwrap();

            assert_eq!(matcher.len(), 2);
            assert!(!matcher.is_empty());
            assert_eq!(matcher.threshold(), 0.65);
            assert_eq!(matcher.embedding_dimension(), 2);
        });
    }
}
