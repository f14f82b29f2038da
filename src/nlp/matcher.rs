//! Nearest-neighbor category lookup
//!
//! Embeds the input, scores it against every knowledge entry, keeps the best
//! match, and applies the confidence threshold.

use tracing::debug;

use crate::error::{Error, Result};
use crate::nlp::embedder::{cosine_similarity, Embedder};
use crate::nlp::knowledge::{KnowledgeBase, KnowledgeEntry};

/// Minimum similarity for a category assignment
pub const MIN_SCORE: f32 = 0.25;

/// Category used when the knowledge base is empty or failed to load
pub const GENERAL: &str = "General";

/// Category used when no entry clears the confidence threshold
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Best knowledge-base match for an input
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMatch {
    pub category: String,
    pub score: f32,
}

/// Semantic category matcher over an immutable knowledge-base snapshot
pub struct CategoryMatcher {
    embedder: Box<dyn Embedder>,
    knowledge: KnowledgeBase,
    min_score: f32,
}

impl CategoryMatcher {
    pub fn new(embedder: Box<dyn Embedder>, knowledge: KnowledgeBase) -> Self {
        Self {
            embedder,
            knowledge,
            min_score: MIN_SCORE,
        }
    }

    pub fn set_min_score(&mut self, min_score: f32) {
        self.min_score = min_score;
    }

    /// Nearest entry by embedding similarity; ties keep the earliest entry.
    ///
    /// Returns ("General", 0.0) for an empty knowledge base and
    /// ("Uncategorized", best_score) below the threshold.
    pub fn best_match(&self, text: &str) -> Result<CategoryMatch> {
        if self.knowledge.is_empty() {
            return Ok(CategoryMatch {
                category: GENERAL.to_string(),
                score: 0.0,
            });
        }

        let input = self.embedder.embed(text).map_err(Error::Embedding)?;

        let mut best_entry: Option<&KnowledgeEntry> = None;
        let mut best_score = f32::NEG_INFINITY;
        for entry in self.knowledge.entries() {
            let score = cosine_similarity(&input, &entry.embedding);
            if score > best_score {
                best_score = score;
                best_entry = Some(entry);
            }
        }

        let entry = match best_entry {
            Some(entry) => entry,
            None => {
                return Ok(CategoryMatch {
                    category: GENERAL.to_string(),
                    score: 0.0,
                })
            }
        };

        debug!(
            score = best_score,
            matched = %entry.text,
            category = %entry.category,
            "nearest knowledge entry"
        );

        if best_score < self.min_score {
            return Ok(CategoryMatch {
                category: UNCATEGORIZED.to_string(),
                score: best_score,
            });
        }

        Ok(CategoryMatch {
            category: entry.category.clone(),
            score: best_score,
        })
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }
}
