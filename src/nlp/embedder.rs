//! Embedder trait and implementations for semantic categorization
//!
//! Provides abstraction over embedding backends:
//! - HashEmbedder: deterministic token-hash projection (built-in, no model file)
//! - Model2VecEmbedder: neural static embeddings (requires model download)

use anyhow::{Context, Result};
use model2vec::Model2Vec;
use std::path::{Path, PathBuf};

use crate::config::DEFAULT_MODEL_ID;

/// Embedding model abstraction
pub trait Embedder: Send + Sync {
    /// Generate embedding for a single text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;

    /// Get model name/identifier
    fn name(&self) -> &str;
}

/// Cosine similarity between two embeddings, in [-1, 1].
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

// ============================================================================
// Hash Embedder
// ============================================================================

/// Hash embedder dimension
pub const HASH_EMBEDDING_DIM: usize = 384;

/// Deterministic token-hash embedder.
///
/// Each token is projected onto a pseudo-random unit vector seeded by its
/// hash; the text embedding is the normalized sum. Texts sharing tokens get
/// positive similarity, disjoint texts score near zero. No model file is
/// needed and output is stable within a process.
pub struct HashEmbedder;

impl HashEmbedder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut acc = vec![0.0f32; HASH_EMBEDDING_DIM];

        for token in tokenize(text) {
            let vector = token_vector(&token);
            for (slot, value) in acc.iter_mut().zip(vector.iter()) {
                *slot += value;
            }
        }

        normalize(&mut acc);
        Ok(acc)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimension(&self) -> usize {
        HASH_EMBEDDING_DIM
    }

    fn name(&self) -> &str {
        "hash-384"
    }
}

/// Lowercased alphanumeric tokens of `text`
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// FNV-1a hash of a token, used to seed its projection
fn token_seed(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// splitmix64 step, the PRNG behind each token's projection stream
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e3779b97f4a7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Unit pseudo-random vector for a token
fn token_vector(token: &str) -> Vec<f32> {
    let mut state = token_seed(token);
    let mut vector: Vec<f32> = (0..HASH_EMBEDDING_DIM)
        .map(|_| {
            let raw = splitmix64(&mut state) >> 11;
            (raw as f64 / (1u64 << 53) as f64 * 2.0 - 1.0) as f32
        })
        .collect();
    normalize(&mut vector);
    vector
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

// ============================================================================
// Model2Vec Embedder
// ============================================================================

/// Model2Vec embedding dimension (potion models use 256d)
pub const MODEL2VEC_DIM: usize = 256;

/// Model2Vec based embedder for semantic categorization
pub struct Model2VecEmbedder {
    model: Model2Vec,
    model_name: String,
}

impl Model2VecEmbedder {
    /// Load model from local path
    pub fn from_path(path: &Path) -> Result<Self> {
        let model = Model2Vec::from_pretrained(path.to_string_lossy().as_ref(), None, None)
            .with_context(|| format!("Failed to load Model2Vec from: {}", path.display()))?;

        Ok(Self {
            model,
            model_name: path.to_string_lossy().to_string(),
        })
    }

    /// Load model from HuggingFace Hub
    pub fn from_pretrained(model_id: &str) -> Result<Self> {
        let model = Model2Vec::from_pretrained(model_id, None, None)
            .with_context(|| format!("Failed to load Model2Vec: {}", model_id))?;

        Ok(Self {
            model,
            model_name: model_id.to_string(),
        })
    }
}

impl Embedder for Model2VecEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text];
        let embeddings = self.model.encode(&texts).context("Failed to encode text")?;
        Ok(embeddings.row(0).to_vec())
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let embeddings = self.model.encode(texts).context("Failed to encode texts")?;
        Ok(embeddings.rows().into_iter().map(|r| r.to_vec()).collect())
    }

    fn dimension(&self) -> usize {
        MODEL2VEC_DIM
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Local HuggingFace cache path for the default model, if present.
pub fn cached_model_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    let cache_path = PathBuf::from(home)
        .join(".cache/huggingface/hub/models--minishlab--potion-multilingual-128M/snapshots");

    if cache_path.exists() {
        if let Ok(entries) = std::fs::read_dir(&cache_path) {
            for entry in entries.flatten() {
                if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                    return Some(entry.path());
                }
            }
        }
    }
    None
}

// ============================================================================
// Factory function
// ============================================================================

/// Embedder selection, resolved from the `model` config section
#[derive(Debug, Clone, Default)]
pub struct EmbedderConfig {
    pub advanced: bool,
    pub model_path: Option<String>,
    pub model_id: Option<String>,
}

/// Create embedder based on configuration
pub fn create_embedder(config: &EmbedderConfig) -> Result<Box<dyn Embedder>> {
    if !config.advanced {
        return Ok(Box::new(HashEmbedder::new()));
    }

    if let Some(path) = &config.model_path {
        return Ok(Box::new(Model2VecEmbedder::from_path(Path::new(path))?));
    }

    if let Some(cached) = cached_model_path() {
        return Ok(Box::new(Model2VecEmbedder::from_path(&cached)?));
    }

    let model_id = config.model_id.as_deref().unwrap_or(DEFAULT_MODEL_ID);
    Ok(Box::new(Model2VecEmbedder::from_pretrained(model_id)?))
}
