//! Knowledge base of labeled example transactions
//!
//! Loaded once at startup from a CSV corpus with `text` and `category`
//! columns. Embeddings are computed eagerly at load and never mutated; a
//! fresh process is the only way to refresh the corpus.

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::nlp::embedder::Embedder;

/// A labeled example with its precomputed embedding
#[derive(Debug, Clone)]
pub struct KnowledgeEntry {
    pub text: String,
    pub category: String,
    pub embedding: Vec<f32>,
}

/// Immutable snapshot of the labeled corpus, ordered by load order
#[derive(Debug, Default)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Empty knowledge base; the matcher treats this as degraded mode.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the corpus from a CSV file and embed every example.
    pub fn load(path: &Path, embedder: &dyn Embedder) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Knowledge(format!(
                "corpus not found: {}",
                path.display()
            )));
        }

        let rows = read_rows(path)?;
        let kb = Self::from_rows(rows, embedder)?;
        info!(
            entries = kb.len(),
            embedder = embedder.name(),
            "knowledge base ready"
        );
        Ok(kb)
    }

    /// Build a knowledge base from (text, category) rows.
    pub fn from_rows(rows: Vec<(String, String)>, embedder: &dyn Embedder) -> Result<Self> {
        let texts: Vec<&str> = rows.iter().map(|(text, _)| text.as_str()).collect();
        let embeddings = embedder.embed_batch(&texts).map_err(Error::Embedding)?;

        let entries = rows
            .into_iter()
            .zip(embeddings)
            .map(|((text, category), embedding)| KnowledgeEntry {
                text,
                category,
                embedding,
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read (text, category) rows from a CSV file.
///
/// Header names are matched case-insensitively after trimming; both a `text`
/// and a `category` column are required. Rows with a blank text or category
/// are skipped.
pub fn read_rows(path: &Path) -> Result<Vec<(String, String)>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut text_idx = None;
    let mut category_idx = None;
    for (i, header) in headers.iter().enumerate() {
        match header.trim().to_lowercase().as_str() {
            "text" => text_idx = Some(i),
            "category" => category_idx = Some(i),
            _ => {}
        }
    }

    let (text_idx, category_idx) = match (text_idx, category_idx) {
        (Some(t), Some(c)) => (t, c),
        _ => {
            return Err(Error::Knowledge(
                "corpus must contain 'text' and 'category' columns".to_string(),
            ))
        }
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let text = record.get(text_idx).unwrap_or("").trim();
        let category = record.get(category_idx).unwrap_or("").trim();
        if text.is_empty() || category.is_empty() {
            continue;
        }
        rows.push((text.to_string(), category.to_string()));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::embedder::HashEmbedder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_normalizes_headers() {
        let file = write_csv(" Text , Category \npaid for dinner,Food & Dining\nsalary credited,Salary & Income\n");
        let embedder = HashEmbedder::new();
        let kb = KnowledgeBase::load(file.path(), &embedder).unwrap();

        assert_eq!(kb.len(), 2);
        assert_eq!(kb.entries()[0].text, "paid for dinner");
        assert_eq!(kb.entries()[0].category, "Food & Dining");
        assert_eq!(kb.entries()[0].embedding.len(), embedder.dimension());
    }

    #[test]
    fn test_load_preserves_row_order() {
        let file = write_csv("text,category\nfirst,A\nsecond,B\nthird,A\n");
        let embedder = HashEmbedder::new();
        let kb = KnowledgeBase::load(file.path(), &embedder).unwrap();

        let texts: Vec<&str> = kb.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_category_column_is_error() {
        let file = write_csv("text,label\npaid for dinner,Food\n");
        let embedder = HashEmbedder::new();
        let err = KnowledgeBase::load(file.path(), &embedder).unwrap_err();
        assert!(matches!(err, Error::Knowledge(_)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let embedder = HashEmbedder::new();
        let err = KnowledgeBase::load(Path::new("/nonexistent/corpus.csv"), &embedder).unwrap_err();
        assert!(matches!(err, Error::Knowledge(_)));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let file = write_csv("text,category\npaid for dinner,Food\n , \nno label yet,\nsalary credited,Income\n");
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_empty_knowledge_base() {
        let kb = KnowledgeBase::empty();
        assert!(kb.is_empty());
        assert_eq!(kb.len(), 0);
    }
}
