//! CLI subcommands

pub mod analyze;
pub mod eval;
pub mod init;
pub mod model;
#[cfg(feature = "server")]
pub mod serve;
pub mod status;

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use crate::config::Config;
use crate::nlp::embedder::{create_embedder, EmbedderConfig};
use crate::nlp::knowledge::KnowledgeBase;
use crate::nlp::Pipeline;

/// Pipeline built from config, with degraded-mode fallback on load failure
pub struct LoadedPipeline {
    pub pipeline: Pipeline,
    pub entries: usize,
    /// Load failure description when running degraded
    pub degraded: Option<String>,
}

pub fn embedder_config(config: &Config) -> EmbedderConfig {
    EmbedderConfig {
        advanced: config.model.advanced,
        model_path: config.model.model_path.clone(),
        model_id: Some(config.model.model_id.clone()),
    }
}

/// Build the prediction pipeline from configuration.
///
/// A knowledge-base load failure is not fatal: the pipeline starts with an
/// empty corpus and every categorization falls back to "General".
pub fn build_pipeline(root: &Path, config: &Config) -> Result<LoadedPipeline> {
    let embedder = create_embedder(&embedder_config(config))?;
    let csv_path = root.join(&config.knowledge.csv_path);

    let (knowledge, degraded) = match KnowledgeBase::load(&csv_path, embedder.as_ref()) {
        Ok(kb) => (kb, None),
        Err(e) => {
            warn!(error = %e, "knowledge base unavailable, continuing in degraded mode");
            (KnowledgeBase::empty(), Some(e.to_string()))
        }
    };

    let entries = knowledge.len();
    let pipeline = Pipeline::new(embedder, knowledge)
        .with_min_score(config.matcher.min_score)
        .with_alert_threshold(config.alerts.high_value_threshold);

    Ok(LoadedPipeline {
        pipeline,
        entries,
        degraded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_build_pipeline_degrades_on_missing_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();

        let loaded = build_pipeline(dir.path(), &config).unwrap();
        assert_eq!(loaded.entries, 0);
        assert!(loaded.degraded.is_some());

        let p = loaded.pipeline.predict("paid 100 for lunch").unwrap();
        assert_eq!(p.category, "General");
    }

    #[test]
    fn test_build_pipeline_from_corpus() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(
            dir.path().join("data/transactions.csv"),
            "text,category\npaid for dinner at a restaurant,Food & Dining\n",
        )
        .unwrap();

        let loaded = build_pipeline(dir.path(), &Config::default()).unwrap();
        assert_eq!(loaded.entries, 1);
        assert!(loaded.degraded.is_none());
    }
}
