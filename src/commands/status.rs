//! Corpus and model status summary

use std::collections::BTreeMap;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::config::{self, Config};
use crate::nlp::embedder::cached_model_path;
use crate::nlp::knowledge;

#[derive(Serialize)]
struct CorpusStatus {
    csv_path: String,
    entries: usize,
    categories: BTreeMap<String, usize>,
    advanced: bool,
    model_id: String,
    model_available: bool,
    degraded: Option<String>,
}

pub fn run(json: bool) -> Result<()> {
    let root = config::get_app_root();
    let cfg = Config::load(&root);
    let csv_path = root.join(&cfg.knowledge.csv_path);

    let (entries, categories, degraded) = match knowledge::read_rows(&csv_path) {
        Ok(rows) => {
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for (_, category) in &rows {
                *counts.entry(category.clone()).or_insert(0) += 1;
            }
            (rows.len(), counts, None)
        }
        Err(e) => (0, BTreeMap::new(), Some(e.to_string())),
    };

    let model_available = cfg.model.model_path.is_some() || cached_model_path().is_some();

    let status = CorpusStatus {
        csv_path: cfg.knowledge.csv_path.clone(),
        entries,
        categories,
        advanced: cfg.model.advanced,
        model_id: cfg.model.model_id.clone(),
        model_available,
        degraded,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    print_status(&status);
    Ok(())
}

fn print_status(status: &CorpusStatus) {
    println!("{}", "Moneta Status".bold());
    println!("{}", "=".repeat(50));
    println!();
    println!("Corpus:   {}", status.csv_path);
    println!("Entries:  {}", status.entries);

    let embedder = if status.advanced {
        status.model_id.as_str()
    } else {
        "hash-384 (built-in)"
    };
    println!("Embedder: {}", embedder);
    println!();

    if let Some(reason) = &status.degraded {
        println!("{} {}", "!".yellow().bold(), reason.yellow());
        println!(
            "  Predictions fall back to \"General\". Run {} to create a starter corpus.",
            "moneta init".cyan()
        );
        println!();
    } else {
        print_distribution("Category Distribution", &status.categories, status.entries);
    }

    if status.advanced && !status.model_available {
        println!(
            "{} Advanced matching enabled but no model found. Run {}.",
            "!".yellow().bold(),
            "moneta model download".cyan()
        );
        println!();
    }

    println!("{}", "=".repeat(50));
}

fn print_distribution(title: &str, dist: &BTreeMap<String, usize>, total: usize) {
    println!("{}", title.cyan());
    println!("{}", "-".repeat(30));
    for (key, count) in dist {
        let pct = if total > 0 {
            (*count as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        println!("   {:<22} {:>4} ({:.0}%)", key, count, pct);
    }
    println!();
}
