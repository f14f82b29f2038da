//! Stratified cross-validation of the category matcher
//!
//! Splits the labeled corpus into k folds (per-category round-robin, so the
//! split is deterministic), scores each held-out row against the remaining
//! rows, and reports accuracy plus per-category precision/recall/F1.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::config::{self, Config};
use crate::nlp::embedder::{cosine_similarity, create_embedder};
use crate::nlp::knowledge;
use crate::nlp::matcher::UNCATEGORIZED;

#[derive(Serialize)]
struct EvalReport {
    folds: usize,
    samples: usize,
    fold_accuracy: Vec<f64>,
    accuracy: f64,
    macro_f1: f64,
    per_category: Vec<CategoryReport>,
}

#[derive(Serialize)]
struct CategoryReport {
    category: String,
    support: usize,
    precision: f64,
    recall: f64,
    f1: f64,
}

pub fn run(folds: usize, json: bool) -> Result<()> {
    if folds < 2 {
        anyhow::bail!("need at least 2 folds");
    }

    let root = config::get_app_root();
    let cfg = Config::load(&root);
    let csv_path = root.join(&cfg.knowledge.csv_path);

    let rows = knowledge::read_rows(&csv_path)?;
    if rows.len() < folds {
        anyhow::bail!(
            "corpus has {} rows, fewer than {} folds",
            rows.len(),
            folds
        );
    }

    let embedder = create_embedder(&super::embedder_config(&cfg))?;
    let texts: Vec<&str> = rows.iter().map(|(text, _)| text.as_str()).collect();
    let embeddings = embedder.embed_batch(&texts)?;

    let assignments = assign_folds(&rows, folds);

    let mut fold_accuracy = Vec::with_capacity(folds);
    let mut correct_total = 0usize;
    // tp/fp/fn per category, over all folds
    let mut tp: BTreeMap<String, usize> = BTreeMap::new();
    let mut fp: BTreeMap<String, usize> = BTreeMap::new();
    let mut fn_: BTreeMap<String, usize> = BTreeMap::new();
    let mut support: BTreeMap<String, usize> = BTreeMap::new();

    for fold in 0..folds {
        let mut correct = 0usize;
        let mut tested = 0usize;

        for (i, (_, truth)) in rows.iter().enumerate() {
            if assignments[i] != fold {
                continue;
            }
            tested += 1;
            *support.entry(truth.clone()).or_insert(0) += 1;

            let predicted = nearest_category(
                &embeddings[i],
                &rows,
                &embeddings,
                &assignments,
                fold,
                cfg.matcher.min_score,
            );

            if predicted == *truth {
                correct += 1;
                *tp.entry(truth.clone()).or_insert(0) += 1;
            } else {
                *fp.entry(predicted).or_insert(0) += 1;
                *fn_.entry(truth.clone()).or_insert(0) += 1;
            }
        }

        correct_total += correct;
        let accuracy = correct as f64 / tested.max(1) as f64;
        fold_accuracy.push(accuracy);

        if !json {
            println!(
                "{} Fold {}: accuracy {:.4} ({}/{})",
                "→".dimmed(),
                fold + 1,
                accuracy,
                correct,
                tested
            );
        }
    }

    let labels: BTreeSet<&String> = rows.iter().map(|(_, category)| category).collect();
    let mut per_category = Vec::new();
    let mut f1_sum = 0.0;
    for label in &labels {
        let tp_count = tp.get(*label).copied().unwrap_or(0) as f64;
        let fp_count = fp.get(*label).copied().unwrap_or(0) as f64;
        let fn_count = fn_.get(*label).copied().unwrap_or(0) as f64;

        let precision = safe_ratio(tp_count, tp_count + fp_count);
        let recall = safe_ratio(tp_count, tp_count + fn_count);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        f1_sum += f1;

        per_category.push(CategoryReport {
            category: (*label).clone(),
            support: support.get(*label).copied().unwrap_or(0),
            precision,
            recall,
            f1,
        });
    }

    let report = EvalReport {
        folds,
        samples: rows.len(),
        fold_accuracy,
        accuracy: correct_total as f64 / rows.len() as f64,
        macro_f1: f1_sum / labels.len().max(1) as f64,
        per_category,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

/// Deterministic stratified fold assignment: rows of each category are dealt
/// round-robin across folds.
fn assign_folds(rows: &[(String, String)], folds: usize) -> Vec<usize> {
    let mut per_category: HashMap<&str, usize> = HashMap::new();
    rows.iter()
        .map(|(_, category)| {
            let counter = per_category.entry(category.as_str()).or_insert(0);
            let fold = *counter % folds;
            *counter += 1;
            fold
        })
        .collect()
}

/// Nearest-neighbor category among rows outside the held-out fold.
fn nearest_category(
    input: &[f32],
    rows: &[(String, String)],
    embeddings: &[Vec<f32>],
    assignments: &[usize],
    held_out: usize,
    min_score: f32,
) -> String {
    let mut best_score = f32::NEG_INFINITY;
    let mut best_category: Option<&str> = None;

    for (j, (_, category)) in rows.iter().enumerate() {
        if assignments[j] == held_out {
            continue;
        }
        let score = cosine_similarity(input, &embeddings[j]);
        if score > best_score {
            best_score = score;
            best_category = Some(category);
        }
    }

    match best_category {
        Some(category) if best_score >= min_score => category.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn print_report(report: &EvalReport) {
    println!();
    println!("{}", "Cross-Validation Report".bold());
    println!("{}", "=".repeat(50));
    println!();
    println!("Samples:  {}", report.samples);
    println!("Folds:    {}", report.folds);
    println!("Accuracy: {:.4}", report.accuracy);
    println!("Macro F1: {:.4}", report.macro_f1);
    println!();
    println!("{}", "Per-Category".cyan());
    println!("{}", "-".repeat(50));
    for entry in &report.per_category {
        println!(
            "   {:<22} n={:<4} P={:.2} R={:.2} F1={:.2}",
            entry.category, entry.support, entry.precision, entry.recall, entry.f1
        );
    }
    println!();
    println!("{}", "=".repeat(50));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_folds_is_stratified() {
        let rows: Vec<(String, String)> = vec![
            ("a1", "A"),
            ("a2", "A"),
            ("a3", "A"),
            ("b1", "B"),
            ("b2", "B"),
            ("b3", "B"),
        ]
        .into_iter()
        .map(|(t, c)| (t.to_string(), c.to_string()))
        .collect();

        let assignments = assign_folds(&rows, 3);
        // Each category is dealt across all three folds.
        assert_eq!(&assignments[..3], &[0, 1, 2]);
        assert_eq!(&assignments[3..], &[0, 1, 2]);
    }

    #[test]
    fn test_assign_folds_deterministic() {
        let rows: Vec<(String, String)> = (0..10)
            .map(|i| (format!("t{}", i), "C".to_string()))
            .collect();
        assert_eq!(assign_folds(&rows, 4), assign_folds(&rows, 4));
    }

    #[test]
    fn test_nearest_category_threshold() {
        let rows = vec![("x".to_string(), "A".to_string())];
        let embeddings = vec![vec![1.0, 0.0]];
        let assignments = vec![1];

        // Orthogonal input scores 0.0, below any positive threshold.
        let predicted = nearest_category(&[0.0, 1.0], &rows, &embeddings, &assignments, 0, 0.25);
        assert_eq!(predicted, UNCATEGORIZED);

        let predicted = nearest_category(&[1.0, 0.0], &rows, &embeddings, &assignments, 0, 0.25);
        assert_eq!(predicted, "A");
    }
}
