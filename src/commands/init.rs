//! Workspace initialization: default config and starter corpus

use anyhow::Result;
use colored::Colorize;
use std::fs;

use crate::config::{self, Config, CONFIG_FILE};

/// Starter labeled corpus, shipped with the crate
const STARTER_CORPUS: &str = include_str!("../../data/transactions.csv");

pub fn run(force: bool) -> Result<()> {
    let root = config::get_app_root();

    println!("{}", "Moneta Initialization".bold());
    println!("{}", "=".repeat(50));
    println!();

    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() && !force {
        println!(
            "{} Config already exists: {}",
            "→".blue(),
            config_path.display()
        );
    } else {
        Config::default().save(&root)?;
        println!("{} Created {}", "✓".green(), config_path.display());
    }

    let cfg = Config::load(&root);
    let corpus_path = root.join(&cfg.knowledge.csv_path);
    if corpus_path.exists() && !force {
        println!(
            "{} Corpus already exists: {}",
            "→".blue(),
            corpus_path.display()
        );
    } else {
        if let Some(parent) = corpus_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
                println!("{} Created directory {}", "✓".green(), parent.display());
            }
        }
        fs::write(&corpus_path, STARTER_CORPUS)?;
        println!("{} Created {}", "✓".green(), corpus_path.display());
    }

    println!();
    println!("Next steps:");
    println!(
        "  {} - classify a statement",
        "moneta analyze \"paid 500 for dinner\"".cyan()
    );
    println!("  {} - start the HTTP API", "moneta serve".cyan());
    println!(
        "  {} - check matcher quality on the corpus",
        "moneta eval".cyan()
    );
    println!();
    println!(
        "{}",
        format!("Edit {} and the corpus CSV to customize.", CONFIG_FILE).dimmed()
    );
    println!();

    Ok(())
}
