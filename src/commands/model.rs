//! Model management commands - Download and manage Model2Vec models

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::{self, Config};
use crate::nlp::embedder::{cached_model_path, Embedder, Model2VecEmbedder};

/// Run model subcommand
pub fn run(subcmd: &str, json: bool) -> Result<()> {
    match subcmd {
        "download" => download(json),
        "status" => status(json),
        _ => {
            if !json {
                println!("{} Unknown subcommand: {}", "!".yellow().bold(), subcmd);
                println!();
                println!("Available subcommands:");
                println!(
                    "  {} - Download Model2Vec model for semantic matching",
                    "download".cyan()
                );
                println!("  {} - Show model status", "status".cyan());
            }
            Ok(())
        }
    }
}

/// Download the Model2Vec model from HuggingFace Hub (or load a local copy)
fn download(json: bool) -> Result<()> {
    let root = config::get_app_root();
    let config = Config::load(&root);
    let model_id = &config.model.model_id;

    if !json {
        println!("{} Downloading model: {}", "→".dimmed(), model_id.cyan());
        println!("  This may take a few minutes on first download...");
        println!();
    }

    let result = match &config.model.model_path {
        Some(path) => Model2VecEmbedder::from_path(Path::new(path)),
        None => Model2VecEmbedder::from_pretrained(model_id),
    };

    match result {
        Ok(embedder) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "model_id": model_id,
                        "dimension": embedder.dimension(),
                    })
                );
            } else {
                println!("{} Model ready!", "✓".green().bold());
                println!();
                println!("  {} Model: {}", "→".dimmed(), model_id);
                println!("  {} Dimension: {}", "→".dimmed(), embedder.dimension());
                println!();
                println!("To enable semantic matching, add to moneta.json:");
                println!();
                println!(r#"  "model": {{"#);
                println!(r#"    "advanced": true"#);
                println!(r#"  }}"#);
            }
            Ok(())
        }
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    })
                );
            } else {
                println!("{} Failed to download model: {}", "✗".red().bold(), e);
            }
            Err(e)
        }
    }
}

/// Show model status
fn status(json: bool) -> Result<()> {
    let root = config::get_app_root();
    let config = Config::load(&root);

    let cached = cached_model_path();
    let available = config.model.model_path.is_some() || cached.is_some();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "advanced": config.model.advanced,
                "model_id": config.model.model_id,
                "model_path": config.model.model_path,
                "cached": cached.as_ref().map(|p| p.display().to_string()),
                "ready": config.model.advanced && available,
            })
        );
        return Ok(());
    }

    println!("{}", "Model Status".bold());
    println!();
    println!(
        "  {} Model ID: {}",
        "→".dimmed(),
        config.model.model_id.cyan()
    );

    let enabled_status = if config.model.advanced {
        "Enabled".green()
    } else {
        "Disabled (using built-in hash embedder)".yellow()
    };
    println!("  {} Semantic matching: {}", "→".dimmed(), enabled_status);

    let available_status = if available {
        "Downloaded".green()
    } else {
        "Not Downloaded".yellow()
    };
    println!("  {} Model: {}", "→".dimmed(), available_status);

    println!();
    if config.model.advanced && available {
        println!(
            "  {} Semantic matching is {}",
            "✓".green().bold(),
            "ready".green().bold()
        );
    } else {
        if !available {
            println!(
                "  {} Run {} to download the model",
                "!".yellow().bold(),
                "moneta model download".cyan()
            );
        }
        if !config.model.advanced {
            println!(
                "  {} Set {} in moneta.json to enable",
                "!".yellow().bold(),
                "model.advanced: true".cyan()
            );
        }
    }

    println!();
    println!(
        "  {} HuggingFace cache: ~/.cache/huggingface/hub/",
        "ℹ".blue()
    );

    Ok(())
}
