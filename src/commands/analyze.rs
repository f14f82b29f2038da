//! One-shot analysis of a financial statement

use anyhow::Result;
use colored::Colorize;

use crate::config::{self, Config};
use crate::error::Error;

pub fn run(text: &str, json: bool) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::EmptyInput.into());
    }

    let root = config::get_app_root();
    let cfg = Config::load(&root);
    let loaded = super::build_pipeline(&root, &cfg)?;
    let prediction = loaded.pipeline.predict(text)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    if let Some(reason) = &loaded.degraded {
        println!(
            "{} Knowledge base unavailable ({}); categories fall back to \"General\"",
            "!".yellow().bold(),
            reason
        );
        println!();
    }

    println!("{} {}", "→".dimmed(), prediction.original_text.cyan());
    println!();
    println!("  Intent:   {}", prediction.intent.as_str().bold());
    if let Some(query_type) = prediction.query_type {
        println!("  Query:    {}", query_type.as_str());
    }
    if prediction.amount > 0.0 {
        println!("  Amount:   {:.2}", prediction.amount);
    }
    println!("  Type:     {}", prediction.direction.as_str());
    println!("  Category: {}", prediction.category.green());
    if let Some(alert) = &prediction.alert {
        println!();
        println!("  {} {}", "!".yellow().bold(), alert.yellow());
    }

    Ok(())
}
