//! Moneta core library
//!
//! A personal-finance assistant that turns free-text statements like
//! "paid 500 for dinner" into structured transactions: an amount, an
//! income/expense direction, and a semantic category matched against a
//! labeled corpus.
//!
//! - Rule-based intent, amount, and direction parsing
//! - Embedding nearest-neighbor categorization with a confidence threshold
//! - Reconciliation rules for conflicting signals
//! - Degraded "General" mode when the corpus is unavailable
//! - Optional HTTP API (`server` feature)

pub mod commands;
pub mod config;
pub mod error;
pub mod nlp;
#[cfg(feature = "server")]
pub mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use nlp::{Pipeline, Prediction};
