//! Error types for moneta

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Knowledge base error: {0}")]
    Knowledge(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Embedding error: {0}")]
    Embedding(anyhow::Error),

    #[error("Empty input")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, Error>;
