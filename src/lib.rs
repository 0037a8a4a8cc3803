//! # Chemseed - chemistry lab knowledge base loader
//!
//! Builds the SQLite database consumed by the lab application.
//!
//! Chemseed provides:
//! - A normalized schema: substances, reactions and two junction tables
//!   carrying stoichiometric coefficients
//! - A declarative, embedded dataset of substances and reactions
//! - A two-pass loader that resolves formulas to substance ids
//! - A rebuild entry point that replaces any prior database file

pub mod substance;
pub mod reaction;
pub mod dataset;
pub mod storage;
pub mod loader;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use substance::{Substance, PhysicalState, DisplayColor};
pub use reaction::{Reaction, Participant, Side};
pub use dataset::Dataset;
pub use storage::{SeedStore, DbStats};
pub use loader::{seed_database, Loader, MissPolicy, SeedOptions, SeedReport};

/// Result type alias for Chemseed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Chemseed operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset parse error: {0}")]
    DatasetParse(#[from] toml::de::Error),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Unknown miss policy: {0} (expected skip, warn or fail)")]
    UnknownPolicy(String),

    #[error("Unresolved formula '{formula}' in reaction '{equation}'")]
    UnresolvedFormula { equation: String, formula: String },
}
