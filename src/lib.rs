use thiserror::Error;

use crate::client::ServiceError;
use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, CacheError>;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to create index '{index}': {source}")]
    Initialization {
        index: String,
        #[source]
        source: ServiceError,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod cache;
pub mod client;
pub mod commands;
pub mod config;

pub use cache::{CacheEntry, SemanticCache, select_best_match};
pub use client::{MarqoClient, SearchHit, VectorSearch};
