pub mod storage;
pub mod types;

pub use storage::GraphCache;
pub use types::{Link, LinkGraph, LinkGraphError, LinkNode};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("invalid graph id: {0:?}")]
    InvalidGraphId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
