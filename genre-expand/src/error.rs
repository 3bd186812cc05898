use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the encyclopedia or interpreting its answer.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("no page found for '{0}'")]
    NotFound(String),

    /// The title matches several distinct topics.
    #[error("\"{title}\" may refer to:\n{}", .options.join("\n"))]
    Ambiguous { title: String, options: Vec<String> },

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Malformed(&'static str),
}

/// Failure reading or persisting an audio file's tags.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("{}: {source}", .path.display())]
    Lofty {
        path: PathBuf,
        source: lofty::error::LoftyError,
    },

    #[error("{}: no writable tag available", .0.display())]
    NoWritableTag(PathBuf),
}
