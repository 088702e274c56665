//! Error types for clean-article-html.
//!
//! The cleaning pipeline itself is total: any input tree produces an output
//! tree and no error escapes it. Errors only arise at the edges, when the
//! annotation corpus is read from or written to disk.

/// Error type for fallible operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the annotation corpus failed.
    #[error("annotation store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The annotation corpus is not valid JSON.
    #[error("annotation store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, Error>;
