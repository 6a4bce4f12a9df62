use thiserror::Error;

/// Errors surfaced by the I/O-facing parts of the crate (loading pages,
/// reading task configs, persisting snapshots). Heuristics and selector
/// synthesis never fail; they degrade instead.
#[derive(Debug, Error)]
pub enum FormscoutError {
    /// Reading or writing a local file failed
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Fetching a page over HTTP failed
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// JSON (de)serialization failed
    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A selector did not resolve to any element
    #[error("element '{selector}' not found: {context}")]
    ElementNotFound { selector: String, context: String },

    /// Neither a file nor a URL was given where a page was expected
    #[error("missing input: {0}")]
    MissingInput(String),
}

impl FormscoutError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        FormscoutError::Io { context: context.into(), source }
    }

    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        FormscoutError::Json { context: context.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, FormscoutError>;
