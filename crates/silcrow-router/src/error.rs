/// Error types for route compilation, generation and route files
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// `stringify` was asked for a destination no route points to
    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    /// The matcher generated for a pattern was rejected by the regex engine
    #[error("failed to build matcher for pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read route file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse route file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Router(#[from] RouterError),
}
