//! Error types for mqratings

/// Rating lookup and parse errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown rating system: {0}")]
    UnknownSystem(String),

    #[error("Unknown rating: {0}")]
    UnknownRating(String),
}

/// Specialized Result type for mqratings
pub type Result<T> = std::result::Result<T, Error>;
