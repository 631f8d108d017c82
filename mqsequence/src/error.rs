use thiserror::Error;

/// Errors raised while loading or saving sequence templates.
///
/// A malformed template is the one fatal condition of the whole
/// pipeline: everything downstream degrades gracefully, but a template
/// that does not parse cannot be processed at all.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed sequence template: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Cannot read sequence template: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
