//! Types d'erreurs pour mqengine

/// Erreurs du moteur de séquence
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(#[from] mqstore::Error),

    #[error("Sequence error: {0}")]
    Sequence(#[from] mqsequence::Error),
}

/// Type Result spécialisé pour mqengine
pub type Result<T> = std::result::Result<T, Error>;
