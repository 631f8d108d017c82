//! Types d'erreurs pour mqstore

/// Erreurs de la base de données
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to create database directory: {0}")]
    CreateDir(#[from] std::io::Error),
}

/// Type Result spécialisé pour mqstore
pub type Result<T> = std::result::Result<T, Error>;
