//! # mqstore - Catalogue de contenus et historique de visionnage (SQLite)
//!
//! Cette crate fournit la base de données du moteur de pré-séance :
//! - Catalogues de contenus : questions de trivia, bumpers de classification,
//!   bumpers vidéo, bumpers de format audio, morceaux de musique
//! - Registres de visionnage (« ledgers ») : bandes-annonces et trivia déjà
//!   vus, horodatés en RFC 3339 pour une rotation au plus ancien d'abord
//! - Ordres de tirage : aléatoire (`ORDER BY RANDOM()`) ou chronologique
//!   (`ORDER BY date ASC`)
//!
//! # Architecture
//!
//! - **Store** : connexion SQLite unique derrière un `Mutex`, tables créées
//!   à l'ouverture (`CREATE TABLE IF NOT EXISTS`)
//! - Les lignes manquantes sont des `Ok(None)` / vecteurs vides, jamais des
//!   erreurs
//!
//! # Exemple
//!
//! ```no_run
//! use mqstore::Store;
//!
//! # fn main() -> mqstore::Result<()> {
//! let store = Store::open(std::path::Path::new("marquee.db"))?;
//! store.mark_trivia_watched("slide-042", "2025-06-01T20:00:00Z")?;
//! assert!(store.trivia_is_watched("slide-042")?);
//! # Ok(())
//! # }
//! ```

mod error;
mod rows;
mod store;

#[cfg(feature = "mqconfig")]
mod config_ext;

// Réexports publics
pub use error::{Error, Result};
pub use rows::{
    AudioFormatBumper, RatingBumper, SongRow, TriviaEntry, VideoBumper, WatchedTrailer,
    WatchedTrivia, BROKEN_URL,
};
pub use store::Store;

#[cfg(feature = "mqconfig")]
pub use config_ext::StoreConfigExt;
