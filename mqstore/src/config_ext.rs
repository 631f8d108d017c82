//! Extension de mqconfig pour la base de données

use std::path::PathBuf;

/// Trait d'extension pour mqconfig::Config
pub trait StoreConfigExt {
    /// Retourne le chemin du fichier SQLite du moteur
    fn store_db_path(&self) -> PathBuf;
}

impl StoreConfigExt for mqconfig::Config {
    fn store_db_path(&self) -> PathBuf {
        // Utilise get_managed_dir pour créer le répertoire data s'il n'existe pas
        let data_dir = self
            .get_managed_dir(&["store", "directory"], "data")
            .expect("Failed to get or create data directory");

        PathBuf::from(data_dir).join("marquee.db")
    }
}
