//! Extension de mqconfig pour le moteur

use std::path::PathBuf;

/// Trait d'extension pour mqconfig::Config
pub trait EngineConfigExt {
    /// Retourne la racine du contenu (Trailers/, Music/, ...) si elle
    /// est configurée
    fn content_path(&self) -> Option<PathBuf>;
}

impl EngineConfigExt for mqconfig::Config {
    fn content_path(&self) -> Option<PathBuf> {
        let value = self.get_value(&["content", "path"]).ok()?;
        let path = value.as_str()?.trim().to_string();
        if path.is_empty() {
            None
        } else {
            Some(PathBuf::from(path))
        }
    }
}
