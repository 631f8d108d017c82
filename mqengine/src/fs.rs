//! Accès disque aux répertoires de contenu.
//!
//! Le moteur ne touche jamais le système de fichiers directement : tout
//! passe par [`MediaLister`], ce qui permet aux tests de brancher un
//! double en mémoire.

use std::fs;

use lofty::{config::ParseOptions, prelude::*, probe::Probe};
use tracing::warn;

/// Listage et sondage des fichiers média.
pub trait MediaLister: Send + Sync {
    /// Fichiers situés directement sous `path`, en chemins complets.
    /// Un répertoire absent ou illisible donne une liste vide.
    fn list_dir(&self, path: &str) -> Vec<String>;

    /// Durée du fichier audio `path`, en secondes, si elle est lisible.
    fn probe_duration(&self, path: &str) -> Option<f64>;
}

/// [`MediaLister`] sur le vrai système de fichiers. Les durées sont
/// lues dans les en-têtes audio via lofty.
#[derive(Debug, Default)]
pub struct FsMediaLister;

impl MediaLister for FsMediaLister {
    fn list_dir(&self, path: &str) -> Vec<String> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Impossible de lister {path}: {e}");
                return Vec::new();
            }
        };

        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file())
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        files.sort();
        files
    }

    fn probe_duration(&self, path: &str) -> Option<f64> {
        let probed = Probe::open(path).and_then(|probe| probe.options(ParseOptions::new()).read());
        match probed {
            Ok(tagged) => Some(tagged.properties().duration().as_secs_f64()),
            Err(e) => {
                warn!("Impossible de lire la durée de {path}: {e}");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_list_dir_returns_sorted_files_only() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("b.mp4")).unwrap();
        File::create(dir.path().join("a.mp4")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let lister = FsMediaLister;
        let files = lister.list_dir(&dir.path().to_string_lossy());

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.mp4"));
        assert!(files[1].ends_with("b.mp4"));
    }

    #[test]
    fn test_list_dir_missing_directory_is_empty() {
        let lister = FsMediaLister;
        assert!(lister.list_dir("/nonexistent/marquee/dir").is_empty());
    }

    #[test]
    fn test_probe_duration_rejects_non_audio() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("not_audio.bin");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"definitely not audio data").unwrap();

        let lister = FsMediaLister;
        assert_eq!(lister.probe_duration(&path.to_string_lossy()), None);
    }
}
