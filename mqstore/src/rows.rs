//! Types de lignes du catalogue et des registres de visionnage

use serde::{Deserialize, Serialize};

/// Valeur littérale stockée dans `url` quand la résolution d'une URL jouable
/// a échoué. Les lignes BROKEN sont exclues de la rotation au plus ancien.
pub const BROKEN_URL: &str = "BROKEN";

/// Ligne du registre des bandes-annonces vues
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedTrailer {
    /// Identifiant de la bande-annonce chez sa source
    pub wid: String,
    /// Nom de la source ("iTunes", "kodiDB", ...)
    pub source: String,
    /// Déjà servie dans une séance
    pub watched: bool,
    /// Date du dernier service (RFC 3339)
    pub date: Option<String>,
    pub title: String,
    /// URL jouable résolue, ou [`BROKEN_URL`]
    pub url: String,
    pub user_agent: Option<String>,
    /// Classification au format "SYSTEM:NAME"
    pub rating: Option<String>,
    /// Genres séparés par des virgules
    pub genres: Option<String>,
}

impl WatchedTrailer {
    /// Genres sous forme de liste (champ stocké séparé par des virgules)
    pub fn genre_list(&self) -> Vec<String> {
        self.genres
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter(|g| !g.is_empty())
            .map(|g| g.to_string())
            .collect()
    }

    /// La résolution d'URL avait échoué pour cette ligne
    pub fn is_broken(&self) -> bool {
        self.url == BROKEN_URL
    }
}

/// Ligne du registre des trivia vus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedTrivia {
    /// Identifiant du trivia (tid du catalogue)
    pub wid: String,
    pub watched: bool,
    /// Date du dernier service (RFC 3339)
    pub date: Option<String>,
}

/// Entrée du catalogue de trivia (diaporama ou vidéo)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaEntry {
    /// Identifiant unique dans le catalogue
    pub tid: String,
    /// "slide" ou "video"
    pub kind: String,
    pub name: Option<String>,
    /// Classification éventuelle au format "SYSTEM:NAME"
    pub rating: Option<String>,
    /// Image de question (diaporamas)
    pub question_path: Option<String>,
    /// Jusqu'à 10 images d'indices, de la plus proche de la question (0) à la
    /// plus proche de la réponse (9)
    pub clue_paths: [Option<String>; 10],
    /// Image de réponse (diaporamas) ou fichier vidéo (kind = "video")
    pub answer_path: Option<String>,
    /// Durée en secondes (vidéos uniquement)
    pub duration: f64,
}

impl TriviaEntry {
    /// Indices non vides, dans l'ordre 0..9
    pub fn clues(&self) -> impl Iterator<Item = &str> {
        self.clue_paths
            .iter()
            .filter_map(|c| c.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Bumper de classification (carton "Rated R", etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingBumper {
    pub id: i64,
    /// Système de classification ("MPAA", ...)
    pub system: String,
    /// Nom de la classification ("PG-13", ...)
    pub name: String,
    pub is_3d: bool,
    /// Image fixe plutôt que vidéo
    pub is_image: bool,
    /// Style visuel optionnel ("Classic", ...)
    pub style: Option<String>,
    pub path: String,
}

/// Bumper vidéo typé (countdown, theater.intro, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoBumper {
    pub id: i64,
    /// Étiquette du type de bumper ("countdown", "trivia.intro", ...)
    pub kind: String,
    pub is_3d: bool,
    pub path: String,
}

/// Bumper de format audio (carton Dolby Atmos, DTS:X, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFormatBumper {
    pub id: i64,
    /// Format audio annoncé ("Dolby Atmos", ...)
    pub format: String,
    pub is_3d: bool,
    pub path: String,
}

/// Morceau du fonds musical des diaporamas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongRow {
    pub id: i64,
    pub path: String,
    /// Durée en secondes (0 si la lecture des métadonnées a échoué)
    pub duration: f64,
}
