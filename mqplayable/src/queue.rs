//! Files d'images et de vidéos à extension paresseuse
//!
//! L'`ImageQueue` porte un curseur de lecture : l'hôte la parcourt avec
//! `next()`/`prev()` pendant la séance. Quand le curseur atteint la fin,
//! la file demande la suite à son [`SlideFeed`] plutôt que de s'arrêter,
//! tant que le budget de temps n'est pas dépassé.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Image, Song, Video};

/// Capacité fournie à une [`ImageQueue`] par son constructeur :
/// produire la suite du diaporama et consigner ce qui a été vu.
pub trait SlideFeed: Send + Sync {
    /// Prochain lot de diapositives, ou `None` si la source est épuisée.
    ///
    /// La file courante est passée en lecture pour que l'implémentation
    /// puisse éviter de resservir des chemins déjà en file.
    fn next_slides(&self, queue: &ImageQueue) -> Option<Vec<Image>>;

    /// Consigne la fin d'un set comme vue
    fn mark_watched(&self, image: &Image);
}

/// Capacité de marquage fournie à une [`VideoQueue`]
pub trait VideoFeed: Send + Sync {
    fn mark_watched(&self, video: &Video);
}

/// Diaporama ordonné avec curseur, budget de temps et extension paresseuse.
///
/// Invariants :
/// - le curseur vaut `None` (avant le début) ou un index valide
/// - `duration` est la somme des durées des diapositives et ne décroît
///   jamais
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQueue {
    #[serde(rename = "queue")]
    items: Vec<Image>,
    /// Somme des durées des diapositives, en secondes
    pub duration: f64,
    #[serde(skip)]
    cursor: Option<usize>,
    /// Budget de temps du diaporama, en secondes
    pub max_duration: f64,
    /// Effet de transition entre diapositives ("fade", "slideL", ...)
    pub transition: Option<String>,
    #[serde(rename = "transitionDuration")]
    pub transition_duration_ms: u64,
    /// Morceaux à jouer sous le diaporama
    pub music: Vec<Song>,
    /// Volume de la musique, en pourcentage
    pub music_volume: u8,
    pub music_fade_in: f64,
    pub music_fade_out: f64,
    #[serde(skip)]
    feed: Option<Arc<dyn SlideFeed>>,
}

impl ImageQueue {
    /// Crée une file vide avec le budget de temps donné (en secondes)
    pub fn new(max_duration: f64) -> Self {
        Self {
            items: Vec::new(),
            duration: 0.0,
            cursor: None,
            max_duration,
            transition: None,
            transition_duration_ms: 400,
            music: Vec::new(),
            music_volume: 85,
            music_fade_in: 3.0,
            music_fade_out: 3.0,
            feed: None,
        }
    }

    /// Attache la capacité d'extension et de marquage
    pub fn set_feed(&mut self, feed: Arc<dyn SlideFeed>) {
        self.feed = Some(feed);
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Diapositives actuellement en file
    pub fn items(&self) -> &[Image] {
        &self.items
    }

    /// Diapositive sous le curseur (`None` avant le premier `next()`)
    pub fn current(&self) -> Option<&Image> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    pub fn on_first(&self) -> bool {
        self.cursor == Some(0)
    }

    pub fn on_last(&self) -> bool {
        match self.cursor {
            Some(i) => i + 1 >= self.items.len(),
            None => self.items.is_empty(),
        }
    }

    /// Replace le curseur avant le début, sans toucher au contenu
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Un chemin est-il déjà en file ?
    pub fn contains_path(&self, path: &str) -> bool {
        self.items.iter().any(|i| i.path == path)
    }

    /// Ajoute des diapositives en fin de file et crédite leur durée
    pub fn append_all(&mut self, images: Vec<Image>) {
        for image in &images {
            self.duration += image.duration;
        }
        self.items.extend(images);
    }

    /// Avance le curseur et retourne la diapositive suivante.
    ///
    /// # Arguments
    ///
    /// * `started` - Début effectif du diaporama côté hôte ; quand le temps
    ///   écoulé dépasse le budget, la file coupe à la prochaine fin de set
    /// * `extend` - Force l'extension même en dépassement
    ///
    /// # Returns
    ///
    /// `None` quand le diaporama est terminé ou coupé.
    pub fn next(&mut self, started: Option<Instant>, extend: bool) -> Option<&Image> {
        let overtime = started
            .map(|s| s.elapsed().as_secs_f64() >= self.max_duration)
            .unwrap_or(false);

        // En dépassement, on finit le set en cours et on coupe à sa fin
        if overtime && self.current().map_or(false, |img| img.set_number == 0) {
            debug!("ImageQueue: time budget reached on a set boundary");
            return None;
        }

        if self.on_last() {
            if extend || !overtime {
                return self.extend();
            }
            debug!("ImageQueue: time budget reached, not extending");
            return None;
        }

        let idx = self.cursor.map_or(0, |i| i + 1);
        self.cursor = Some(idx);
        self.items.get(idx)
    }

    /// Demande la suite au feed et avance sur la première nouvelle
    /// diapositive
    fn extend(&mut self) -> Option<&Image> {
        debug!("ImageQueue: requesting next slides");
        let feed = self.feed.clone()?;

        let images = match feed.next_slides(self) {
            Some(images) if !images.is_empty() => images,
            _ => {
                debug!("ImageQueue: no next slides");
                return None;
            }
        };

        debug!(count = images.len(), "ImageQueue: slides returned");
        let idx = self.cursor.map_or(0, |i| i + 1);
        self.append_all(images);
        self.cursor = Some(idx);
        self.items.get(idx)
    }

    /// Recule le curseur ; `None` sur la première diapositive
    pub fn prev(&mut self) -> Option<&Image> {
        match self.cursor {
            Some(i) if i >= 1 => {
                self.cursor = Some(i - 1);
                self.items.get(i - 1)
            }
            _ => None,
        }
    }

    /// Consigne une fin de set comme vue (les diapositives intérieures
    /// sont ignorées)
    pub fn mark(&self, image: &Image) {
        if image.set_number != 0 {
            return;
        }
        if let Some(feed) = &self.feed {
            debug!("ImageQueue: marking slide set as watched");
            feed.mark_watched(image);
        }
    }
}

impl fmt::Debug for ImageQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageQueue")
            .field("size", &self.items.len())
            .field("duration", &self.duration)
            .field("max_duration", &self.max_duration)
            .field("cursor", &self.cursor)
            .field("music", &self.music.len())
            .finish()
    }
}

/// File de clips vidéo avec cumul de durée
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQueue {
    #[serde(rename = "queue")]
    items: Vec<Video>,
    /// Somme des durées des clips, en secondes
    pub duration: f64,
    #[serde(skip)]
    feed: Option<Arc<dyn VideoFeed>>,
}

impl VideoQueue {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            duration: 0.0,
            feed: None,
        }
    }

    pub fn set_feed(&mut self, feed: Arc<dyn VideoFeed>) {
        self.feed = Some(feed);
    }

    /// Ajoute un clip et crédite sa durée
    pub fn append(&mut self, video: Video) {
        self.duration += video.duration;
        self.items.push(video);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Video] {
        &self.items
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.items.iter().any(|v| v.path == path)
    }

    /// Consigne un clip comme vu
    pub fn mark(&self, video: &Video) {
        if let Some(feed) = &self.feed {
            debug!("VideoQueue: marking video as watched");
            feed.mark_watched(video);
        }
    }
}

impl Default for VideoQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VideoQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoQueue")
            .field("size", &self.items.len())
            .field("duration", &self.duration)
            .finish()
    }
}
