//! Unité de lecture telle que vue par l'hôte
//!
//! La timeline compilée est une suite de [`PlayableItem`]. Le variant
//! porte la discipline de lecture : un `Image` s'affiche pendant sa
//! durée, un `Images` se parcourt avec son propre curseur, `End` clôt
//! la séance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Action, Image, ImageQueue, Song, Video, VideoQueue};

/// Unité de la timeline compilée
///
/// Sérialisé avec un champ discriminant `type`, ce qui donne des
/// événements auto-descriptifs côté hôte :
///
/// ```json
/// {"type": "VIDEO", "path": "/bumpers/intro.mp4", ...}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayableItem {
    #[serde(rename = "IMAGE")]
    Image(Image),
    #[serde(rename = "VIDEO")]
    Video(Video),
    #[serde(rename = "SONG")]
    Song(Song),
    #[serde(rename = "ACTION")]
    Action(Action),
    #[serde(rename = "IMAGE.QUEUE")]
    Images(ImageQueue),
    #[serde(rename = "VIDEO.QUEUE")]
    Videos(VideoQueue),
    #[serde(rename = "END")]
    End,
}

impl PlayableItem {
    /// La sentinelle de fin de séance ?
    pub fn is_end(&self) -> bool {
        matches!(self, PlayableItem::End)
    }

    /// Chemin du média pour les unités simples (`None` pour les files
    /// et la sentinelle)
    pub fn path(&self) -> Option<&str> {
        match self {
            PlayableItem::Image(i) => Some(&i.path),
            PlayableItem::Video(v) => Some(&v.path),
            PlayableItem::Song(s) => Some(&s.path),
            PlayableItem::Action(a) => Some(&a.path),
            _ => None,
        }
    }
}

impl fmt::Display for PlayableItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayableItem::Image(i) => write!(f, "{i}"),
            PlayableItem::Video(v) => write!(f, "{v}"),
            PlayableItem::Song(s) => write!(f, "SONG ({}s): {}", s.duration, s.path),
            PlayableItem::Action(a) => write!(f, "ACTION: {}", a.path),
            PlayableItem::Images(q) => {
                write!(f, "IMAGE.QUEUE ({} slides, {}s)", q.size(), q.duration)
            }
            PlayableItem::Videos(q) => {
                write!(f, "VIDEO.QUEUE ({} videos, {}s)", q.len(), q.duration)
            }
            PlayableItem::End => write!(f, "END"),
        }
    }
}

impl From<Image> for PlayableItem {
    fn from(image: Image) -> Self {
        PlayableItem::Image(image)
    }
}

impl From<Video> for PlayableItem {
    fn from(video: Video) -> Self {
        PlayableItem::Video(video)
    }
}

impl From<Song> for PlayableItem {
    fn from(song: Song) -> Self {
        PlayableItem::Song(song)
    }
}

impl From<Action> for PlayableItem {
    fn from(action: Action) -> Self {
        PlayableItem::Action(action)
    }
}

impl From<ImageQueue> for PlayableItem {
    fn from(queue: ImageQueue) -> Self {
        PlayableItem::Images(queue)
    }
}

impl From<VideoQueue> for PlayableItem {
    fn from(queue: VideoQueue) -> Self {
        PlayableItem::Videos(queue)
    }
}
