//! Shared run state threaded through the item handlers.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use mqplayable::Feature;
use mqratings::Rating;
use mqsequence::SettingsProvider;
use mqstore::Store;
use tracing::debug;

use crate::actions::ActionFactory;
use crate::fs::MediaLister;
use crate::scraper::TrailerScraper;

/// Current timestamp in the format of the ledger date columns.
pub(crate) fn now_stamp() -> String {
    Utc::now().to_rfc3339()
}

/// Everything a handler may consult while expanding an item: the
/// collaborators wired in by the host, plus the profile accumulated
/// from the queued features (ratings seen, genres seen).
pub struct RunContext {
    /// Live settings of the hosting application.
    pub settings: Arc<dyn SettingsProvider>,
    /// Content catalog and watched ledgers.
    pub store: Arc<Store>,
    /// Trailer discovery backend.
    pub scraper: Arc<dyn TrailerScraper>,
    /// Filesystem access.
    pub lister: Arc<dyn MediaLister>,
    /// Action execution backend.
    pub actions: Arc<dyn ActionFactory>,
    /// Root of the content tree (`Trailers/`, `Music/`, ...).
    pub content_path: Option<PathBuf>,

    feature_queue: VecDeque<Feature>,
    ratings: HashMap<String, Rating>,
    genres: Vec<String>,
}

impl RunContext {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        store: Arc<Store>,
        scraper: Arc<dyn TrailerScraper>,
        lister: Arc<dyn MediaLister>,
        actions: Arc<dyn ActionFactory>,
        content_path: Option<PathBuf>,
    ) -> Self {
        RunContext {
            settings,
            store,
            scraper,
            lister,
            actions,
            content_path,
            feature_queue: VecDeque::new(),
            ratings: HashMap::new(),
            genres: Vec::new(),
        }
    }

    /// Queues a feature and folds its rating and genres into the run
    /// profile used for trailer filtering.
    pub fn add_feature(&mut self, feature: Feature) {
        if let Some(rating) = &feature.rating {
            self.ratings
                .entry(rating.to_string())
                .or_insert_with(|| rating.clone());
        }
        for genre in &feature.genres {
            if !self.genres.contains(genre) {
                self.genres.push(genre.clone());
            }
        }
        debug!("Feature queued: {}", feature.title);
        self.feature_queue.push_back(feature);
    }

    /// Head of the feature queue, or a neutral placeholder when empty.
    /// Bumper handlers consult it for 3D and audio format decisions.
    pub fn current_feature(&self) -> Feature {
        self.feature_queue
            .front()
            .cloned()
            .unwrap_or_else(Feature::placeholder)
    }

    /// Dequeues up to `count` features in arrival order.
    pub fn take_features(&mut self, count: usize) -> Vec<Feature> {
        let n = count.min(self.feature_queue.len());
        self.feature_queue.drain(..n).collect()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_queue.len()
    }

    pub fn feature_queue_is_empty(&self) -> bool {
        self.feature_queue.is_empty()
    }

    /// Genres accumulated over the queued features, in arrival order.
    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Mildest and most severe rating over the queued features, by
    /// severity ordinal. `None` when no queued feature carried one.
    pub fn ratings_band(&self) -> Option<(Rating, Rating)> {
        let mut values = self.ratings.values();
        let first = values.next()?;
        let mut min = first.clone();
        let mut max = first.clone();
        for rating in values {
            if rating.value < min.value {
                min = rating.clone();
            }
            if rating.value > max.value {
                max = rating.clone();
            }
        }
        Some((min, max))
    }
}

// ============================================================================
// Tests
// ============================================================================
