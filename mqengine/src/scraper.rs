//! Trailer discovery backends.
//!
//! A [`TrailerScraper`] turns a backend name (`"iTunes"`, `"kodiDB"`) into
//! a list of candidate trailers. The engine then filters, samples and
//! records them; backends stay oblivious to ratings, genres and the
//! watched ledger.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Quality tokens recognised inside iTunes-style stream URLs.
const QUALITY_TOKENS: [&str; 3] = ["h480p", "h720p", "h1080p"];

/// A trailer as returned by a discovery backend, before any filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedTrailer {
    /// Stable identifier within the backend, keyed by the watched ledger.
    pub id: String,
    pub title: String,
    /// Rating as text, e.g. `"MPAA:PG-13"`. May be empty or unparseable.
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// User agent some backends require for playback.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Stream URL per quality label (`"720p"` -> URL).
    #[serde(default)]
    pub quality_urls: BTreeMap<String, String>,
}

impl ScrapedTrailer {
    /// URL to play at `quality`: the exact entry when the backend lists
    /// one, otherwise any listed URL with its quality token rewritten.
    ///
    /// # Arguments
    /// * `quality` - label such as `"720p"`
    ///
    /// # Returns
    /// `None` when the backend listed no usable URL at all.
    pub fn playable_url(&self, quality: &str) -> Option<String> {
        if let Some(url) = self.quality_urls.get(quality) {
            return Some(url.clone());
        }
        self.quality_urls
            .values()
            .find_map(|url| try_rewrite_quality(url, quality))
    }
}

/// Rewrites the quality token of an iTunes-style URL, e.g.
/// `..._h480p.mov` into `..._h720p.mov`.
///
/// URLs without a known token come back unchanged. Used when replaying
/// ledger rows whose URL was recorded at another quality.
pub fn rewrite_quality(url: &str, quality: &str) -> String {
    try_rewrite_quality(url, quality).unwrap_or_else(|| url.to_string())
}

fn try_rewrite_quality(url: &str, quality: &str) -> Option<String> {
    let replacement = format!("h{quality}");
    QUALITY_TOKENS
        .iter()
        .find(|token| url.contains(*token))
        .map(|token| url.replace(token, &replacement))
}

/// Source of scraped trailers.
pub trait TrailerScraper: Send + Sync {
    /// Current trailer list of the backend named `source`.
    fn trailers(&self, source: &str) -> Vec<ScrapedTrailer>;
}

/// Backend that never finds anything. Stands in where no network or
/// library scraper is wired up.
#[derive(Debug, Default)]
pub struct NullScraper;

impl TrailerScraper for NullScraper {
    fn trailers(&self, source: &str) -> Vec<ScrapedTrailer> {
        debug!("No trailer scraper registered (source {source})");
        Vec::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
