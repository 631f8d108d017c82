//! Trailer handler: scraper backends, content directories and the
//! watched-ledger rotation.

use mqplayable::{PlayableItem, Video};
use mqratings::Rating;
use mqsequence::{setting_or_default, SequenceItem};
use mqstore::{WatchedTrailer, BROKEN_URL};
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::context::{now_stamp, RunContext};
use crate::error::Result;
use crate::scraper::{rewrite_quality, ScrapedTrailer};

pub(super) fn handle(ctx: &mut RunContext, item: &SequenceItem) -> Result<Vec<PlayableItem>> {
    let settings = ctx.settings.clone();
    let count = item.live_int("count", settings.as_ref(), 1).max(0) as usize;
    let source = item.live_str("source", settings.as_ref(), "content");

    let trailers = match source.as_str() {
        "file" => {
            let path = item.live_str("file", settings.as_ref(), "");
            if path.is_empty() {
                Vec::new()
            } else {
                debug!("    file: {path}");
                vec![Video::new(&path)]
            }
        }
        "dir" | "content" => from_directory(ctx, item, &source, count),
        "itunes" => from_scraper(ctx, item, "iTunes", count)?,
        "kodidb" => from_scraper(ctx, item, "kodiDB", count)?,
        other => {
            warn!("Unknown trailer source: {other}");
            Vec::new()
        }
    };

    if trailers.is_empty() {
        debug!("    {source}: nothing to show");
    }
    Ok(trailers.into_iter().map(PlayableItem::from).collect())
}

/// Random picks from a directory of trailer files. The `content`
/// source reads the `Trailers` folder of the content tree.
fn from_directory(ctx: &RunContext, item: &SequenceItem, source: &str, count: usize) -> Vec<Video> {
    let settings = ctx.settings.clone();
    let path = if source == "content" {
        match &ctx.content_path {
            Some(root) => root.join("Trailers").to_string_lossy().into_owned(),
            None => {
                debug!("    no content path configured");
                return Vec::new();
            }
        }
    } else {
        item.live_str("dir", settings.as_ref(), "")
    };
    if path.is_empty() {
        debug!("    empty path");
        return Vec::new();
    }

    let files = ctx.lister.list_dir(&path);
    files
        .choose_multiple(&mut rand::rng(), count)
        .map(Video::new)
        .collect()
}

/// Fetches from a scraper backend, filters, samples `count`, records
/// every pick in the watched ledger, and falls back to the oldest
/// ledger rows when nothing new is playable.
fn from_scraper(
    ctx: &RunContext,
    item: &SequenceItem,
    source: &str,
    count: usize,
) -> Result<Vec<Video>> {
    let settings = ctx.settings.clone();
    debug!("    {source} x {count}");

    let mut trailers = filter_scraped(ctx, item, ctx.scraper.trailers(source));

    let play_unwatched = setting_or_default(settings.as_ref(), "trailer.playUnwatched")
        .map(|v| v.as_bool(true))
        .unwrap_or(true);
    if play_unwatched {
        debug!("    filtering out watched");
        let mut unwatched = Vec::with_capacity(trailers.len());
        for trailer in trailers {
            if !ctx.store.trailer_is_watched(&trailer.id)? {
                unwatched.push(trailer);
            }
        }
        trailers = unwatched;
    }

    if trailers.is_empty() {
        return oldest(ctx, item, source, count);
    }

    if trailers.len() > count {
        trailers = trailers
            .choose_multiple(&mut rand::rng(), count)
            .cloned()
            .collect();
    }

    let quality = item.live_str("quality", settings.as_ref(), "720p");
    let now = now_stamp();
    let mut valid = Vec::new();

    for trailer in &trailers {
        let url = trailer.playable_url(&quality);
        ctx.store.record_trailer(&WatchedTrailer {
            wid: trailer.id.clone(),
            source: source.to_string(),
            watched: true,
            date: Some(now.clone()),
            title: trailer.title.clone(),
            url: url.clone().unwrap_or_else(|| BROKEN_URL.to_string()),
            user_agent: trailer.user_agent.clone(),
            rating: (!trailer.rating.is_empty()).then(|| trailer.rating.clone()),
            genres: Some(trailer.genres.join(",")),
        })?;
        if let Some(url) = url {
            let mut video = Video::new(&url);
            video.user_agent = trailer.user_agent.clone();
            valid.push(video);
        }
    }

    if valid.is_empty() {
        return oldest(ctx, item, source, count);
    }
    Ok(valid)
}

/// Applies the item's rating and genre limits to scraped trailers.
/// When a rating band is active, trailers whose rating cannot be
/// parsed are dropped.
fn filter_scraped(
    ctx: &RunContext,
    item: &SequenceItem,
    trailers: Vec<ScrapedTrailer>,
) -> Vec<ScrapedTrailer> {
    let settings = ctx.settings.clone();
    let mut filtered = trailers;

    if let Some((lo, hi)) = rating_band(ctx, item, 0) {
        debug!("    limiting to rating ordinals {lo}..={hi}");
        filtered.retain(|t| match Rating::parse(&t.rating) {
            Ok(rating) => lo <= rating.value && rating.value <= hi,
            Err(_) => false,
        });
    }

    if item.live_bool("limitGenre", settings.as_ref(), true) && !ctx.genres().is_empty() {
        debug!("    filtering by genres");
        filtered.retain(|t| t.genres.iter().any(|g| ctx.genres().contains(g)));
    }

    filtered
}

/// Inclusive severity band selected by the item's rating limit mode,
/// or `None` when rating filtering is off or unbound for this run.
///
/// `floor` is the lower bound applied in `max` mode.
fn rating_band(ctx: &RunContext, item: &SequenceItem, floor: u32) -> Option<(u32, u32)> {
    let settings = ctx.settings.clone();
    let method = item.live_str("ratingLimit", settings.as_ref(), "none");
    match method.as_str() {
        "" | "none" => None,
        "max" => {
            // Settings spell ratings "MPAA.PG-13"
            let text = item
                .live_str("ratingMax", settings.as_ref(), "MPAA.PG-13")
                .replacen('.', ":", 1);
            match Rating::parse(&text) {
                Ok(max) => Some((floor, max.value)),
                Err(e) => {
                    warn!("Unusable rating limit {text}: {e}");
                    None
                }
            }
        }
        _ => ctx
            .ratings_band()
            .map(|(min, max)| (min.value, max.value)),
    }
}

/// Replays the oldest ledger rows for this source once everything
/// current has been watched. Picks are re-stamped so the rotation
/// moves on next time.
fn oldest(ctx: &RunContext, item: &SequenceItem, source: &str, count: usize) -> Result<Vec<Video>> {
    debug!("    all trailers watched, replaying the oldest");
    let settings = ctx.settings.clone();

    let floor = Rating::parse("MPAA:G").map(|r| r.value).unwrap_or(0);
    let band = rating_band(ctx, item, floor);

    let mut rows = ctx.store.oldest_trailers(Some(source))?;
    if let Some((lo, hi)) = band {
        rows.retain(|row| {
            row.rating
                .as_deref()
                .and_then(|text| Rating::parse(text).ok())
                .map(|rating| lo <= rating.value && rating.value <= hi)
                .unwrap_or(false)
        });
    }

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    if item.live_bool("limitGenre", settings.as_ref(), true) && !ctx.genres().is_empty() {
        rows.retain(|row| row.genre_list().iter().any(|g| ctx.genres().contains(g)));
    }

    // Sample inside a small window of the oldest so replays stay varied
    let picks: Vec<WatchedTrailer> = if rows.len() > count {
        let window = &rows[..rows.len().min(count + 5)];
        window
            .choose_multiple(&mut rand::rng(), count)
            .cloned()
            .collect()
    } else {
        rows
    };

    let quality = item.live_str("quality", settings.as_ref(), "720p");
    let now = now_stamp();
    let mut videos = Vec::with_capacity(picks.len());
    for row in &picks {
        ctx.store.restamp_trailer(&row.wid, &now)?;
        let mut video = Video::new(rewrite_quality(&row.url, &quality));
        video.user_agent = row.user_agent.clone();
        videos.push(video);
    }
    Ok(videos)
}
