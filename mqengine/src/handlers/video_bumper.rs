//! Video bumper handler: typed bumpers from the catalog, plus literal
//! file and directory sources.

use mqplayable::{PlayableItem, Video};
use mqsequence::{setting_or_default, SequenceItem};
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::context::RunContext;
use crate::error::Result;

/// Typed bumper kinds served from the catalog.
const CATALOG_KINDS: [&str; 14] = [
    "3D.intro",
    "3D.outro",
    "countdown",
    "courtesy",
    "feature.intro",
    "feature.outro",
    "intermission",
    "short.film",
    "theater.intro",
    "theater.outro",
    "trailers.intro",
    "trailers.outro",
    "trivia.intro",
    "trivia.outro",
];

pub(super) fn handle(ctx: &mut RunContext, item: &SequenceItem) -> Result<Vec<PlayableItem>> {
    let settings = ctx.settings.clone();
    let vtype = item.live_str("vtype", settings.as_ref(), "");

    let videos = match vtype.as_str() {
        "file" => {
            let path = item.live_str("file", settings.as_ref(), "");
            if path.is_empty() {
                Vec::new()
            } else {
                vec![Video::new(&path)]
            }
        }
        "dir" => from_directory(ctx, item),
        kind if CATALOG_KINDS.contains(&kind) => {
            // The 3D slots only play for a 3D feature
            if kind.starts_with("3D.") && !ctx.current_feature().is_3d {
                debug!("    feature is not 3D");
                Vec::new()
            } else {
                from_catalog(ctx, item, kind)?
            }
        }
        other => {
            warn!("Unknown video bumper type: {other}");
            Vec::new()
        }
    };

    if videos.is_empty() {
        debug!("    {vtype}: nothing to show");
    }
    Ok(videos.into_iter().map(PlayableItem::from).collect())
}

/// Random catalog bumper of `kind` in the feature's dimension, with
/// the global 2D fallback. The non-random mode plays the item's
/// literal source path instead.
fn from_catalog(ctx: &RunContext, item: &SequenceItem, kind: &str) -> Result<Vec<Video>> {
    let settings = ctx.settings.clone();

    if !item.live_bool("random", settings.as_ref(), true) {
        let source = item.live_str("source", settings.as_ref(), "");
        if source.is_empty() {
            debug!("    empty path");
            return Ok(Vec::new());
        }
        return Ok(vec![Video::new(&source)]);
    }

    let is_3d = ctx.current_feature().is_3d && item.live_bool("play3D", settings.as_ref(), true);

    let bumpers = ctx.store.video_bumpers(kind, Some(is_3d))?;
    if let Some(bumper) = bumpers.choose(&mut rand::rng()) {
        return Ok(vec![Video::new(&bumper.path)]);
    }

    let fallback_2d = setting_or_default(settings.as_ref(), "bumper.fallback2D")
        .map(|v| v.as_bool(false))
        .unwrap_or(false);
    if is_3d && fallback_2d {
        debug!("    falling back to a 2D bumper");
        let bumpers = ctx.store.video_bumpers(kind, None)?;
        if let Some(bumper) = bumpers.choose(&mut rand::rng()) {
            return Ok(vec![Video::new(&bumper.path)]);
        }
    }
    Ok(Vec::new())
}

/// First (or random) files of the item's directory.
fn from_directory(ctx: &RunContext, item: &SequenceItem) -> Vec<Video> {
    let settings = ctx.settings.clone();
    let dir = item.live_str("dir", settings.as_ref(), "");
    if dir.is_empty() {
        return Vec::new();
    }

    let count = item.live_int("count", settings.as_ref(), 1).max(0) as usize;
    let files = ctx.lister.list_dir(&dir);
    if item.live_bool("random", settings.as_ref(), true) {
        files
            .choose_multiple(&mut rand::rng(), count)
            .map(Video::new)
            .collect()
    } else {
        files.iter().take(count).map(Video::new).collect()
    }
}
