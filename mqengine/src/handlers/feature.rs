//! Feature handler: a rating bumper, then the feature itself.

use mqplayable::{Feature, Image, PlayableItem, Video};
use mqsequence::SequenceItem;
use mqstore::RatingBumper;
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::context::RunContext;
use crate::error::Result;

/// Duration of an image rating bumper, in seconds.
const RATING_IMAGE_SECONDS: f64 = 10.0;
/// Fade applied to an image rating bumper, in milliseconds.
const RATING_IMAGE_FADE_MS: u32 = 3000;

pub(super) fn handle(ctx: &mut RunContext, item: &SequenceItem) -> Result<Vec<PlayableItem>> {
    let settings = ctx.settings.clone();
    let count = item.live_int("count", settings.as_ref(), 1).max(0) as usize;
    let features = ctx.take_features(count);
    debug!(
        "    showing {} of {} requested feature(s)",
        features.len(),
        count
    );

    let media = item.live_str("ratingBumper", settings.as_ref(), "video");
    let mut playables = Vec::new();
    for feature in features {
        let mut found = false;
        if media == "video" {
            if let Some(bumper) = pick_bumper(ctx, item, &feature, false)? {
                debug!("    rating video: {}", bumper.path);
                playables.push(Video::new(&bumper.path).into());
                found = true;
            }
        }
        // Image bumpers also stand in when no video bumper matched
        if media == "image" || (media == "video" && !found) {
            if let Some(bumper) = pick_bumper(ctx, item, &feature, true)? {
                debug!("    rating image: {}", bumper.path);
                let mut image = Image::new(&bumper.path, RATING_IMAGE_SECONDS);
                image.fade_ms = RATING_IMAGE_FADE_MS;
                playables.push(image.into());
            }
        }
        debug!("    feature: {}", feature.title);
        playables.push(feature.to_video().into());
    }
    Ok(playables)
}

/// Bumper for the feature's rating, honoring the style selection mode.
/// Features without a rating get none.
fn pick_bumper(
    ctx: &RunContext,
    item: &SequenceItem,
    feature: &Feature,
    image: bool,
) -> Result<Option<RatingBumper>> {
    let Some(rating) = &feature.rating else {
        return Ok(None);
    };

    let settings = ctx.settings.as_ref();
    if item.live_str("ratingStyleSelection", settings, "random") == "style" {
        let style = item.live_str("ratingStyle", settings, "");
        let bumper = ctx.store.rating_bumper_with_style(
            &rating.system,
            &rating.name,
            feature.is_3d,
            image,
            &style,
        )?;
        return Ok(bumper);
    }

    let candidates = ctx
        .store
        .rating_bumpers(&rating.system, &rating.name, feature.is_3d, image)?;
    Ok(candidates.choose(&mut rand::rng()).cloned())
}
