//! Audio format bumper handler: detected codec first, then the
//! configured format, then a literal file.

use mqplayable::{PlayableItem, Video};
use mqsequence::{setting_or_default, SequenceItem};
use rand::seq::IndexedRandom;
use tracing::debug;

use crate::context::RunContext;
use crate::error::Result;

pub(super) fn handle(ctx: &mut RunContext, item: &SequenceItem) -> Result<Vec<PlayableItem>> {
    let settings = ctx.settings.clone();
    let method = item.live_str("method", settings.as_ref(), "af.detect");
    let fallback = item.live_str("fallback", settings.as_ref(), "af.format");
    let format = item.live_str("format", settings.as_ref(), "");
    debug!("    method {method}, fallback {fallback}, format {format:?}");

    let feature = ctx.current_feature();
    let is_3d = feature.is_3d && item.live_bool("play3D", settings.as_ref(), true);

    let mut bumper = None;

    if method == "af.detect" {
        if let Some(af) = &feature.audio_format {
            bumper = choose(ctx, af.as_str(), is_3d)?;
            if bumper.is_some() {
                debug!("    detect: bumper from the feature codec ({})", feature.title);
            } else {
                debug!("    detect: no codec matches");
            }
        } else {
            debug!("    detect: feature has no audio format");
        }
    }

    if !format.is_empty()
        && bumper.is_none()
        && (method == "af.format" || (method == "af.detect" && fallback == "af.format"))
    {
        bumper = choose(ctx, &format, is_3d)?;
        if bumper.is_some() {
            debug!("    format: bumper from the configured format");
        }
    }

    let file = item.live_str("file", settings.as_ref(), "");
    if !file.is_empty()
        && bumper.is_none()
        && (method == "af.file" || (method == "af.detect" && fallback == "af.file"))
    {
        debug!("    file: {file}");
        return Ok(vec![Video::new(&file).into()]);
    }

    match bumper {
        Some(path) => Ok(vec![Video::new(&path).into()]),
        None => {
            debug!("    nothing to show");
            Ok(Vec::new())
        }
    }
}

/// Random bumper for `format` in the feature's dimension, with the
/// global 2D fallback.
fn choose(ctx: &RunContext, format: &str, is_3d: bool) -> Result<Option<String>> {
    let bumpers = ctx.store.audio_format_bumpers(format, Some(is_3d))?;
    if let Some(bumper) = bumpers.choose(&mut rand::rng()) {
        return Ok(Some(bumper.path.clone()));
    }

    let fallback_2d = setting_or_default(ctx.settings.as_ref(), "bumper.fallback2D")
        .map(|v| v.as_bool(false))
        .unwrap_or(false);
    if is_3d && fallback_2d {
        debug!("    falling back to a 2D bumper");
        let bumpers = ctx.store.audio_format_bumpers(format, None)?;
        if let Some(bumper) = bumpers.choose(&mut rand::rng()) {
            return Ok(Some(bumper.path.clone()));
        }
    }
    Ok(None)
}
