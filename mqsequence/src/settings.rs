//! Live settings resolution.
//!
//! Item attributes resolve against whatever settings backend the host
//! provides; the built-in defaults below are the last resort and match
//! the stock behavior of an unconfigured install.

use std::collections::BTreeMap;

use crate::AttrValue;

/// Key→value settings backend.
///
/// Implemented by the configuration crate for real runs and by a plain
/// `BTreeMap` for tests.
pub trait SettingsProvider: Send + Sync {
    fn setting(&self, key: &str) -> Option<AttrValue>;
}

impl SettingsProvider for BTreeMap<String, AttrValue> {
    fn setting(&self, key: &str) -> Option<AttrValue> {
        self.get(key).cloned()
    }
}

/// Built-in default for a dotted settings key, or `None` when the key
/// has no stock value.
pub fn setting_default(key: &str) -> Option<AttrValue> {
    use AttrValue::{Bool, Float, Int, Str};

    let value = match key {
        // ==== feature ====
        "feature.count" => Int(1),
        "feature.ratingBumper" => Str("video".into()),
        "feature.ratingStyleSelection" => Str("random".into()),

        // ==== trivia ====
        "trivia.format" => Str("slide".into()),
        "trivia.duration" => Int(5),
        "trivia.qDuration" => Int(10),
        "trivia.cDuration" => Int(10),
        "trivia.aDuration" => Int(10),
        "trivia.sDuration" => Int(10),
        "trivia.transition" => Str("fade".into()),
        "trivia.transitionDuration" => Int(400),
        "trivia.music" => Str("off".into()),
        "trivia.musicVolume" => Int(85),
        "trivia.musicFadeIn" => Float(3.0),
        "trivia.musicFadeOut" => Float(3.0),

        // ==== trailer ====
        "trailer.count" => Int(1),
        "trailer.source" => Str("content".into()),
        "trailer.quality" => Str("720p".into()),
        "trailer.ratingLimit" => Str("none".into()),
        "trailer.ratingMax" => Str("MPAA.PG-13".into()),
        "trailer.limitGenre" => Bool(true),
        "trailer.playUnwatched" => Bool(true),

        // ==== bumpers ====
        "video.count" => Int(1),
        "video.random" => Bool(true),
        "video.play3D" => Bool(true),
        "audioformat.method" => Str("af.detect".into()),
        "audioformat.fallback" => Str("af.format".into()),
        "audioformat.play3D" => Bool(true),
        "bumper.fallback2D" => Bool(false),

        _ => return None,
    };

    Some(value)
}

/// Host setting for `key`, falling back to the built-in default.
pub fn setting_or_default(settings: &dyn SettingsProvider, key: &str) -> Option<AttrValue> {
    settings.setting(key).or_else(|| setting_default(key))
}
