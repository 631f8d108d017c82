//! Trivia handler: fills an image queue (and, in video mode, a video
//! queue) from the catalog, with watched rotation and music stitching.

use std::sync::Arc;

use mqplayable::{Image, ImageQueue, PlayableItem, SlideFeed, Song, Video, VideoFeed, VideoQueue};
use mqsequence::{setting_or_default, SequenceItem, SettingsProvider};
use mqstore::{Store, TriviaEntry};
use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::context::{now_stamp, RunContext};
use crate::error::Result;

/// Watched-rotation batch size.
const ROTATION_BATCH: usize = 4;

/// One catalog entry, rendered for playback.
enum TriviaSet {
    Slides(Vec<Image>),
    Video(Video),
}

pub(super) fn handle(ctx: &mut RunContext, item: &SequenceItem) -> Result<Vec<PlayableItem>> {
    let settings = ctx.settings.clone();
    let videos = item.live_str("format", settings.as_ref(), "slide") == "video";
    let minutes = item.live_f64("duration", settings.as_ref(), 5.0);
    let limit = minutes * 60.0;
    debug!(
        "    {minutes} minute(s) of {}",
        if videos { "quiz videos" } else { "slides" }
    );

    let mut queue = ImageQueue::new(limit);
    queue.transition = Some(item.live_str("transition", settings.as_ref(), "fade"));
    queue.transition_duration_ms = item
        .live_int("transitionDuration", settings.as_ref(), 400)
        .max(0) as u64;

    let mut vqueue = VideoQueue::new();

    for entry in candidates(&ctx.store, videos)? {
        match render(item, settings.as_ref(), &entry) {
            TriviaSet::Slides(slides) => queue.append_all(slides),
            TriviaSet::Video(video) => vqueue.append(video),
        }
        if queue.duration + vqueue.duration >= limit {
            break;
        }
    }

    // Video time eats into the slide budget
    let emit_queue = queue.duration > 0.0;
    if emit_queue {
        queue.max_duration -= vqueue.duration;
    }
    add_music(ctx, item, &mut queue)?;

    let feed = Arc::new(TriviaFeed::new(
        ctx.store.clone(),
        settings.clone(),
        item.clone(),
    ));

    let mut out = Vec::new();
    if emit_queue {
        queue.set_feed(feed.clone());
        out.push(PlayableItem::Images(queue));
    }
    if vqueue.duration > 0.0 {
        vqueue.set_feed(feed);
        out.push(PlayableItem::Videos(vqueue));
    }
    Ok(out)
}

/// Catalog entries in serving order: unwatched first (random order),
/// then the watched rotation in batches of at most four, oldest first,
/// shuffled inside each batch.
fn candidates(store: &Store, videos: bool) -> Result<Vec<TriviaEntry>> {
    let mut out = Vec::new();
    for entry in store.trivia_shuffled(videos)? {
        if !store.trivia_is_watched(&entry.tid)? {
            out.push(entry);
        }
    }

    let mut batch: Vec<TriviaEntry> = Vec::new();
    for watched in store.oldest_watched_trivia()? {
        let Some(entry) = store.trivia_by_id(&watched.wid)? else {
            continue;
        };
        if (entry.kind == "video") != videos {
            continue;
        }
        batch.push(entry);
        if batch.len() >= ROTATION_BATCH {
            batch.shuffle(&mut rand::rng());
            out.append(&mut batch);
        }
    }
    if !batch.is_empty() {
        batch.shuffle(&mut rand::rng());
        out.append(&mut batch);
    }
    Ok(out)
}

/// Renders one catalog entry for playback.
///
/// Slide sets are built answer first so `set_number` counts down to 0
/// on the answer slide, then reversed into viewing order. A set left
/// with a single slide is a still and gets the still duration.
fn render(item: &SequenceItem, settings: &dyn SettingsProvider, entry: &TriviaEntry) -> TriviaSet {
    if entry.kind == "video" {
        let mut video = Video::new(entry.answer_path.clone().unwrap_or_default());
        video.duration = entry.duration;
        video.set_id = Some(entry.tid.clone());
        return TriviaSet::Video(video);
    }

    let answer = item.live_f64("aDuration", settings, 10.0);
    let clue = item.live_f64("cDuration", settings, 10.0);
    let question = item.live_f64("qDuration", settings, 10.0);

    let mut ordered: Vec<(Option<&str>, f64)> = Vec::with_capacity(12);
    ordered.push((entry.answer_path.as_deref(), answer));
    for path in entry.clue_paths.iter().rev() {
        ordered.push((path.as_deref(), clue));
    }
    ordered.push((entry.question_path.as_deref(), question));

    let mut slides = Vec::new();
    let mut set_number = 0;
    for (path, duration) in ordered {
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            let mut image = Image::new(path, duration);
            image.set_number = set_number;
            image.set_id = Some(entry.tid.clone());
            slides.push(image);
            set_number += 1;
        }
    }
    slides.reverse();

    if slides.len() == 1 {
        slides[0].duration = item.live_f64("sDuration", settings, 10.0);
    }
    TriviaSet::Slides(slides)
}

/// Builds and stitches the queue's background music per the item's
/// music mode.
fn add_music(ctx: &RunContext, item: &SequenceItem, queue: &mut ImageQueue) -> Result<()> {
    let settings = ctx.settings.clone();
    let mode = item.live_str("music", settings.as_ref(), "off");
    match mode.as_str() {
        "off" => return Ok(()),
        "content" => {
            queue.music = ctx
                .store
                .songs_shuffled()?
                .into_iter()
                .map(|row| Song::new(row.path, row.duration))
                .collect();
        }
        "dir" => {
            let path = item.live_str("musicDir", settings.as_ref(), "");
            if path.is_empty() {
                return Ok(());
            }
            let mut songs: Vec<Song> = ctx
                .lister
                .list_dir(&path)
                .into_iter()
                .map(|p| {
                    let duration = ctx.lister.probe_duration(&p).unwrap_or(0.0);
                    Song::new(p, duration)
                })
                .collect();
            songs.shuffle(&mut rand::rng());
            queue.music = songs;
        }
        "file" => {
            let path = item.live_str("musicFile", settings.as_ref(), "");
            if path.is_empty() {
                return Ok(());
            }
            let duration = ctx.lister.probe_duration(&path).unwrap_or(0.0);
            queue.music = vec![Song::new(path, duration)];
        }
        other => {
            warn!("Unknown trivia music mode: {other}");
            return Ok(());
        }
    }

    stitch_music(queue);

    queue.music_volume = setting_or_default(settings.as_ref(), "trivia.musicVolume")
        .map(|v| v.as_int(85))
        .unwrap_or(85)
        .clamp(0, 100) as u8;
    queue.music_fade_in = setting_or_default(settings.as_ref(), "trivia.musicFadeIn")
        .map(|v| v.as_f64(3.0))
        .unwrap_or(3.0);
    queue.music_fade_out = setting_or_default(settings.as_ref(), "trivia.musicFadeOut")
        .map(|v| v.as_f64(3.0))
        .unwrap_or(3.0);
    Ok(())
}

/// Repeats the track list until it covers the slide time. A pool whose
/// durations sum to zero is left alone rather than looped forever.
fn stitch_music(queue: &mut ImageQueue) {
    let pool = queue.music.clone();
    let total_pool: f64 = pool.iter().map(|s| s.duration).sum();
    if pool.is_empty() || total_pool <= 0.0 {
        return;
    }

    let mut total = total_pool;
    let mut i = 0;
    while total < queue.duration {
        let song = pool[i % pool.len()].clone();
        total += song.duration;
        queue.music.push(song);
        i += 1;
    }
}

/// On-demand refill for trivia queues: re-runs the candidate stream,
/// skips sets already queued, and marks consumed sets watched.
pub struct TriviaFeed {
    store: Arc<Store>,
    settings: Arc<dyn SettingsProvider>,
    item: SequenceItem,
}

impl TriviaFeed {
    pub fn new(store: Arc<Store>, settings: Arc<dyn SettingsProvider>, item: SequenceItem) -> Self {
        TriviaFeed {
            store,
            settings,
            item,
        }
    }

    fn mark(&self, tid: &str) {
        if let Err(e) = self.store.mark_trivia_watched(tid, &now_stamp()) {
            warn!("Cannot mark trivia {tid} watched: {e}");
        }
    }
}

impl SlideFeed for TriviaFeed {
    fn next_slides(&self, queue: &ImageQueue) -> Option<Vec<Image>> {
        let entries = match candidates(&self.store, false) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot refill trivia queue: {e}");
                return None;
            }
        };
        for entry in entries {
            if let TriviaSet::Slides(slides) = render(&self.item, self.settings.as_ref(), &entry) {
                if slides.is_empty() {
                    continue;
                }
                if slides.iter().any(|s| queue.contains_path(&s.path)) {
                    continue;
                }
                return Some(slides);
            }
        }
        None
    }

    fn mark_watched(&self, image: &Image) {
        if let Some(tid) = &image.set_id {
            self.mark(tid);
        }
    }
}

impl VideoFeed for TriviaFeed {
    fn mark_watched(&self, video: &Video) {
        if let Some(tid) = &video.set_id {
            self.mark(tid);
        }
    }
}
