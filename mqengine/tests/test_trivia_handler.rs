//! Tests du handler trivia : remplissage des files, numérotation des
//! sets, rotation des vus, extension à la demande et musique.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use mqengine::{
    handlers::TriviaFeed, FileActionFactory, FsMediaLister, NullScraper, RunContext,
};
use mqplayable::{PlayableItem, SlideFeed, VideoFeed};
use mqsequence::{AttrValue, ItemType, SequenceItem};
use mqstore::{Store, TriviaEntry};

fn create_test_context(store: Arc<Store>) -> RunContext {
    context_with_settings(store, BTreeMap::new())
}

fn context_with_settings(store: Arc<Store>, settings: BTreeMap<String, AttrValue>) -> RunContext {
    RunContext::new(
        Arc::new(settings),
        store,
        Arc::new(NullScraper),
        Arc::new(FsMediaLister),
        Arc::new(FileActionFactory),
        None,
    )
}

/// Entrée à une seule diapositive (question seule)
fn still_entry(tid: &str) -> TriviaEntry {
    TriviaEntry {
        tid: tid.to_string(),
        kind: "slide".to_string(),
        name: None,
        rating: None,
        question_path: Some(format!("/trivia/{tid}_q.jpg")),
        clue_paths: Default::default(),
        answer_path: None,
        duration: 0.0,
    }
}

/// Entrée question + réponse (+ indices), 10 s par diapositive
fn qa_entry(tid: &str, clues: usize) -> TriviaEntry {
    let mut entry = still_entry(tid);
    entry.answer_path = Some(format!("/trivia/{tid}_a.jpg"));
    for i in 0..clues {
        entry.clue_paths[i] = Some(format!("/trivia/{tid}_c{i}.jpg"));
    }
    entry
}

fn video_entry(tid: &str, duration: f64) -> TriviaEntry {
    TriviaEntry {
        tid: tid.to_string(),
        kind: "video".to_string(),
        name: None,
        rating: None,
        question_path: None,
        clue_paths: Default::default(),
        answer_path: Some(format!("/trivia/{tid}.mp4")),
        duration,
    }
}

fn trivia_item(minutes: f64) -> SequenceItem {
    SequenceItem::new(ItemType::Trivia).with_attr("duration", AttrValue::Float(minutes))
}

#[test]
fn test_slide_sets_fill_until_duration_limit() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    for tid in ["t1", "t2", "t3", "t4", "t5"] {
        store.add_trivia(&qa_entry(tid, 0)).unwrap();
    }
    let mut ctx = create_test_context(store);

    // 1 minute de budget, sets de 20 s : trois sets suffisent
    let units = mqengine::handlers::handle(&mut ctx, &trivia_item(1.0)).unwrap();
    assert_eq!(units.len(), 1);
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    assert_eq!(queue.size(), 6);
    assert_eq!(queue.duration, 60.0);
    assert_eq!(queue.max_duration, 60.0);
    assert_eq!(queue.transition.as_deref(), Some("fade"));
    assert_eq!(queue.transition_duration_ms, 400);
    assert!(queue.music.is_empty());
}

#[test]
fn test_slide_set_numbering_counts_down_to_answer() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&qa_entry("t1", 3)).unwrap();
    let mut ctx = create_test_context(store);

    let units = mqengine::handlers::handle(&mut ctx, &trivia_item(5.0)).unwrap();
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    // Ordre visuel : question, indices dans l'ordre, réponse
    let paths: Vec<&str> = queue.items().iter().map(|i| i.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/trivia/t1_q.jpg",
            "/trivia/t1_c0.jpg",
            "/trivia/t1_c1.jpg",
            "/trivia/t1_c2.jpg",
            "/trivia/t1_a.jpg",
        ]
    );

    // La numérotation décroît jusqu'à 0 sur la réponse
    let numbers: Vec<u32> = queue.items().iter().map(|i| i.set_number).collect();
    assert_eq!(numbers, vec![4, 3, 2, 1, 0]);
    assert!(queue.items().iter().all(|i| i.set_id.as_deref() == Some("t1")));
}

#[test]
fn test_still_gets_still_duration() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&still_entry("t1")).unwrap();
    let mut ctx = create_test_context(store);

    let item = trivia_item(5.0).with_attr("sDuration", AttrValue::Int(99));
    let units = mqengine::handlers::handle(&mut ctx, &item).unwrap();
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    assert_eq!(queue.size(), 1);
    assert_eq!(queue.items()[0].duration, 99.0);
    assert_eq!(queue.items()[0].set_number, 0);
}

#[test]
fn test_unwatched_served_before_rotation() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    for tid in ["u1", "u2", "w1", "w2"] {
        store.add_trivia(&still_entry(tid)).unwrap();
    }
    store
        .mark_trivia_watched("w1", "2026-01-01T00:00:00+00:00")
        .unwrap();
    store
        .mark_trivia_watched("w2", "2026-01-02T00:00:00+00:00")
        .unwrap();
    let mut ctx = create_test_context(store);

    let units = mqengine::handlers::handle(&mut ctx, &trivia_item(1.0)).unwrap();
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    assert_eq!(queue.size(), 4);
    let ids: Vec<&str> = queue
        .items()
        .iter()
        .map(|i| i.set_id.as_deref().unwrap())
        .collect();
    assert!(ids[..2].contains(&"u1") && ids[..2].contains(&"u2"));
    assert!(ids[2..].contains(&"w1") && ids[2..].contains(&"w2"));
}

#[test]
fn test_rotation_batches_of_four_oldest_first() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    for (i, tid) in ["t1", "t2", "t3", "t4", "t5", "t6"].iter().enumerate() {
        store.add_trivia(&still_entry(tid)).unwrap();
        store
            .mark_trivia_watched(tid, &format!("2026-01-0{}T00:00:00+00:00", i + 1))
            .unwrap();
    }
    let mut ctx = create_test_context(store);

    let units = mqengine::handlers::handle(&mut ctx, &trivia_item(1.0)).unwrap();
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    assert_eq!(queue.size(), 6);
    let ids: Vec<&str> = queue
        .items()
        .iter()
        .map(|i| i.set_id.as_deref().unwrap())
        .collect();
    // Le premier lot mélange les quatre plus anciens, le second le reste
    for tid in ["t1", "t2", "t3", "t4"] {
        assert!(ids[..4].contains(&tid), "{tid} should be in the first batch");
    }
    for tid in ["t5", "t6"] {
        assert!(ids[4..].contains(&tid), "{tid} should be in the second batch");
    }
}

#[test]
fn test_video_format_fills_video_queue() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&video_entry("v1", 40.0)).unwrap();
    store.add_trivia(&video_entry("v2", 40.0)).unwrap();
    store.add_trivia(&still_entry("s1")).unwrap();
    let mut ctx = create_test_context(store);

    let item = trivia_item(1.0).with_attr("format", AttrValue::Str("video".to_string()));
    let units = mqengine::handlers::handle(&mut ctx, &item).unwrap();

    // Pas de diaporama : tout le budget part en vidéo
    assert_eq!(units.len(), 1);
    let PlayableItem::Videos(vqueue) = units.into_iter().next().unwrap() else {
        panic!("expected a video queue");
    };

    assert_eq!(vqueue.len(), 2);
    assert_eq!(vqueue.duration, 80.0);
    assert!(vqueue
        .items()
        .iter()
        .all(|v| v.duration == 40.0 && v.set_id.is_some()));
    assert!(vqueue.items().iter().all(|v| v.path.ends_with(".mp4")));
}

#[test]
fn test_music_content_stitches_to_cover_queue() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    for tid in ["t1", "t2", "t3"] {
        store.add_trivia(&qa_entry(tid, 0)).unwrap();
    }
    store.add_song("/music/a.flac", 10.0).unwrap();
    store.add_song("/music/b.flac", 10.0).unwrap();

    let mut settings = BTreeMap::new();
    settings.insert("trivia.musicVolume".to_string(), AttrValue::Int(50));
    let mut ctx = context_with_settings(store, settings);

    let item = trivia_item(1.0).with_attr("music", AttrValue::Str("content".to_string()));
    let units = mqengine::handlers::handle(&mut ctx, &item).unwrap();
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    // 60 s de diapositives, pistes de 10 s : la liste est répétée
    // jusqu'à couvrir la file
    assert_eq!(queue.duration, 60.0);
    assert_eq!(queue.music.len(), 6);
    let total: f64 = queue.music.iter().map(|s| s.duration).sum();
    assert_eq!(total, 60.0);

    // Le réglage hôte prime sur la valeur par défaut
    assert_eq!(queue.music_volume, 50);
    assert_eq!(queue.music_fade_in, 3.0);
    assert_eq!(queue.music_fade_out, 3.0);
}

#[test]
fn test_music_with_zero_durations_is_not_looped() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&qa_entry("t1", 0)).unwrap();
    store.add_song("/music/a.flac", 0.0).unwrap();
    store.add_song("/music/b.flac", 0.0).unwrap();
    let mut ctx = create_test_context(store);

    let item = trivia_item(1.0).with_attr("music", AttrValue::Str("content".to_string()));
    let units = mqengine::handlers::handle(&mut ctx, &item).unwrap();
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    assert_eq!(queue.music.len(), 2);
}

#[test]
fn test_music_dir_mode_lists_and_probes() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("a.mp3"), b"not really audio").unwrap();
    std::fs::write(dir.path().join("b.mp3"), b"not really audio").unwrap();

    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&qa_entry("t1", 0)).unwrap();
    let mut ctx = create_test_context(store);

    let item = trivia_item(1.0)
        .with_attr("music", AttrValue::Str("dir".to_string()))
        .with_attr(
            "musicDir",
            AttrValue::Str(dir.path().to_string_lossy().into_owned()),
        );
    let units = mqengine::handlers::handle(&mut ctx, &item).unwrap();
    let PlayableItem::Images(queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };

    // Les durées illisibles valent 0 : les pistes restent, sans boucle
    assert_eq!(queue.music.len(), 2);
    assert!(queue.music.iter().all(|s| s.duration == 0.0));
    assert!(queue.music.iter().all(|s| s.path.ends_with(".mp3")));
}

#[test]
fn test_feed_extends_queue_on_demand() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&still_entry("t1")).unwrap();
    store.add_trivia(&still_entry("t2")).unwrap();
    let mut ctx = create_test_context(store.clone());

    // Budget de 3 s : un seul set entre dans la file initiale
    let units = mqengine::handlers::handle(&mut ctx, &trivia_item(0.05)).unwrap();
    let PlayableItem::Images(mut queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };
    assert_eq!(queue.size(), 1);
    let first = queue.next(None, false).unwrap().set_id.clone().unwrap();

    // Hors dépassement, la file s'étend via le feed avec l'autre entrée
    let second = queue.next(None, false).unwrap().set_id.clone().unwrap();
    assert_ne!(first, second);
    assert_eq!(queue.size(), 2);

    // Le marquage d'une fin de set passe par le feed jusqu'au registre
    let last = queue.current().unwrap().clone();
    queue.mark(&last);
    assert!(store.trivia_is_watched(&second).unwrap());
}

#[test]
fn test_overtime_cuts_at_set_boundary() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&qa_entry("t1", 0)).unwrap();
    store.add_trivia(&qa_entry("t2", 0)).unwrap();
    let mut ctx = create_test_context(store);

    // Budget nul : dépassement dès le départ, mais le set en cours va
    // jusqu'à sa réponse
    let units = mqengine::handlers::handle(&mut ctx, &trivia_item(0.0)).unwrap();
    let PlayableItem::Images(mut queue) = units.into_iter().next().unwrap() else {
        panic!("expected an image queue");
    };
    assert_eq!(queue.size(), 2);

    let started = Some(Instant::now());
    assert_eq!(queue.next(started, false).unwrap().set_number, 1);
    assert_eq!(queue.next(started, false).unwrap().set_number, 0);
    assert!(queue.next(started, false).is_none());
}

#[test]
fn test_feed_skips_sets_already_queued() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&still_entry("t1")).unwrap();
    store.add_trivia(&still_entry("t2")).unwrap();

    let feed = TriviaFeed::new(
        store,
        Arc::new(BTreeMap::new()),
        SequenceItem::new(ItemType::Trivia),
    );

    let mut queue = mqplayable::ImageQueue::new(300.0);
    queue.append_all(vec![mqplayable::Image::new("/trivia/t1_q.jpg", 10.0)]);

    let slides = feed.next_slides(&queue).unwrap();
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0].set_id.as_deref(), Some("t2"));
}

#[test]
fn test_feed_marks_slides_and_videos_watched() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store.add_trivia(&still_entry("t1")).unwrap();
    store.add_trivia(&video_entry("v1", 30.0)).unwrap();

    let feed = TriviaFeed::new(
        store.clone(),
        Arc::new(BTreeMap::new()),
        SequenceItem::new(ItemType::Trivia),
    );

    let mut image = mqplayable::Image::new("/trivia/t1_q.jpg", 10.0);
    image.set_id = Some("t1".to_string());
    SlideFeed::mark_watched(&feed, &image);
    assert!(store.trivia_is_watched("t1").unwrap());

    let mut video = mqplayable::Video::new("/trivia/v1.mp4");
    video.set_id = Some("v1".to_string());
    VideoFeed::mark_watched(&feed, &video);
    assert!(store.trivia_is_watched("v1").unwrap());
}
