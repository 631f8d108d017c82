//! Tests du processeur : parcours du programme, sauts conditionnels,
//! curseur bidirectionnel.

use std::collections::BTreeMap;
use std::sync::Arc;

use mqengine::{FileActionFactory, FsMediaLister, NullScraper, RunContext, SequenceProcessor};
use mqplayable::{Feature, PlayableItem};
use mqratings::Rating;
use mqsequence::{
    AttrValue, CommandKind, Condition, ItemType, QueueCondition, Sequence, SequenceItem,
};
use mqstore::Store;

/// Contexte minimal sur un store en mémoire
fn create_test_context() -> RunContext {
    RunContext::new(
        Arc::new(BTreeMap::new()),
        Arc::new(Store::open_in_memory().unwrap()),
        Arc::new(NullScraper),
        Arc::new(FsMediaLister),
        Arc::new(FileActionFactory),
        None,
    )
}

/// Item trailer en mode fichier : se développe en une seule vidéo
fn file_trailer(path: &str) -> SequenceItem {
    SequenceItem::new(ItemType::Trailer)
        .with_attr("source", AttrValue::Str("file".to_string()))
        .with_attr("file", AttrValue::Str(path.to_string()))
}

fn command(kind: CommandKind, arg: i64, condition: Option<Condition>) -> SequenceItem {
    let mut item = SequenceItem::new(ItemType::Command);
    item.command = Some(kind);
    item.arg = Some(arg);
    item.condition = condition;
    item
}

fn sequence(items: Vec<SequenceItem>) -> Sequence {
    Sequence {
        name: "test".to_string(),
        active: true,
        items,
    }
}

fn feature(title: &str) -> Feature {
    let mut f = Feature::new(format!("/movies/{title}.mkv"), title);
    f.rating = Some(Rating::parse("MPAA:PG-13").unwrap());
    f
}

#[test]
fn test_before_processing_everything_is_empty() {
    let mut p = SequenceProcessor::new(sequence(vec![]), create_test_context());

    assert!(p.at_end());
    assert!(p.next().is_none());
    assert!(p.prev().is_none());
    assert_eq!(p.len(), 0);
}

#[test]
fn test_empty_program_serves_only_the_sentinel() {
    let mut p = SequenceProcessor::new(sequence(vec![]), create_test_context());
    p.process().unwrap();

    assert_eq!(p.len(), 0);
    // Le sentinel n'est pas encore atteint
    assert!(!p.at_end());
    assert!(p.next().is_none());
    assert!(p.at_end());
    assert!(p.next().is_none());
}

#[test]
fn test_walk_expands_items_in_order() {
    let seq = sequence(vec![file_trailer("/t/a.mp4"), file_trailer("/t/b.mp4")]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    assert_eq!(p.len(), 2);
    assert_eq!(p.next().unwrap().path(), Some("/t/a.mp4"));
    assert_eq!(p.next().unwrap().path(), Some("/t/b.mp4"));
    assert!(p.next().is_none());
    assert!(p.at_end());
    // L'état final est stable
    assert!(p.next().is_none());
}

#[test]
fn test_next_prev_next_identity() {
    let seq = sequence(vec![file_trailer("/t/a.mp4"), file_trailer("/t/b.mp4")]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    assert_eq!(p.next().unwrap().path(), Some("/t/a.mp4"));
    assert_eq!(p.next().unwrap().path(), Some("/t/b.mp4"));
    assert_eq!(p.prev().unwrap().path(), Some("/t/a.mp4"));
    assert_eq!(p.next().unwrap().path(), Some("/t/b.mp4"));
}

#[test]
fn test_prev_stays_on_first_unit() {
    let seq = sequence(vec![file_trailer("/t/a.mp4")]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    p.next();
    assert_eq!(p.prev().unwrap().path(), Some("/t/a.mp4"));
    assert_eq!(p.prev().unwrap().path(), Some("/t/a.mp4"));
    assert_eq!(p.position(), Some(0));
}

#[test]
fn test_disabled_items_are_skipped() {
    let mut off = file_trailer("/t/b.mp4");
    off.enabled = false;
    let seq = sequence(vec![file_trailer("/t/a.mp4"), off, file_trailer("/t/c.mp4")]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    assert_eq!(p.len(), 2);
    assert_eq!(p.next().unwrap().path(), Some("/t/a.mp4"));
    assert_eq!(p.next().unwrap().path(), Some("/t/c.mp4"));
}

#[test]
fn test_skip_replaces_the_advance() {
    // skip 3 depuis la position 0 atterrit directement sur le dernier item
    let seq = sequence(vec![
        command(CommandKind::Skip, 3, None),
        file_trailer("/t/a.mp4"),
        file_trailer("/t/b.mp4"),
        file_trailer("/t/c.mp4"),
    ]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    assert_eq!(p.len(), 1);
    assert_eq!(p.next().unwrap().path(), Some("/t/c.mp4"));
}

#[test]
fn test_back_replays_until_queue_empty() {
    // Le bloc feature se rejoue tant que la file n'est pas vide
    let seq = sequence(vec![
        SequenceItem::new(ItemType::Feature),
        command(
            CommandKind::Back,
            1,
            Some(Condition::FeatureQueue(QueueCondition::Full)),
        ),
    ]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.add_feature(feature("A"));
    p.add_feature(feature("B"));
    p.process().unwrap();

    assert_eq!(p.len(), 2);
    assert_eq!(p.next().unwrap().path(), Some("/movies/A.mkv"));
    assert_eq!(p.next().unwrap().path(), Some("/movies/B.mkv"));
}

#[test]
fn test_skip_condition_unmet_is_inert() {
    // File vide : le saut conditionné sur "file pleine" ne part pas
    let seq = sequence(vec![
        command(
            CommandKind::Skip,
            2,
            Some(Condition::FeatureQueue(QueueCondition::Full)),
        ),
        file_trailer("/t/a.mp4"),
    ]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    assert_eq!(p.len(), 1);
    assert_eq!(p.next().unwrap().path(), Some("/t/a.mp4"));
}

#[test]
fn test_command_without_arg_is_inert() {
    let mut jump = command(CommandKind::Skip, 0, None);
    jump.arg = None;
    let seq = sequence(vec![jump, file_trailer("/t/a.mp4")]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    assert_eq!(p.len(), 1);
}

#[test]
fn test_jump_before_start_stops_the_walk() {
    let seq = sequence(vec![
        file_trailer("/t/a.mp4"),
        command(CommandKind::Back, 5, None),
        file_trailer("/t/b.mp4"),
    ]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    // Ce qui a été construit avant l'arrêt est conservé
    assert_eq!(p.len(), 1);
    assert_eq!(p.next().unwrap().path(), Some("/t/a.mp4"));
}

#[test]
fn test_feature_item_emits_feature_video() {
    let seq = sequence(vec![SequenceItem::new(ItemType::Feature)]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.add_feature(feature("A"));
    p.process().unwrap();

    assert_eq!(p.len(), 1);
    let unit = p.next().unwrap();
    assert!(matches!(*unit, PlayableItem::Video(_)));
    assert_eq!(unit.path(), Some("/movies/A.mkv"));
}

#[test]
fn test_process_resets_the_cursor() {
    let seq = sequence(vec![file_trailer("/t/a.mp4")]);
    let mut p = SequenceProcessor::new(seq, create_test_context());
    p.process().unwrap();

    assert!(p.next().is_some());
    assert!(p.next().is_none());

    p.process().unwrap();
    assert_eq!(p.position(), None);
    assert_eq!(p.next().unwrap().path(), Some("/t/a.mp4"));
}
