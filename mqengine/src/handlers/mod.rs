//! Expansion of sequence items into playable units.
//!
//! One handler per item category. A handler reads the item's live
//! attributes, consults the store and the run context, and returns the
//! units to append to the timeline. An empty vector means the item has
//! nothing to show and is skipped.

mod action;
mod audio_format;
mod feature;
mod trailer;
mod trivia;
mod video_bumper;

use mqplayable::PlayableItem;
use mqsequence::{ItemType, SequenceItem};
use tracing::debug;

use crate::context::RunContext;
use crate::error::Result;

pub use trivia::TriviaFeed;

/// Expands `item` into its playable units.
pub fn handle(ctx: &mut RunContext, item: &SequenceItem) -> Result<Vec<PlayableItem>> {
    debug!("[{}] {}", item.item_type.type_char(), item.display());
    match item.item_type {
        ItemType::Feature => feature::handle(ctx, item),
        ItemType::Trivia => trivia::handle(ctx, item),
        ItemType::Trailer => trailer::handle(ctx, item),
        ItemType::VideoBumper => video_bumper::handle(ctx, item),
        ItemType::AudioFormat => audio_format::handle(ctx, item),
        ItemType::Action => action::handle(ctx, item),
        // Les commandes sont évaluées par le processeur, pas ici
        ItemType::Command => Ok(Vec::new()),
    }
}
