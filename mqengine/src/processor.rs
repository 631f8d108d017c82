//! The sequence processor: walks the program, expands items through
//! the handlers, and serves the resulting flat timeline.

use mqplayable::{Feature, PlayableItem};
use mqsequence::{CommandKind, Condition, ItemType, QueueCondition, Sequence, SequenceItem};
use tracing::{debug, info, warn};

use crate::context::RunContext;
use crate::error::Result;
use crate::handlers;

/// Interprets a sequence program against a run context and serves the
/// resulting timeline through a bidirectional cursor.
///
/// `process()` rebuilds the whole timeline from scratch; it is not
/// incremental. The cursor starts before the first unit.
pub struct SequenceProcessor {
    sequence: Sequence,
    ctx: RunContext,
    timeline: Vec<PlayableItem>,
    cursor: Option<usize>,
}

impl SequenceProcessor {
    pub fn new(sequence: Sequence, ctx: RunContext) -> Self {
        SequenceProcessor {
            sequence,
            ctx,
            timeline: Vec::new(),
            cursor: None,
        }
    }

    /// Queues a feature for the run. Call before [`process`].
    ///
    /// [`process`]: SequenceProcessor::process
    pub fn add_feature(&mut self, feature: Feature) {
        self.ctx.add_feature(feature);
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Walks the program and builds the timeline, ending with one
    /// terminal sentinel. Resets the cursor to before the start.
    pub fn process(&mut self) -> Result<()> {
        info!("🎞️ Processing sequence '{}'", self.sequence.name);
        debug!("Feature count: {}", self.ctx.feature_count());
        if let Some((min, max)) = self.ctx.ratings_band() {
            debug!("Ratings between {min} and {max}");
        }
        if !self.ctx.genres().is_empty() {
            debug!("Genres: {}", self.ctx.genres().join(", "));
        }

        let items = self.sequence.items.clone();
        let mut timeline = Vec::new();
        let mut pos: usize = 0;

        while pos < items.len() {
            let item = &items[pos];

            if !item.enabled {
                debug!(
                    "[{}] ({}) disabled",
                    item.item_type.type_char(),
                    item.display()
                );
                pos += 1;
                continue;
            }

            if item.item_type == ItemType::Command {
                let offset = self.command_offset(item);
                debug!(
                    "[{}] ({}) offset {offset}",
                    item.item_type.type_char(),
                    item.display()
                );
                if offset != 0 {
                    // The jump replaces the normal advance
                    let target = pos as i64 + offset;
                    if target < 0 {
                        warn!("Jump lands before the sequence start, stopping the walk");
                        break;
                    }
                    pos = target as usize;
                    continue;
                }
                pos += 1;
                continue;
            }

            let units = handlers::handle(&mut self.ctx, item)?;
            timeline.extend(units);
            pos += 1;
        }

        // One sentinel so the timeline is never spuriously empty
        // before the true end
        timeline.push(PlayableItem::End);
        info!(
            "✅ Sequence processed: {} playable unit(s)",
            timeline.len() - 1
        );

        self.timeline = timeline;
        self.cursor = None;
        Ok(())
    }

    /// Offset of a command item: zero when its condition is unmet,
    /// otherwise the signed jump distance.
    fn command_offset(&self, item: &SequenceItem) -> i64 {
        match item.condition {
            Some(Condition::FeatureQueue(QueueCondition::Full))
                if self.ctx.feature_queue_is_empty() =>
            {
                return 0;
            }
            Some(Condition::FeatureQueue(QueueCondition::Empty))
                if !self.ctx.feature_queue_is_empty() =>
            {
                return 0;
            }
            _ => {}
        }

        let arg = item.arg.unwrap_or(0);
        match item.command {
            Some(CommandKind::Back) => -arg,
            Some(CommandKind::Skip) => arg,
            None => 0,
        }
    }

    /// True once the cursor sits on (or past) the terminal sentinel,
    /// or before [`process`] has built anything.
    ///
    /// [`process`]: SequenceProcessor::process
    pub fn at_end(&self) -> bool {
        if self.timeline.is_empty() {
            return true;
        }
        match self.cursor {
            Some(i) => i + 1 >= self.timeline.len(),
            None => false,
        }
    }

    /// Advances the cursor and returns the unit there, or `None` at
    /// the end of the timeline.
    pub fn next(&mut self) -> Option<&mut PlayableItem> {
        if self.at_end() {
            return None;
        }
        let idx = self.cursor.map_or(0, |i| i + 1);
        self.cursor = Some(idx);
        let unit = &mut self.timeline[idx];
        if unit.is_end() {
            None
        } else {
            Some(unit)
        }
    }

    /// Steps the cursor back (staying on the first unit once there)
    /// and returns the unit at the new position. `None` before the
    /// first [`next`].
    ///
    /// [`next`]: SequenceProcessor::next
    pub fn prev(&mut self) -> Option<&mut PlayableItem> {
        let idx = match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                i - 1
            }
            Some(i) => i,
            None => return None,
        };
        let unit = &mut self.timeline[idx];
        if unit.is_end() {
            None
        } else {
            Some(unit)
        }
    }

    /// Cursor position in the timeline, `None` before the first
    /// [`next`].
    ///
    /// [`next`]: SequenceProcessor::next
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of playable units, the terminal sentinel excluded.
    pub fn len(&self) -> usize {
        self.timeline.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The built timeline, terminal sentinel included.
    pub fn timeline(&self) -> &[PlayableItem] {
        &self.timeline
    }
}
