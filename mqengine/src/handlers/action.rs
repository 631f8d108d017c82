//! Action handler: wraps an action file into a timeline unit.

use mqplayable::{Action, PlayableItem};
use mqsequence::SequenceItem;
use tracing::debug;

use crate::context::RunContext;
use crate::error::Result;

pub(super) fn handle(ctx: &mut RunContext, item: &SequenceItem) -> Result<Vec<PlayableItem>> {
    let settings = ctx.settings.clone();
    let path = item.live_str("file", settings.as_ref(), "");
    if path.is_empty() {
        debug!("    no path set");
        return Ok(Vec::new());
    }

    debug!("    {path}");
    let processor = ctx.actions.open(&path);
    Ok(vec![Action::new(path, processor).into()])
}
