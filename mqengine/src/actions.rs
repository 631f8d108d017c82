//! Execution backends for `action` items.
//!
//! The engine only packages action files into timeline units; running
//! them is the host's business. [`FileActionFactory`] is the default
//! wiring and merely logs.

use std::sync::Arc;

use mqplayable::ActionProcessor;
use tracing::info;

/// Builds the processor executed when an action unit is reached.
pub trait ActionFactory: Send + Sync {
    fn open(&self, path: &str) -> Arc<dyn ActionProcessor>;
}

/// Factory for [`FileActionProcessor`].
#[derive(Debug, Default)]
pub struct FileActionFactory;

impl ActionFactory for FileActionFactory {
    fn open(&self, path: &str) -> Arc<dyn ActionProcessor> {
        Arc::new(FileActionProcessor {
            path: path.to_string(),
        })
    }
}

/// Logs the action file instead of executing it. Hosts with real side
/// effects (scripts, HTTP calls) plug in their own [`ActionFactory`].
#[derive(Debug)]
pub struct FileActionProcessor {
    path: String,
}

impl ActionProcessor for FileActionProcessor {
    fn run(&self) {
        info!("🎬 Action file: {}", self.path);
    }
}
