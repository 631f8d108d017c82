//! Sequence templates: the authored program for one show.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Result, SequenceItem};

/// An ordered pre-show program, as authored in a JSON template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub items: Vec<SequenceItem>,
}

fn default_active() -> bool {
    true
}

impl Sequence {
    /// Parse a template from its JSON text.
    pub fn from_json(data: &str) -> Result<Self> {
        let sequence: Sequence = serde_json::from_str(data)?;
        debug!(
            name = %sequence.name,
            items = sequence.items.len(),
            "sequence template parsed"
        );
        Ok(sequence)
    }

    /// Read and parse a template file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref())?;
        Self::from_json(&data)
    }

    /// Serialize back to template JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
