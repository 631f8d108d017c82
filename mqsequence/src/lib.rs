//! Pre-show sequence template model.
//!
//! A sequence is an ordered program of items (features, trivia,
//! trailers, bumpers, actions, control commands) authored as a JSON
//! template. Item attributes are resolved *live* at processing time
//! through a [`SettingsProvider`], so settings changed between runs
//! take effect without reloading the template.
//!
//! # Exemple
//!
//! ```
//! use mqsequence::Sequence;
//! use std::collections::BTreeMap;
//!
//! let json = r#"{
//!     "name": "Saturday Night",
//!     "active": true,
//!     "items": [
//!         {"type": "trailer", "attrs": {"source": "dir", "dir": "/trailers", "count": 2}},
//!         {"type": "feature"}
//!     ]
//! }"#;
//!
//! let sequence = Sequence::from_json(json)?;
//! assert_eq!(sequence.items.len(), 2);
//!
//! let settings: BTreeMap<String, mqsequence::AttrValue> = BTreeMap::new();
//! let count = sequence.items[0].live_int("count", &settings, 1);
//! assert_eq!(count, 2);
//! # Ok::<(), mqsequence::Error>(())
//! ```

mod attr;
mod error;
mod item;
mod sequence;
mod settings;

pub use attr::AttrValue;
pub use error::{Error, Result};
pub use item::{CommandKind, Condition, ItemType, QueueCondition, SequenceItem};
pub use sequence::Sequence;
pub use settings::{setting_default, setting_or_default, SettingsProvider};
