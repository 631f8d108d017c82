//! Playable media units
//!
//! Units are plain serializable records: the engine fills them in, the host
//! player consumes them. JSON field names follow the host contract
//! (camelCase).

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A still image shown for a fixed time.
///
/// Slides belonging to a trivia set count down to 0 on the set's final
/// slide; only 0-numbered slides are watched-markable and act as cutoff
/// points when a slideshow runs over its time budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub path: String,
    /// Display time in seconds
    pub duration: f64,
    #[serde(default)]
    pub set_number: u32,
    /// Identifier of the trivia set this slide belongs to
    #[serde(default, rename = "setID")]
    pub set_id: Option<String>,
    /// Crossfade length in milliseconds (0 = no fade)
    #[serde(default, rename = "fade")]
    pub fade_ms: u32,
}

impl Image {
    pub fn new(path: impl Into<String>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
            set_number: 0,
            set_id: None,
            fade_ms: 0,
        }
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IMAGE ({}s): {}", self.duration, self.path)
    }
}

/// A video clip, local or remote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub path: String,
    /// User agent some streaming sources require for playback
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Length in seconds when known, 0 otherwise
    #[serde(default)]
    pub duration: f64,
    #[serde(default, rename = "setID")]
    pub set_id: Option<String>,
}

impl Video {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            user_agent: None,
            duration: 0.0,
            set_id: None,
        }
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VIDEO: {}", self.path)
    }
}

/// A music track stitched under a slideshow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub path: String,
    /// Length in seconds (0 when probing failed)
    pub duration: f64,
}

impl Song {
    pub fn new(path: impl Into<String>, duration: f64) -> Self {
        Self {
            path: path.into(),
            duration,
        }
    }
}

/// Executes an action script; the implementation lives host-side
pub trait ActionProcessor: Send + Sync {
    fn run(&self);
}

/// An action step of the timeline.
///
/// The unit itself only carries the script path; running it delegates to
/// the attached processor.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub path: String,
    #[serde(skip)]
    pub processor: Option<Arc<dyn ActionProcessor>>,
}

impl Action {
    pub fn new(path: impl Into<String>, processor: Arc<dyn ActionProcessor>) -> Self {
        Self {
            path: path.into(),
            processor: Some(processor),
        }
    }

    /// Runs the action through its processor, if one is attached
    pub fn run(&self) {
        if let Some(processor) = &self.processor {
            processor.run();
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("path", &self.path).finish()
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_image_defaults() {
        let img = Image::new("/a.jpg", 10.0);
        assert_eq!(img.set_number, 0);
        assert_eq!(img.set_id, None);
        assert_eq!(img.fade_ms, 0);
    }

    #[test]
    fn test_image_json_field_names() {
        let mut img = Image::new("/a.jpg", 10.0);
        img.set_number = 2;
        img.set_id = Some("q1".into());
        img.fade_ms = 400;

        let json = serde_json::to_value(&img).unwrap();
        assert_eq!(json["setNumber"], 2);
        assert_eq!(json["setID"], "q1");
        assert_eq!(json["fade"], 400);
    }

    #[test]
    fn test_action_runs_through_processor() {
        struct CountingProcessor(AtomicU32);
        impl ActionProcessor for CountingProcessor {
            fn run(&self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let processor = Arc::new(CountingProcessor(AtomicU32::new(0)));
        let action = Action::new("/actions/lights.py", processor.clone());
        action.run();
        action.run();
        assert_eq!(processor.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_action_deserializes_without_processor() {
        let action: Action = serde_json::from_str(r#"{"path":"/a.py"}"#).unwrap();
        assert!(action.processor.is_none());
        action.run(); // sans processeur : no-op
    }
}
