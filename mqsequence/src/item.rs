//! Sequence items and their live attribute resolution.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::settings::{setting_default, SettingsProvider};
use crate::AttrValue;

/// Category of a sequence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Feature,
    Trivia,
    Trailer,
    VideoBumper,
    AudioFormat,
    Action,
    Command,
}

impl ItemType {
    /// Template tag, as written in the JSON `type` field.
    pub fn tag(&self) -> &'static str {
        match self {
            ItemType::Feature => "feature",
            ItemType::Trivia => "trivia",
            ItemType::Trailer => "trailer",
            ItemType::VideoBumper => "video.bumper",
            ItemType::AudioFormat => "audioformat.bumper",
            ItemType::Action => "action",
            ItemType::Command => "command",
        }
    }

    /// Prefix of this category's settings keys (`video.count`,
    /// `audioformat.method`, ...). Shorter than the template tag for
    /// the bumper categories.
    pub fn settings_prefix(&self) -> &'static str {
        match self {
            ItemType::VideoBumper => "video",
            ItemType::AudioFormat => "audioformat",
            other => other.tag(),
        }
    }

    /// One-letter marker used in walk logs.
    pub fn type_char(&self) -> char {
        match self {
            ItemType::Feature => 'F',
            ItemType::Trivia => 'Q',
            ItemType::Trailer => 'T',
            ItemType::VideoBumper => 'V',
            ItemType::AudioFormat => 'A',
            ItemType::Action => 'X',
            ItemType::Command => 'C',
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feature" => Ok(ItemType::Feature),
            "trivia" => Ok(ItemType::Trivia),
            "trailer" => Ok(ItemType::Trailer),
            "video.bumper" => Ok(ItemType::VideoBumper),
            "audioformat.bumper" => Ok(ItemType::AudioFormat),
            "action" => Ok(ItemType::Action),
            "command" => Ok(ItemType::Command),
            other => Err(format!("unknown sequence item type: {other}")),
        }
    }
}

impl Serialize for ItemType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for ItemType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ItemType::from_str(&s).map_err(DeError::custom)
    }
}

/// Control command carried by a `command` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Back,
    Skip,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Back => "back",
            CommandKind::Skip => "skip",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "back" => Ok(CommandKind::Back),
            "skip" => Ok(CommandKind::Skip),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

impl Serialize for CommandKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CommandKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CommandKind::from_str(&s).map_err(DeError::custom)
    }
}

/// State of the feature queue a command condition tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCondition {
    Full,
    Empty,
}

/// Gate on a control command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    FeatureQueue(QueueCondition),
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::FeatureQueue(QueueCondition::Full) => "feature.queue=full",
            Condition::FeatureQueue(QueueCondition::Empty) => "feature.queue=empty",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feature.queue=full" => Ok(Condition::FeatureQueue(QueueCondition::Full)),
            "feature.queue=empty" => Ok(Condition::FeatureQueue(QueueCondition::Empty)),
            other => Err(format!("unknown condition: {other}")),
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Condition::from_str(&s).map_err(DeError::custom)
    }
}

/// One instruction of the pre-show program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<CommandKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

fn default_enabled() -> bool {
    true
}

impl SequenceItem {
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type,
            name: None,
            enabled: true,
            attrs: BTreeMap::new(),
            command: None,
            arg: None,
            condition: None,
        }
    }

    /// Label for logs: the authored name, or the type tag.
    pub fn display(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.item_type.tag())
    }

    /// Convenience setter for template construction.
    pub fn with_attr(mut self, attr: &str, value: AttrValue) -> Self {
        self.attrs.insert(attr.to_string(), value);
        self
    }

    /// Resolve an attribute live: the item's own value wins, then the
    /// host setting `"{prefix}.{attr}"`, then the built-in default.
    pub fn live(&self, attr: &str, settings: &dyn SettingsProvider) -> Option<AttrValue> {
        if let Some(value) = self.attrs.get(attr) {
            return Some(value.clone());
        }
        let key = format!("{}.{}", self.item_type.settings_prefix(), attr);
        settings.setting(&key).or_else(|| setting_default(&key))
    }

    pub fn live_int(&self, attr: &str, settings: &dyn SettingsProvider, default: i64) -> i64 {
        self.live(attr, settings)
            .map(|v| v.as_int(default))
            .unwrap_or(default)
    }

    pub fn live_f64(&self, attr: &str, settings: &dyn SettingsProvider, default: f64) -> f64 {
        self.live(attr, settings)
            .map(|v| v.as_f64(default))
            .unwrap_or(default)
    }

    pub fn live_bool(&self, attr: &str, settings: &dyn SettingsProvider, default: bool) -> bool {
        self.live(attr, settings)
            .map(|v| v.as_bool(default))
            .unwrap_or(default)
    }

    pub fn live_str(&self, attr: &str, settings: &dyn SettingsProvider, default: &str) -> String {
        self.live(attr, settings)
            .map(|v| v.as_str(default))
            .unwrap_or_else(|| default.to_string())
    }

    pub fn live_list(
        &self,
        attr: &str,
        settings: &dyn SettingsProvider,
        default: &[String],
    ) -> Vec<String> {
        self.live(attr, settings)
            .map(|v| v.as_list(default))
            .unwrap_or_else(|| default.to_vec())
    }
}
