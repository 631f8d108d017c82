//! Feature records queued by the host before a run

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mqratings::Rating;

use crate::Video;

/// Audio formats recognized for format bumper selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Auro3D,
    DtsX,
    DolbyAtmos,
    TrueHd,
    DtsHdMa,
    DtsHd,
    Dts,
    DolbyDigitalPlus,
    DolbyDigital,
    Other,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Auro3D => "Auro-3D",
            AudioFormat::DtsX => "DTS-X",
            AudioFormat::DolbyAtmos => "Dolby Atmos",
            AudioFormat::TrueHd => "TrueHD",
            AudioFormat::DtsHdMa => "DTS-HD Master Audio",
            AudioFormat::DtsHd => "DTS-HD",
            AudioFormat::Dts => "DTS",
            AudioFormat::DolbyDigitalPlus => "Dolby Digital Plus",
            AudioFormat::DolbyDigital => "Dolby Digital",
            AudioFormat::Other => "Other",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = ();

    /// Unknown format names resolve to [`AudioFormat::Other`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Ok(match normalized.as_str() {
            "auro-3d" | "auro3d" => AudioFormat::Auro3D,
            "dts-x" | "dts:x" | "dtsx" => AudioFormat::DtsX,
            "dolby atmos" | "atmos" => AudioFormat::DolbyAtmos,
            "truehd" => AudioFormat::TrueHd,
            "dts-hd master audio" | "dts-hd ma" => AudioFormat::DtsHdMa,
            "dts-hd" => AudioFormat::DtsHd,
            "dts" => AudioFormat::Dts,
            "dolby digital plus" => AudioFormat::DolbyDigitalPlus,
            "dolby digital" => AudioFormat::DolbyDigital,
            _ => AudioFormat::Other,
        })
    }
}

impl Serialize for AudioFormat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AudioFormat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(AudioFormat::from_str(&value).unwrap_or(AudioFormat::Other))
    }
}

/// A film queued for a run, with the metadata selection relies on.
///
/// Read-only during processing; one placeholder record stands in when the
/// host queued nothing, so handlers always have a current feature to read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Host database identifier
    #[serde(default)]
    pub id: String,
    /// Host database type ("movie", "episode", ...)
    #[serde(default)]
    pub db_type: String,
    pub title: String,
    /// Parsed "SYSTEM:NAME" rating; unknown strings are dropped on load
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default, rename = "is3D")]
    pub is_3d: bool,
    #[serde(default)]
    pub audio_format: Option<AudioFormat>,
    #[serde(default)]
    pub thumb: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: u32,
    #[serde(default)]
    pub year: Option<u32>,
    pub path: String,
}

impl Feature {
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            db_type: String::new(),
            title: title.into(),
            rating: None,
            genres: Vec::new(),
            is_3d: false,
            audio_format: None,
            thumb: None,
            runtime: 0,
            year: None,
            path: path.into(),
        }
    }

    /// Placeholder used when no real feature is queued.
    ///
    /// Carries the unrated placeholder rating and the "Other" audio format,
    /// so rating and format selection still resolve against real catalog
    /// categories.
    pub fn placeholder() -> Self {
        let mut feature = Feature::new("", "Default Feature");
        feature.rating = Some(Rating::nr());
        feature.audio_format = Some(AudioFormat::Other);
        feature
    }

    /// Formatted runtime, e.g. "117 minutes"
    pub fn duration_minutes_display(&self) -> String {
        format!("{} minutes", self.runtime)
    }

    /// The video unit emitted into the timeline for this feature.
    ///
    /// Length is left at 0: the host player measures the file itself.
    pub fn to_video(&self) -> Video {
        Video::new(&self.path)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FEATURE [ {} ]: rating={} 3D={} audio={}",
            self.title,
            self.rating
                .as_ref()
                .map(|r| r.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.is_3d,
            self.audio_format
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
    }
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<Rating>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| Rating::parse(&s).ok()))
}
