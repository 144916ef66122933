//! Core data models for the downloader

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Output format offered to the user

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Audio only, converted to mp3
    Mp3,

    /// Video and audio merged into mp4
    Mp4,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Mp3, OutputFormat::Mp4];

    /// Short name, also used as the file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Mp4 => "mp4",
        }
    }

    /// Label shown in the format picker
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Mp3 => "mp3 - Audio only",
            OutputFormat::Mp4 => "mp4 - Video & Audio",
        }
    }

    /// Parse either a short name (`mp3`) or a full picker label
    pub fn from_label(label: &str) -> Option<Self> {
        let short = label.split(" - ").next().unwrap_or(label).trim();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(short))
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, OutputFormat::Mp3)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the user picked in one loop iteration

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub url: String,

    pub format: OutputFormat,

    pub crop: bool,
}

impl Selection {
    pub fn new(url: impl Into<String>, format: OutputFormat, crop: bool) -> Self {
        // Cropping only applies to audio covers
        Self {
            url: url.into(),
            format,
            crop: crop && format.is_audio(),
        }
    }
}

/// Metadata returned by the engine's probe call.
///
/// Only the fields the summary needs are kept; everything else in the
/// engine's JSON dump is ignored.

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub uploader: Option<String>,

    #[serde(default)]
    pub playlist_count: Option<u64>,

    #[serde(default)]
    pub webpage_url: Option<String>,
}

impl MediaInfo {
    /// Title to display, falling back to the media id and then the URL
    pub fn display_title(&self, url: &str) -> String {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(url)
            .to_string()
    }
}

/// Exit information from a finished engine run

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineExit {
    pub code: Option<i32>,
}

impl EngineExit {
    pub fn success() -> Self {
        Self { code: Some(0) }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Everything the post-download summary prints

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadReport {
    pub title: String,

    pub uploader: Option<String>,

    pub item_count: Option<u64>,

    pub format: OutputFormat,

    pub crop: bool,

    pub playlist: bool,

    pub saved_into: PathBuf,

    pub exit: EngineExit,
}

/// Application error types

#[derive(Debug, thiserror::Error)]

pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::Prompt(err.to_string())
    }
}

/// Result type alias for application operations

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_label() {
        assert_eq!(
            OutputFormat::from_label("mp3 - Audio only"),
            Some(OutputFormat::Mp3)
        );
        assert_eq!(
            OutputFormat::from_label("mp4 - Video & Audio"),
            Some(OutputFormat::Mp4)
        );
        assert_eq!(OutputFormat::from_label("MP4"), Some(OutputFormat::Mp4));
        assert_eq!(OutputFormat::from_label("flac - Lossless"), None);
    }

    #[test]
    fn test_selection_drops_crop_for_video() {
        let selection = Selection::new("https://youtu.be/abc", OutputFormat::Mp4, true);
        assert!(!selection.crop);

        let selection = Selection::new("https://youtu.be/abc", OutputFormat::Mp3, true);
        assert!(selection.crop);
    }

    #[test]
    fn test_media_info_parses_probe_json() {
        let json = r#"{
            "id": "PL123",
            "title": "Road Trip Mix",
            "uploader": "Some Channel",
            "playlist_count": 12,
            "_type": "playlist",
            "entries": []
        }"#;

        let info: MediaInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.title.as_deref(), Some("Road Trip Mix"));
        assert_eq!(info.playlist_count, Some(12));
        assert!(info.webpage_url.is_none());
    }

    #[test]
    fn test_display_title_fallbacks() {
        let url = "https://youtu.be/abc";

        let info = MediaInfo {
            id: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(info.display_title(url), "abc");

        assert_eq!(MediaInfo::default().display_title(url), url);
    }
}
