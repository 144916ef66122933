//! Engine option sets
//!
//! A download is configured by layering option sets: the base set shared by
//! every download, the set for the chosen output format and, for audio, the
//! optional thumbnail crop set. Layering follows dictionary-union rules: any
//! key present in a later set replaces the earlier value wholesale.
//!
//! The merged [`DownloadOptions`] is rendered to yt-dlp command-line
//! arguments by [`DownloadOptions::to_args`].

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::config::EngineSettings;
use crate::core::models::OutputFormat;

/// Post-processor key for the thumbnail converter's ffmpeg output arguments
pub const THUMBNAIL_CONVERTOR_FFMPEG_OUT: &str = "ThumbnailsConvertor+ffmpeg_o";

/// Stage at which a metadata parser runs
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStage {
    PreProcess,
    PostProcess,
}

impl ProcessStage {
    fn as_str(&self) -> &'static str {
        match self {
            ProcessStage::PreProcess => "pre_process",
            ProcessStage::PostProcess => "post_process",
        }
    }
}

/// Post-processing steps the engine runs after fetching media
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "key")]
pub enum PostProcessor {
    /// Extract the audio track and convert it
    ExtractAudio { codec: String },
    /// Write title/artist/etc. into the output container
    EmbedMetadata,
    /// Interpret one metadata field into another
    ParseMetadata {
        when: ProcessStage,
        from: String,
        to: String,
    },
    /// Re-encode the video into another container
    ConvertVideo { format: String },
    /// Embed the downloaded thumbnail as cover art
    EmbedThumbnail,
}

impl PostProcessor {
    fn push_args(&self, args: &mut Vec<String>) {
        match self {
            PostProcessor::ExtractAudio { codec } => {
                args.push("--extract-audio".to_string());
                args.push("--audio-format".to_string());
                args.push(codec.clone());
            }
            PostProcessor::EmbedMetadata => args.push("--embed-metadata".to_string()),
            PostProcessor::ParseMetadata { when, from, to } => {
                args.push("--parse-metadata".to_string());
                args.push(format!("{}:{}:{}", when.as_str(), from, to));
            }
            PostProcessor::ConvertVideo { format } => {
                args.push("--recode-video".to_string());
                args.push(format.clone());
            }
            PostProcessor::EmbedThumbnail => args.push("--embed-thumbnail".to_string()),
        }
    }
}

/// A partial option set layered over [`DownloadOptions`]
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct OptionOverlay {
    pub format: Option<String>,
    pub merge_output_format: Option<String>,
    pub postprocessors: Option<Vec<PostProcessor>>,
    pub postprocessor_args: Option<BTreeMap<String, Vec<String>>>,
}

impl OptionOverlay {
    /// Best audio, converted to mp3 with tags, track number and cover art
    pub fn audio() -> Self {
        Self {
            format: Some("bestaudio/best".to_string()),
            merge_output_format: None,
            postprocessors: Some(vec![
                PostProcessor::ExtractAudio {
                    codec: "mp3".to_string(),
                },
                PostProcessor::EmbedMetadata,
                // Track numbers only show up for playlist items
                PostProcessor::ParseMetadata {
                    when: ProcessStage::PreProcess,
                    from: "playlist_index".to_string(),
                    to: "%(track_number)s".to_string(),
                },
                PostProcessor::EmbedThumbnail,
            ]),
            postprocessor_args: None,
        }
    }

    /// Best video up to `max_height` plus best audio, merged into mp4
    pub fn video(max_height: u32) -> Self {
        Self {
            format: Some(format!("bestvideo[height<={}]+bestaudio/best", max_height)),
            merge_output_format: Some("mp4".to_string()),
            postprocessors: Some(vec![
                PostProcessor::ConvertVideo {
                    format: "mp4".to_string(),
                },
                PostProcessor::EmbedMetadata,
                PostProcessor::EmbedThumbnail,
            ]),
            postprocessor_args: None,
        }
    }

    /// Crop the converted thumbnail to an ih x ih square
    pub fn crop_thumbnail() -> Self {
        let mut args = BTreeMap::new();
        args.insert(
            THUMBNAIL_CONVERTOR_FFMPEG_OUT.to_string(),
            vec![
                "-c:v".to_string(),
                "png".to_string(),
                "-vf".to_string(),
                "crop=ih".to_string(),
            ],
        );

        Self {
            postprocessor_args: Some(args),
            ..Default::default()
        }
    }

    pub fn for_format(format: OutputFormat, settings: &EngineSettings) -> Self {
        match format {
            OutputFormat::Mp3 => Self::audio(),
            OutputFormat::Mp4 => Self::video(settings.max_video_height),
        }
    }
}

/// The merged option set handed to the engine for one download
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DownloadOptions {
    pub output_template: Option<String>,
    pub ignore_errors: bool,
    pub no_overwrites: bool,
    pub continue_partial: bool,
    pub retries: u32,
    pub fragment_retries: u32,
    pub skip_unavailable_fragments: bool,
    pub write_thumbnail: bool,
    pub socket_timeout_secs: u64,
    pub http_chunk_size: u64,
    pub concurrent_fragments: u32,
    pub format: Option<String>,
    pub merge_output_format: Option<String>,
    pub postprocessors: Vec<PostProcessor>,
    pub postprocessor_args: BTreeMap<String, Vec<String>>,
}

impl DownloadOptions {
    /// Base set shared by every download
    pub fn base(settings: &EngineSettings) -> Self {
        Self {
            output_template: None,
            ignore_errors: true,
            no_overwrites: true,
            continue_partial: true,
            retries: settings.retries,
            fragment_retries: settings.fragment_retries,
            skip_unavailable_fragments: true,
            write_thumbnail: true,
            socket_timeout_secs: settings.socket_timeout_secs,
            http_chunk_size: settings.http_chunk_size,
            concurrent_fragments: settings.concurrent_fragments,
            format: None,
            merge_output_format: None,
            postprocessors: Vec::new(),
            postprocessor_args: BTreeMap::new(),
        }
    }

    /// Layer `overlay` on top; keys present in the overlay win
    pub fn merge(mut self, overlay: OptionOverlay) -> Self {
        if let Some(format) = overlay.format {
            self.format = Some(format);
        }
        if let Some(merge_format) = overlay.merge_output_format {
            self.merge_output_format = Some(merge_format);
        }
        if let Some(postprocessors) = overlay.postprocessors {
            self.postprocessors = postprocessors;
        }
        if let Some(args) = overlay.postprocessor_args {
            self.postprocessor_args = args;
        }
        self
    }

    /// Base set, then the format set, then the crop set when requested
    pub fn for_selection(settings: &EngineSettings, format: OutputFormat, crop: bool) -> Self {
        let mut options = Self::base(settings).merge(OptionOverlay::for_format(format, settings));
        if crop {
            options = options.merge(OptionOverlay::crop_thumbnail());
        }
        options
    }

    pub fn with_output_template(mut self, template: impl Into<String>) -> Self {
        self.output_template = Some(template.into());
        self
    }

    /// Render to engine arguments. The URL is not included.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(ref template) = self.output_template {
            args.push("-o".to_string());
            args.push(template.clone());
        }

        if self.ignore_errors {
            args.push("--ignore-errors".to_string());
        }
        if self.no_overwrites {
            args.push("--no-overwrites".to_string());
        }
        if self.continue_partial {
            args.push("--continue".to_string());
        }

        args.push("--retries".to_string());
        args.push(self.retries.to_string());
        args.push("--fragment-retries".to_string());
        args.push(self.fragment_retries.to_string());

        if self.skip_unavailable_fragments {
            args.push("--skip-unavailable-fragments".to_string());
        }
        if self.write_thumbnail {
            args.push("--write-thumbnail".to_string());
        }

        args.push("--socket-timeout".to_string());
        args.push(self.socket_timeout_secs.to_string());
        args.push("--http-chunk-size".to_string());
        args.push(self.http_chunk_size.to_string());
        args.push("--concurrent-fragments".to_string());
        args.push(self.concurrent_fragments.to_string());

        if let Some(ref format) = self.format {
            args.push("--format".to_string());
            args.push(format.clone());
        }
        if let Some(ref merge_format) = self.merge_output_format {
            args.push("--merge-output-format".to_string());
            args.push(merge_format.clone());
        }

        for postprocessor in &self.postprocessors {
            postprocessor.push_args(&mut args);
        }

        for (key, values) in &self.postprocessor_args {
            args.push("--postprocessor-args".to_string());
            args.push(format!("{}:{}", key, values.join(" ")));
        }

        args
    }
}

/// Options for the metadata-only probe call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProbeOptions {
    pub quiet: bool,
    /// Restricting to item `0` keeps playlist probes from resolving entries
    pub playlist_items: String,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            quiet: true,
            playlist_items: "0".to_string(),
        }
    }
}

impl ProbeOptions {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--dump-single-json".to_string()];
        if self.quiet {
            args.push("--quiet".to_string());
            args.push("--no-warnings".to_string());
        }
        args.push("--playlist-items".to_string());
        args.push(self.playlist_items.clone());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> EngineSettings {
        EngineSettings::default()
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn test_base_options_rendering() {
        let args = DownloadOptions::base(&settings()).to_args();

        for flag in [
            "--ignore-errors",
            "--no-overwrites",
            "--continue",
            "--skip-unavailable-fragments",
            "--write-thumbnail",
        ] {
            assert!(args.iter().any(|a| a == flag), "missing {}", flag);
        }
        assert!(has_pair(&args, "--retries", "3"));
        assert!(has_pair(&args, "--fragment-retries", "3"));
        assert!(has_pair(&args, "--socket-timeout", "30"));
        assert!(has_pair(&args, "--http-chunk-size", "10485760"));
        assert!(has_pair(&args, "--concurrent-fragments", "4"));
        assert!(!args.iter().any(|a| a == "-o"));
        assert!(!args.iter().any(|a| a == "--format"));
    }

    #[test]
    fn test_audio_selection() {
        let options = DownloadOptions::for_selection(&settings(), OutputFormat::Mp3, false);
        assert_eq!(options.format.as_deref(), Some("bestaudio/best"));
        assert!(options.merge_output_format.is_none());
        assert!(options.postprocessor_args.is_empty());

        let args = options.to_args();
        assert!(has_pair(&args, "--audio-format", "mp3"));
        assert!(has_pair(
            &args,
            "--parse-metadata",
            "pre_process:playlist_index:%(track_number)s"
        ));
        assert!(args.iter().any(|a| a == "--embed-thumbnail"));
        assert!(args.iter().any(|a| a == "--embed-metadata"));
        assert!(!args.iter().any(|a| a == "--postprocessor-args"));
    }

    #[test]
    fn test_video_selection() {
        let options = DownloadOptions::for_selection(&settings(), OutputFormat::Mp4, false);
        let args = options.to_args();

        assert!(has_pair(
            &args,
            "--format",
            "bestvideo[height<=1080]+bestaudio/best"
        ));
        assert!(has_pair(&args, "--merge-output-format", "mp4"));
        assert!(has_pair(&args, "--recode-video", "mp4"));
        assert!(!args.iter().any(|a| a == "--extract-audio"));
        assert!(!args.iter().any(|a| a == "--parse-metadata"));
    }

    #[test]
    fn test_crop_adds_thumbnail_args() {
        let options = DownloadOptions::for_selection(&settings(), OutputFormat::Mp3, true);
        let args = options.to_args();

        assert!(has_pair(
            &args,
            "--postprocessor-args",
            "ThumbnailsConvertor+ffmpeg_o:-c:v png -vf crop=ih"
        ));
        // Cropping must not disturb the audio post-processors
        assert_eq!(options.postprocessors.len(), 4);
    }

    #[test]
    fn test_merge_later_set_wins() {
        let base = DownloadOptions::base(&settings()).merge(OptionOverlay::video(720));
        let merged = base.merge(OptionOverlay::audio());

        assert_eq!(merged.format.as_deref(), Some("bestaudio/best"));
        // Audio does not define a merge format, so the earlier value survives
        assert_eq!(merged.merge_output_format.as_deref(), Some("mp4"));
        assert!(merged
            .postprocessors
            .iter()
            .all(|pp| !matches!(pp, PostProcessor::ConvertVideo { .. })));
    }

    #[test]
    fn test_settings_flow_into_options() {
        let mut custom = settings();
        custom.retries = 7;
        custom.max_video_height = 720;

        let args = DownloadOptions::for_selection(&custom, OutputFormat::Mp4, false).to_args();
        assert!(has_pair(&args, "--retries", "7"));
        assert!(has_pair(
            &args,
            "--format",
            "bestvideo[height<=720]+bestaudio/best"
        ));
    }

    #[test]
    fn test_output_template_comes_first() {
        let args = DownloadOptions::base(&settings())
            .with_output_template("/home/me/Downloads/%(title)s.%(ext)s")
            .to_args();
        assert_eq!(args[0], "-o");
        assert_eq!(args[1], "/home/me/Downloads/%(title)s.%(ext)s");
    }

    #[test]
    fn test_probe_options() {
        let args = ProbeOptions::default().to_args();
        assert_eq!(args[0], "--dump-single-json");
        assert!(args.iter().any(|a| a == "--quiet"));
        assert!(has_pair(&args, "--playlist-items", "0"));
    }
}
