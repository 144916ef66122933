//! Media engine integration
//!
//! All extraction, network transfer and conversion is delegated to the
//! yt-dlp executable. This module only runs it with the arguments produced
//! by [`DownloadOptions`] and [`ProbeOptions`].

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tracing::{debug, info, warn};

use crate::core::models::{AppError, AppResult, EngineExit, MediaInfo};
use crate::core::options::{DownloadOptions, ProbeOptions};

/// Something that can resolve and download media URLs
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Metadata-only call used to validate the URL
    async fn probe(&self, url: &str) -> AppResult<MediaInfo>;

    /// Run the real download with the given option set
    async fn download(&self, url: &str, options: &DownloadOptions) -> AppResult<EngineExit>;
}

/// yt-dlp subprocess engine
#[derive(Debug, Clone)]
pub struct YtDlpEngine {
    binary: PathBuf,
    probe_options: ProbeOptions,
}

impl YtDlpEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            probe_options: ProbeOptions::default(),
        }
    }

    pub fn binary(&self) -> &PathBuf {
        &self.binary
    }

    /// Engine version, or `None` when the binary cannot be found
    pub async fn check_available(&self) -> AppResult<Option<String>> {
        let output = tokio::process::Command::new(&self.binary)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
                debug!("Found {} version {}", self.binary.display(), version);
                Ok(Some(version))
            }
            Ok(output) => {
                warn!(
                    "{} --version exited with {:?}",
                    self.binary.display(),
                    output.status.code()
                );
                Ok(None)
            }
            Err(e) => match e.kind() {
                std::io::ErrorKind::NotFound => Ok(None),
                _ => Err(AppError::Engine(format!(
                    "Failed to check {}: {}",
                    self.binary.display(),
                    e
                ))),
            },
        }
    }
}

#[async_trait]
impl MediaEngine for YtDlpEngine {
    async fn probe(&self, url: &str) -> AppResult<MediaInfo> {
        let args = self.probe_options.to_args();
        debug!("Probing {} with {:?}", url, args);

        let output = tokio::process::Command::new(&self.binary)
            .args(&args)
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::Engine(format!("Failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Engine(format!("yt-dlp failed: {}", error.trim())));
        }

        parse_probe_output(&output.stdout)
    }

    async fn download(&self, url: &str, options: &DownloadOptions) -> AppResult<EngineExit> {
        let args = options.to_args();
        info!("Starting download of {}", url);
        debug!("Engine arguments: {:?}", args);

        // Progress output goes straight to the user's terminal
        let status = tokio::process::Command::new(&self.binary)
            .args(&args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| AppError::Engine(format!("Failed to run yt-dlp: {}", e)))?;

        if !status.success() {
            warn!("yt-dlp exited with {:?} for {}", status.code(), url);
        }

        Ok(EngineExit {
            code: status.code(),
        })
    }
}

/// Parse the single JSON document printed by a probe call
pub fn parse_probe_output(stdout: &[u8]) -> AppResult<MediaInfo> {
    let json_str = String::from_utf8_lossy(stdout);
    let json_str = json_str.trim();
    if json_str.is_empty() {
        return Err(AppError::Parse("yt-dlp returned no metadata".to_string()));
    }

    serde_json::from_str(json_str)
        .map_err(|e| AppError::Parse(format!("Failed to parse yt-dlp output: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_video() {
        let stdout = br#"{"id": "dQw4w9WgXcQ", "title": "Never Gonna Give You Up", "uploader": "Rick Astley", "ext": "webm"}
"#;
        let info = parse_probe_output(stdout).unwrap();
        assert_eq!(info.id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(info.uploader.as_deref(), Some("Rick Astley"));
        assert_eq!(info.playlist_count, None);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_probe_output(b"ERROR: Unsupported URL"),
            Err(AppError::Parse(_))
        ));
        assert!(matches!(parse_probe_output(b"  \n"), Err(AppError::Parse(_))));
    }

    #[tokio::test]
    async fn test_missing_binary_is_unavailable() {
        let engine = YtDlpEngine::new("definitely-not-a-real-yt-dlp-binary");
        let version = engine.check_available().await.unwrap();
        assert!(version.is_none());
    }

    #[tokio::test]
    async fn test_probe_with_missing_binary_fails() {
        let engine = YtDlpEngine::new("definitely-not-a-real-yt-dlp-binary");
        let result = engine.probe("https://youtu.be/dQw4w9WgXcQ").await;
        assert!(matches!(result, Err(AppError::Engine(_))));
    }
}
