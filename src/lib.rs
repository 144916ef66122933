//! Ant's YouTube Downloader - Core Library
//!
//! Builds yt-dlp option sets for audio or video downloads, runs the engine
//! and prints a summary. The binary wraps this in an interactive prompt loop.

pub mod commands;
pub mod core;
pub mod utils;

// Re-export commonly used types
pub use core::{
    config::AppConfig,
    downloader::Downloader,
    engine::{MediaEngine, YtDlpEngine},
    models::{AppError, AppResult, MediaInfo, OutputFormat, Selection},
    options::DownloadOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "ant-downloader");
    }
}
