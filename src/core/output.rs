//! Destination paths and engine output templates

use std::path::{Path, PathBuf};

use crate::core::models::{AppError, AppResult, OutputFormat};

/// Resolve the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| AppError::Config("Could not determine the home directory".to_string()))
}

/// `home / output_dir`; an absolute `output_dir` is used as is
pub fn save_path(home: &Path, output_dir: &str) -> PathBuf {
    home.join(output_dir)
}

/// Playlist URLs get their own folder and indexed file names
pub fn is_playlist_url(url: &str) -> bool {
    url.contains("list")
}

/// Engine output template for a download into `save_path`
pub fn output_template(save_path: &Path, playlist: bool) -> String {
    let template = if playlist {
        save_path
            .join("%(playlist)s")
            .join("%(playlist_index)03d - %(title)s.%(ext)s")
    } else {
        save_path.join("%(title)s.%(ext)s")
    };
    template.to_string_lossy().into_owned()
}

/// Where the summary says the result landed
pub fn saved_location(
    save_path: &Path,
    title: &str,
    format: OutputFormat,
    playlist: bool,
) -> PathBuf {
    if playlist {
        save_path.join(title)
    } else {
        save_path.join(format!("{}.{}", title, format.as_str()))
    }
}
