//! Download orchestration
//!
//! One call to [`Downloader::download`] builds the option set for the user's
//! selection, picks the output template from the URL shape, probes the URL,
//! runs the real download and prints the summary.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::config::EngineSettings;
use crate::core::engine::MediaEngine;
use crate::core::models::{AppResult, DownloadReport, OutputFormat, Selection};
use crate::core::options::DownloadOptions;
use crate::core::{output, summary};
use crate::utils::validation::normalize_url;

pub struct Downloader<E> {
    engine: E,
    settings: EngineSettings,
    save_path: PathBuf,
}

impl<E: MediaEngine> Downloader<E> {
    pub fn new(engine: E, settings: EngineSettings, save_path: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            settings,
            save_path: save_path.into(),
        }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Download one selection, writing status lines to `out`.
    ///
    /// Returns `Ok(None)` when the URL is rejected by the probe; the caller
    /// should simply move on to the next prompt.
    pub async fn download<W: Write>(
        &self,
        selection: &Selection,
        out: &mut W,
    ) -> AppResult<Option<DownloadReport>> {
        let Selection { url, format, crop } = selection;
        let (format, crop) = (*format, *crop);

        let url = match normalize_url(url) {
            Ok(url) => url,
            Err(e) => {
                debug!("Rejected input before probing: {}", e);
                writeln!(out, "{}", summary::probe_error())?;
                return Ok(None);
            }
        };

        let playlist = output::is_playlist_url(&url);
        let options = self
            .options_for(format, crop)
            .with_output_template(output::output_template(&self.save_path, playlist));

        let info = match self.engine.probe(&url).await {
            Ok(info) => info,
            Err(e) => {
                warn!("Probe failed for {}: {}", url, e);
                writeln!(out, "{}", summary::probe_error())?;
                return Ok(None);
            }
        };

        let title = info.display_title(&url);
        writeln!(out, "{}", summary::attempt(&title, format))?;
        out.flush()?;

        let exit = self.engine.download(&url, &options).await?;
        info!("Finished {} with {:?}", url, exit);

        let report = DownloadReport {
            saved_into: output::saved_location(&self.save_path, &title, format, playlist),
            title,
            uploader: info.uploader,
            item_count: info.playlist_count,
            format,
            crop,
            playlist,
            exit,
        };

        for line in summary::summary_lines(&report) {
            writeln!(out, "{}", line)?;
        }

        Ok(Some(report))
    }

    /// Option set for a selection, without the output template
    pub fn options_for(&self, format: OutputFormat, crop: bool) -> DownloadOptions {
        DownloadOptions::for_selection(&self.settings, format, crop && format.is_audio())
    }
}
