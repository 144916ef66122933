//! Console status lines
//!
//! Colours come from `console::style`, which drops the escape codes when the
//! terminal does not support them or colours were disabled globally.

use console::style;

use crate::core::models::{DownloadReport, EngineExit, OutputFormat};

const RULE: &str = "-----------------------------------";

pub fn banner() -> String {
    format!(
        "{}\n{}\n{}\n",
        style(RULE).green(),
        style("---- Ant's YouTube Downloader -----").green(),
        style(RULE).green()
    )
}

pub fn url_prompt() -> String {
    format!(
        "[{}] Paste the link here (Supports playlists)",
        style("?").yellow()
    )
}

pub fn probe_error() -> String {
    format!(
        "{}Make sure the provided URL is correct then try again\n",
        style("ERROR: ").red()
    )
}

pub fn attempt(title: &str, format: OutputFormat) -> String {
    format!(
        "[info] Attempting to download \"{}\" in {}",
        style(title).blue(),
        style(format).yellow()
    )
}

pub fn engine_warning(exit: EngineExit) -> Option<String> {
    if exit.is_success() {
        return None;
    }

    let code = exit
        .code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "signal".to_string());
    Some(format!(
        "{} Some items could not be downloaded (engine exit: {})",
        style("[warning]").yellow(),
        code
    ))
}

/// Post-download summary, one entry per printed line
pub fn summary_lines(report: &DownloadReport) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(warning) = engine_warning(report.exit) {
        lines.push(warning);
    }

    lines.push(format!("{}Download complete !", style("[success] ").green()));

    let mut downloaded = format!("[summary] Downloaded {}", style(&report.title).blue());
    if let Some(count) = report.item_count {
        downloaded.push_str(&format!(" ({} items)", count));
    }
    lines.push(downloaded);

    if let Some(ref uploader) = report.uploader {
        lines.push(format!("[summary] By {}", style(uploader).cyan()));
    }

    lines.push(format!("[summary] In format {}", style(report.format).yellow()));

    if report.format.is_audio() {
        let state = if report.crop {
            style("enabled").green()
        } else {
            style("disabled").red()
        };
        lines.push(format!("[summary] With thumbnail cropping {}", state));
    }

    lines.push("[summary] Saved into :".to_string());
    lines.push(format!("{}\n", report.saved_into.display()));
    lines
}

pub fn farewell() -> String {
    "\n[system] Have a fantastic day !\n".to_string()
}

pub fn force_quit() -> String {
    "\n[system] User prompted force-quit !\n".to_string()
}
