//! Interactive session
//!
//! Prompts for a link, an output format and (for audio) the thumbnail crop,
//! runs the download, then asks whether to continue. Any prompt failure is
//! treated as the user bailing out.

use async_trait::async_trait;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::io::Write;
use tracing::{debug, error};

use crate::core::downloader::Downloader;
use crate::core::engine::MediaEngine;
use crate::core::models::{AppError, AppResult, OutputFormat, Selection};
use crate::core::summary;

/// Source of the user's answers
#[async_trait]
pub trait Prompter: Send {
    async fn url(&mut self) -> AppResult<String>;

    async fn format(&mut self) -> AppResult<OutputFormat>;

    async fn crop(&mut self) -> AppResult<bool>;

    async fn keep_going(&mut self) -> AppResult<bool>;
}

/// Terminal prompts. Each prompt runs on the blocking pool so a Ctrl-C
/// listener on the runtime can still fire while it waits for input.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

async fn blocking<T, F>(prompt: F) -> AppResult<T>
where
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| AppError::Prompt(format!("Prompt task failed: {}", e)))?
        .map_err(AppError::from)
}

#[async_trait]
impl Prompter for DialoguerPrompter {
    async fn url(&mut self) -> AppResult<String> {
        blocking(|| {
            Input::<String>::new()
                .with_prompt(summary::url_prompt())
                .allow_empty(true)
                .interact_text()
        })
        .await
    }

    async fn format(&mut self) -> AppResult<OutputFormat> {
        let index = blocking(|| {
            let labels: Vec<&str> = OutputFormat::ALL.iter().map(|f| f.label()).collect();
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Select the output format")
                .items(&labels)
                .default(0)
                .interact()
        })
        .await?;

        OutputFormat::ALL
            .get(index)
            .copied()
            .ok_or_else(|| AppError::Prompt(format!("No format at index {}", index)))
    }

    async fn crop(&mut self) -> AppResult<bool> {
        blocking(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Crop the thumbnail into a 1:1 square ? (Perfect for music covers)")
                .default(false)
                .interact()
        })
        .await
    }

    async fn keep_going(&mut self) -> AppResult<bool> {
        blocking(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Download more videos ?")
                .default(false)
                .interact()
        })
        .await
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user answered "no" to continuing
    Declined,
    /// A prompt failed or the user pressed Ctrl-C
    Interrupted,
}

pub struct Session<E, P> {
    downloader: Downloader<E>,
    prompter: P,
}

impl<E: MediaEngine, P: Prompter> Session<E, P> {
    pub fn new(downloader: Downloader<E>, prompter: P) -> Self {
        Self {
            downloader,
            prompter,
        }
    }

    pub fn downloader(&self) -> &Downloader<E> {
        &self.downloader
    }

    /// Print the banner and loop until the user declines or bails out
    pub async fn run<W: Write>(&mut self, out: &mut W) -> SessionEnd {
        let _ = writeln!(out, "{}", summary::banner());

        loop {
            match self.step(out).await {
                Ok(true) => continue,
                Ok(false) => {
                    let _ = writeln!(out, "{}", summary::farewell());
                    return SessionEnd::Declined;
                }
                Err(e) => {
                    match e {
                        AppError::Prompt(ref reason) => debug!("Prompt aborted: {}", reason),
                        ref other => error!("Session aborted: {}", other),
                    }
                    let _ = writeln!(out, "{}", summary::force_quit());
                    return SessionEnd::Interrupted;
                }
            }
        }
    }

    /// One loop iteration; returns whether to keep going
    async fn step<W: Write>(&mut self, out: &mut W) -> AppResult<bool> {
        let mut crop = false;

        let url = self.prompter.url().await?;
        let format = self.prompter.format().await?;
        if format.is_audio() {
            crop = self.prompter.crop().await?;
        }

        let selection = Selection::new(url, format, crop);
        self.downloader.download(&selection, out).await?;

        self.prompter.keep_going().await
    }
}

/// Run a session on stdout, racing it against Ctrl-C
pub async fn run_until_interrupted<E: MediaEngine, P: Prompter>(
    session: &mut Session<E, P>,
) -> SessionEnd {
    let mut stdout = std::io::stdout();

    let end = tokio::select! {
        end = session.run(&mut stdout) => end,
        _ = tokio::signal::ctrl_c() => {
            println!("{}", summary::force_quit());
            SessionEnd::Interrupted
        }
    };

    // dialoguer hides the cursor while a list prompt is open
    let _ = console::Term::stdout().show_cursor();
    end
}
