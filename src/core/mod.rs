//! Core business logic module
//!
//! Option building, output paths, the engine seam and the download
//! orchestration that ties them together.

pub mod config;
pub mod downloader;
pub mod engine;
pub mod models;
pub mod options;
pub mod output;
pub mod summary;


// Re-export commonly used types
pub use config::AppConfig;
pub use downloader::Downloader;
pub use engine::YtDlpEngine;
