//! Command handlers
//!
//! The interactive prompt loop that drives the downloader.

pub mod interactive;
