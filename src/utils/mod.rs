//! Utility modules and helper functions
//!
//! This module contains shared utilities used across the application.

pub mod logging;
pub mod validation;
