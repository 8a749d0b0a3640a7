//! CLI library components for formnav.

pub mod commands;
pub mod logging;
pub mod types;
