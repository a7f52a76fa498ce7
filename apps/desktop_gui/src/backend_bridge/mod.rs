//! Worker thread bridging the UI command queue to the envelope REST API.

pub mod commands;
pub mod runtime;
