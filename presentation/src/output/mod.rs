//! Rendering of assembled configurations

pub mod console;
pub mod formatter;
