//! Infrastructure layer for segpipe
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: parameter file and environment loading.

pub mod config;

// Re-export commonly used types
pub use config::{FileOutputConfig, FileParameters, ParameterFileLoader};
