//! Domain layer for segpipe
//!
//! This crate contains the pipeline configuration model and its assembler.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Parameters
//!
//! A [`ParameterMap`] is the flat, loosely typed input: hyperparameters,
//! paths and flags keyed by name. [`PipelineParams`] is the same data after
//! validation, strongly typed.
//!
//! ## Pipeline Configuration
//!
//! A [`PipelineConfig`] is the nested, namespaced output handed to each
//! pipeline stage (loader, U-Net training loop, TTA, post-processing).
//! It is built once by [`assemble`] and never mutated.

pub mod config;
pub mod core;
#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
pub mod parameters;
pub mod pipeline;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::error::ConfigError;
pub use parameters::{
    ParamValue, ParameterMap, PipelineParams,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use pipeline::{PipelineConfig, assemble, checkpoint_path};
