//! Application layer for segpipe
//!
//! This crate contains the assembly use case, its port definitions, and
//! the options a host passes in. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::AssemblyOptions;
pub use ports::parameter_source::{ParameterSource, ParameterSourceError, StaticParameterSource};
pub use use_cases::assemble_pipeline::{
    AssemblePipelineError, AssemblePipelineOutput, AssemblePipelineUseCase,
};
