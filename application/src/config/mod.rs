//! Application-level configuration.
//!
//! - [`AssemblyOptions`] - Per-run options supplied by the host

pub mod assembly_options;

pub use assembly_options::AssemblyOptions;
