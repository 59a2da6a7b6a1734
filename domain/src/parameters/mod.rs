//! Flat parameters as supplied by a parameter source, and their validation.

pub mod keys;
mod map;
mod validated;
pub mod validation;
mod value;

pub use keys::{EXPERIMENT_DIR, ParameterKeyInfo, Requirement, known_keys, lookup_key};
pub use map::ParameterMap;
pub use validated::PipelineParams;
pub use value::ParamValue;

