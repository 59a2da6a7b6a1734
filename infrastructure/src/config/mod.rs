//! Parameter file loading for segpipe
//!
//! This module handles file I/O and merging of pipeline parameters from
//! multiple sources. The priority order (highest to lowest):
//!
//! 1. Environment: `SEGPIPE_PARAMETERS__<KEY>=<value>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./pipeline.toml` or `./.pipeline.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/segpipe/parameters.toml`
//! 5. Default values (no parameters)
//!
//! CLI `--set` overrides sit above all of these but are applied by the
//! use case, not here.

mod file_config;
mod loader;

pub use file_config::{FileOutputConfig, FileParameters};
pub use loader::ParameterFileLoader;
