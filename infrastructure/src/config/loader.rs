//! Parameter file loader with multi-source merging

use super::file_config::FileParameters;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use segpipe_application::ports::parameter_source::{ParameterSource, ParameterSourceError};
use segpipe_domain::{ParamValue, ParameterMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level file names, checked in order.
const PROJECT_FILES: [&str; 2] = ["pipeline.toml", ".pipeline.toml"];

/// Default environment prefix; `__` separates nesting levels.
const ENV_PREFIX: &str = "SEGPIPE_";

/// Environment keys (after the prefix) that carry pipeline parameters.
const ENV_PARAMETERS: &str = "parameters__";

/// Loads pipeline parameters from files and the environment.
///
/// Files only contribute their `[parameters]` and `[output]` tables. With
/// [`ParameterFileLoader::defaults_only`] no file is read but environment
/// variables still apply.
#[derive(Debug, Clone)]
pub struct ParameterFileLoader {
    config_path: Option<PathBuf>,
    global_path: Option<PathBuf>,
    project_dir: PathBuf,
    env_prefix: String,
    skip_files: bool,
}

impl Default for ParameterFileLoader {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ParameterFileLoader {
    /// Loader using the standard search locations plus an optional explicit file
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            config_path,
            global_path: Self::global_config_path(),
            project_dir: PathBuf::from("."),
            env_prefix: ENV_PREFIX.to_string(),
            skip_files: false,
        }
    }

    /// Loader that ignores every parameter file (for --no-config)
    pub fn defaults_only() -> Self {
        Self {
            skip_files: true,
            ..Self::new(None)
        }
    }

    /// Replace (or disable, with `None`) the global file location
    pub fn with_global_path(mut self, path: Option<PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    /// Directory searched for `pipeline.toml` / `.pipeline.toml`
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Prefix for environment overrides, `SEGPIPE_` unless replaced
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load the merged file contents from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `SEGPIPE_PARAMETERS__<KEY>`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./pipeline.toml` or `./.pipeline.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/segpipe/parameters.toml`
    /// 5. Default values
    pub fn load_file_parameters(&self) -> Result<FileParameters, ParameterSourceError> {
        if !self.skip_files
            && let Some(path) = &self.config_path
            && !path.exists()
        {
            return Err(ParameterSourceError::load(
                path.display().to_string(),
                "file not found",
            ));
        }

        let mut file: FileParameters = self
            .figment()
            .extract()
            .map_err(|e| ParameterSourceError::load(self.describe(), e))?;
        file.parameters.merge(self.env_parameters());
        Ok(file)
    }

    fn figment(&self) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileParameters::default()));

        if !self.skip_files {
            for path in self.existing_files() {
                debug!("Merging parameter file {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment.merge(
            Env::prefixed(&self.env_prefix)
                .filter(|key| !key.as_str().to_ascii_lowercase().starts_with(ENV_PARAMETERS))
                .split("__"),
        )
    }

    /// `<prefix>PARAMETERS__<KEY>` values, typed like `--set` literals so a
    /// quoted value such as `"34"` stays a string.
    fn env_parameters(&self) -> ParameterMap {
        Env::prefixed(&self.env_prefix)
            .iter()
            .filter_map(|(key, value)| {
                let key = key.as_str().to_ascii_lowercase();
                key.strip_prefix(ENV_PARAMETERS)
                    .map(|name| (name.to_string(), ParamValue::parse_literal(&value)))
            })
            .collect()
    }

    /// Files that will be merged, lowest priority first
    fn existing_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if let Some(global) = &self.global_path
            && global.exists()
        {
            files.push(global.clone());
        }
        if let Some(project) = Self::find_project_file(&self.project_dir) {
            files.push(project);
        }
        if let Some(path) = &self.config_path {
            files.push(path.clone());
        }
        files
    }

    /// Get the global parameter file path
    ///
    /// Returns XDG_CONFIG_HOME/segpipe/parameters.toml if set,
    /// otherwise falls back to ~/.config/segpipe/parameters.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("segpipe").join("parameters.toml"))
    }

    fn find_project_file(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the parameter file locations being used (for debugging)
    pub fn print_config_sources(&self) {
        println!("Parameter sources (in priority order):");
        println!("  [     ] Env:      {}PARAMETERS__<KEY>", self.env_prefix);

        match &self.config_path {
            Some(path) if path.exists() => println!("  [FOUND] Explicit: {}", path.display()),
            Some(path) => println!("  [MISS ] Explicit: {}", path.display()),
            None => {}
        }

        if let Some(path) = Self::find_project_file(&self.project_dir) {
            println!("  [FOUND] Project:  {}", path.display());
        } else {
            println!("  [     ] Project:  ./pipeline.toml or ./.pipeline.toml");
        }

        if let Some(path) = &self.global_path {
            if path.exists() {
                println!("  [FOUND] Global:   {}", path.display());
            } else {
                println!("  [     ] Global:   {}", path.display());
            }
        }

        println!("  [     ] Default:  no parameters");
        if self.skip_files {
            println!("  (parameter files ignored: --no-config)");
        }
    }
}

impl ParameterSource for ParameterFileLoader {
    fn load(&self) -> Result<ParameterMap, ParameterSourceError> {
        self.load_file_parameters().map(|file| file.parameters)
    }

    fn describe(&self) -> String {
        let mut sources: Vec<String> = if self.skip_files {
            Vec::new()
        } else {
            self.existing_files()
                .iter()
                .map(|p| p.display().to_string())
                .collect()
        };
        sources.push("environment".to_string());
        sources.join(" + ")
    }
}
