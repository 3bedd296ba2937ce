use crate::app_dirs::AppDirs;
use crate::generator::{GeneratorKind, DEFAULT_LENGTH, DEFAULT_WEAKEST_LENGTH};
use crate::report::DEFAULT_TOP_TRIGRAMS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Length of generated exercises when none is given
    pub default_length: usize,
    /// Same for weakest-loop exercises
    pub weakest_length: usize,
    /// How many trigrams the report lists
    pub report_top: usize,
    /// Overrides the default data directory
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_length: DEFAULT_LENGTH,
            weakest_length: DEFAULT_WEAKEST_LENGTH,
            report_top: DEFAULT_TOP_TRIGRAMS,
            data_dir: None,
        }
    }
}

impl Config {
    /// Data directory: explicit override, then config, then the platform default.
    /// Length to generate for `kind` when the command line gives none.
    pub fn exercise_length(&self, kind: GeneratorKind, requested: Option<usize>) -> usize {
        requested.unwrap_or(match kind {
            GeneratorKind::Weakest => self.weakest_length,
            GeneratorKind::Markov => self.default_length,
        })
    }

    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .or_else(AppDirs::data_dir)
            .unwrap_or_else(|| PathBuf::from(".trigrind"))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("trigrind_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }
}
