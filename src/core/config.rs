//! Validator configuration: document paths and the asset root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional override file looked up in the working directory.
pub const CONFIG_FILE: &str = "story_validator.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Where the validator finds its inputs.
///
/// Every field is optional in the RON file; omitted ones keep the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub agents: PathBuf,
    pub story: PathBuf,
    pub puzzles: PathBuf,
    pub asset_root: PathBuf,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            agents: PathBuf::from("web/data/agents.json"),
            story: PathBuf::from("web/data/story.json"),
            puzzles: PathBuf::from("web/data/puzzles.json"),
            asset_root: PathBuf::from("web"),
        }
    }
}

impl ValidatorConfig {
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(input)?)
    }

    /// Load `dir/story_validator.ron` if it exists, else the defaults.
    /// Relative paths are resolved against `dir`.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let candidate = dir.join(CONFIG_FILE);
        let config = if candidate.is_file() {
            tracing::info!(path = %candidate.display(), "loading validator config");
            Self::load_from_ron(&candidate)?
        } else {
            Self::default()
        };
        Ok(config.rooted_at(dir))
    }

    /// Resolve relative paths against `dir`; absolute paths are kept.
    pub fn rooted_at(self, dir: &Path) -> Self {
        let root = |p: PathBuf| if p.is_absolute() { p } else { dir.join(p) };
        Self {
            agents: root(self.agents),
            story: root(self.story),
            puzzles: root(self.puzzles),
            asset_root: root(self.asset_root),
        }
    }
}
