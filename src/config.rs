use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const LOCAL_CONFIG: &str = "prebuild.toml";

/// Paths and labels used by the stamper, loaded from `prebuild.toml`.
///
/// Every field defaults to the layout of a Ruby source checkout, so an
/// absent config file reproduces the stock behaviour.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StamperConfig {
    /// Subdirectory of the project root holding the Ruby sources.
    pub source_dir: PathBuf,
    /// Generated header, relative to `source_dir`.
    pub header: PathBuf,
    pub version_file: PathBuf,
    /// Consulted when `version_file` has no usable RUBY_VERSION.
    pub api_version_file: PathBuf,
    /// Branch label used for detached heads.
    pub trunk: String,
    pub product: String,
    pub ci: CiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CiConfig {
    pub env_var: String,
    pub program: String,
}

impl Default for StamperConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("ruby"),
            header: PathBuf::from("revision.h"),
            version_file: PathBuf::from("version.h"),
            api_version_file: PathBuf::from("include/ruby/version.h"),
            trunk: "trunk".into(),
            product: "ruby".into(),
            ci: CiConfig::default(),
        }
    }
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            env_var: "APPVEYOR".into(),
            program: "appveyor".into(),
        }
    }
}

impl StamperConfig {
    /// Load config: explicit path, then `<root>/prebuild.toml`, then the
    /// user config dir. Falls back to defaults when nothing is found.
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        for candidate in Self::candidates(root) {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: StamperConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    fn candidates(root: &Path) -> Vec<PathBuf> {
        let mut paths = vec![root.join(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("ruby-prebuild").join("config.toml"));
        }
        paths
    }

    /// Resolve the source directory against the project root.
    pub fn source_root(&self, root: &Path) -> PathBuf {
        root.join(&self.source_dir)
    }
}
