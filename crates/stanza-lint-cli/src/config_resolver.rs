//! Locates the configuration for a run.
//!
//! The first match wins:
//!
//! 1. the `--config` path;
//! 2. `stanza-lint.toml` or `.stanza-lint.toml` in the checked directory or
//!    one of its ancestors, up to the repository root (the first directory
//!    holding `.git`), so `check Casks/f/foo.rb` picks up the tap's file;
//! 3. `config.toml` in `$STANZA_LINT_CONFIG_DIR` or `~/.stanza-lint/`.
//!
//! Otherwise the built-in defaults apply.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use stanza_lint_core::Config;

/// Repository-level file names, in lookup order.
const REPOSITORY_CONFIG_NAMES: &[&str] = &["stanza-lint.toml", ".stanza-lint.toml"];

/// File name inside the user config directory.
const USER_CONFIG_NAME: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Flag(PathBuf),
    /// Found next to the checked path or above it.
    Repository(PathBuf),
    /// Per-user fallback.
    User(PathBuf),
    /// Nothing found.
    Builtin,
}

impl ConfigSource {
    /// File backing this source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Flag(p) | Self::Repository(p) | Self::User(p) => Some(p),
            Self::Builtin => None,
        }
    }

    /// Reads the configuration. A missing `--config` file is an error.
    pub fn load(&self) -> Result<Config> {
        tracing::info!("Configuration: {self}");
        match self.path() {
            Some(path) => Config::load(path).with_context(|| format!("Invalid configuration {self}")),
            None => Ok(Config::default()),
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(p) => write!(f, "{} (--config)", p.display()),
            Self::Repository(p) => write!(f, "{}", p.display()),
            Self::User(p) => write!(f, "{} (user)", p.display()),
            Self::Builtin => f.write_str("built-in defaults"),
        }
    }
}

/// Finds the [`ConfigSource`] for a checked path.
#[derive(Debug, Clone)]
pub struct ConfigLocator {
    explicit: Option<PathBuf>,
    user_dir: Option<PathBuf>,
}

impl ConfigLocator {
    /// Locator honoring `--config` and the user config directory.
    #[must_use]
    pub fn new(explicit: Option<&Path>) -> Self {
        Self {
            explicit: explicit.map(Path::to_path_buf),
            user_dir: user_config_dir(),
        }
    }

    #[cfg(test)]
    fn with_user_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_dir = dir;
        self
    }

    /// Source for a run over `target`, a cask file or a directory.
    #[must_use]
    pub fn locate(&self, target: &Path) -> ConfigSource {
        if let Some(path) = &self.explicit {
            return ConfigSource::Flag(path.clone());
        }

        if let Some(path) = Self::search_repository(target) {
            tracing::debug!("Found repository config: {}", path.display());
            return ConfigSource::Repository(path);
        }

        self.user_dir
            .as_ref()
            .map(|dir| dir.join(USER_CONFIG_NAME))
            .filter(|path| path.is_file())
            .map_or(ConfigSource::Builtin, ConfigSource::User)
    }

    fn search_repository(target: &Path) -> Option<PathBuf> {
        let start = if target.is_file() {
            target.parent().unwrap_or(target)
        } else {
            target
        };
        let start = std::fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());

        for dir in start.ancestors() {
            let found = REPOSITORY_CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file());
            if found.is_some() {
                return found;
            }
            if dir.join(".git").exists() {
                break;
            }
        }

        None
    }
}

/// `$STANZA_LINT_CONFIG_DIR`, else `~/.stanza-lint/`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os("STANZA_LINT_CONFIG_DIR") {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|home| home.join(".stanza-lint")),
    }
}
