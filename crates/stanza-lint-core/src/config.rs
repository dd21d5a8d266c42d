//! The `stanza-lint.toml` model.
//!
//! ```toml
//! [analyzer]
//! exclude = ["**/vendor/**"]
//!
//! [vocabulary]
//! extra_dispatchers = ["on_freebsd"]
//!
//! [rules.stanza-grouping]
//! severity = "warning"
//! allow_comments = false
//! ```
//!
//! Unknown top-level sections and unknown `[analyzer]` / `[vocabulary]` keys
//! are rejected. Rule sections accept any extra key as a rule option.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Severity;

/// Parsed `stanza-lint.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// File discovery settings.
    pub analyzer: AnalyzerConfig,
    /// Additions to the built-in stanza vocabulary.
    pub vocabulary: VocabularyConfig,
    /// `[rules.<name>]` sections keyed by rule name.
    pub rules: BTreeMap<String, RuleConfig>,
}

impl Config {
    /// Creates the built-in configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Config::parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parses and validates TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown sections
    /// and [`ConfigError::InvalidDispatcher`] for a bad dispatcher name.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.vocabulary.validate()?;
        Ok(config)
    }

    /// Section of the rule called `name`, if present.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&RuleConfig> {
        self.rules.get(name)
    }

    /// A rule runs unless its section says `enabled = false`.
    #[must_use]
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.rule(name).and_then(|rule| rule.enabled) != Some(false)
    }

    /// Severity forced on every violation of the rule called `name`.
    #[must_use]
    pub fn rule_severity(&self, name: &str) -> Option<Severity> {
        self.rule(name).and_then(|rule| rule.severity)
    }
}

/// `[analyzer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Directory scanned when no path is given.
    pub root: PathBuf,
    /// Glob patterns of paths to skip.
    pub exclude: Vec<String>,
    /// Skip files ignored by git.
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: vec!["**/vendor/**".to_string()],
            respect_gitignore: true,
        }
    }
}

/// `[vocabulary]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Extra `on_*` calls whose block body is checked as its own sequence.
    pub extra_dispatchers: Vec<String>,
}

impl VocabularyConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.extra_dispatchers.iter().find(|name| !is_dispatcher_name(name)) {
            Some(name) => Err(ConfigError::InvalidDispatcher { name: name.clone() }),
            None => Ok(()),
        }
    }
}

/// `on_` followed by a lowercase Ruby method name.
fn is_dispatcher_name(name: &str) -> bool {
    name.strip_prefix("on_").is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    })
}

/// `[rules.<name>]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// `enabled = false` turns the rule off.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Replaces the rule's own severity.
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Every other key, passed to the rule.
    #[serde(flatten)]
    pub options: BTreeMap<String, toml::Value>,
}

impl RuleConfig {
    /// Boolean option `key`. Absent or non-boolean values give `None`.
    #[must_use]
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(toml::Value::as_bool)
    }
}

/// Errors loading `stanza-lint.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML or an unknown section or key.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// An `extra_dispatchers` entry is not an `on_*` name.
    #[error("`{name}` is not a dispatcher name; expected `on_<name>`")]
    InvalidDispatcher {
        /// Offending entry.
        name: String,
    },
}
