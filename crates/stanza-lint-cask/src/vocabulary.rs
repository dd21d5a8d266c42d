//! Cask stanza vocabulary.
//!
//! Stanzas listed in one entry of [`STANZA_GROUPS`] belong together and are
//! written without blank lines between them. The `on_*` system blocks form
//! one more group and are the conditional dispatchers.

use std::collections::{HashMap, HashSet};

use stanza_lint_core::{GroupKey, Vocabulary};

/// Stanza groups in canonical order.
pub const STANZA_GROUPS: &[&[&str]] = &[
    &["arch", "on_arch_conditional", "os"],
    &["version", "sha256"],
    &["language"],
    &["url", "appcast", "name", "desc", "homepage"],
    &["livecheck"],
    &["deprecate!", "disable!"],
    &["auto_updates", "conflicts_with", "depends_on", "container"],
    &[
        "suite",
        "app",
        "pkg",
        "installer",
        "binary",
        "bash_completion",
        "fish_completion",
        "zsh_completion",
        "generate_completions_from_executable",
        "manpage",
        "colorpicker",
        "dictionary",
        "font",
        "input_method",
        "internet_plugin",
        "keyboard_layout",
        "prefpane",
        "qlplugin",
        "mdimporter",
        "screen_saver",
        "service",
        "audio_unit_plugin",
        "vst_plugin",
        "vst3_plugin",
        "artifact",
        "stage_only",
    ],
    &["preflight"],
    &["postflight"],
    &["uninstall_preflight"],
    &["uninstall_postflight"],
    &["uninstall"],
    &["zap"],
    &["caveats"],
];

/// Built-in system-conditional blocks.
pub const ON_SYSTEM_METHODS: &[&str] = &[
    "on_arm",
    "on_intel",
    "on_linux",
    "on_macos",
    "on_tahoe",
    "on_sequoia",
    "on_sonoma",
    "on_ventura",
    "on_monterey",
    "on_big_sur",
    "on_catalina",
    "on_mojave",
    "on_high_sierra",
    "on_sierra",
    "on_el_capitan",
];

/// Group shared by all conditional dispatchers.
#[allow(clippy::cast_possible_truncation)]
pub const ON_SYSTEM_GROUP: GroupKey = GroupKey::new(STANZA_GROUPS.len() as u16);

/// Vocabulary of cask files.
#[derive(Debug, Clone)]
pub struct CaskVocabulary {
    groups: HashMap<&'static str, GroupKey>,
    dispatchers: HashSet<String>,
}

impl CaskVocabulary {
    /// Creates the built-in vocabulary.
    #[must_use]
    pub fn new() -> Self {
        let groups = STANZA_GROUPS
            .iter()
            .zip(0u16..)
            .flat_map(|(stanzas, id)| stanzas.iter().map(move |s| (*s, GroupKey::new(id))))
            .collect();

        Self {
            groups,
            dispatchers: ON_SYSTEM_METHODS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Adds dispatcher kinds on top of [`ON_SYSTEM_METHODS`].
    #[must_use]
    pub fn with_extra_dispatchers<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatchers.extend(extra.into_iter().map(Into::into));
        self
    }

    /// Returns the dispatcher kinds, sorted.
    #[must_use]
    pub fn dispatchers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.dispatchers.iter().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

impl Default for CaskVocabulary {
    fn default() -> Self {
        Self::new()
    }
}

impl Vocabulary for CaskVocabulary {
    fn group_of(&self, kind: &str) -> Option<GroupKey> {
        self.groups.get(kind).copied().or_else(|| {
            self.dispatchers
                .contains(kind)
                .then_some(ON_SYSTEM_GROUP)
        })
    }

    fn is_conditional_dispatcher(&self, kind: &str) -> bool {
        self.dispatchers.contains(kind)
    }
}
