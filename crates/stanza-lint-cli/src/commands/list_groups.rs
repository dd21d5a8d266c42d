//! List groups command implementation.

use anyhow::Result;
use stanza_lint_cask::{CaskVocabulary, STANZA_GROUPS};

use crate::config_resolver::ConfigSource;

/// Runs the list-groups command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let config = source.load()?;
    let vocabulary =
        CaskVocabulary::new().with_extra_dispatchers(config.vocabulary.extra_dispatchers);

    println!("Stanza groups (one empty line between groups, none inside):\n");
    for (index, group) in STANZA_GROUPS.iter().enumerate() {
        println!("{:>3}  {}", index + 1, group.join(", "));
    }

    println!(
        "{:>3}  {}  (conditional blocks, checked separately)",
        STANZA_GROUPS.len() + 1,
        vocabulary.dispatchers().join(", ")
    );

    Ok(())
}
