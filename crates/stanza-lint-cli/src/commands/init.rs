//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# stanza-lint configuration

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./Casks"

# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
]

# Respect .gitignore files
respect_gitignore = true

[vocabulary]
# Additional `on_*` blocks whose bodies are checked as their own sequence
# extra_dispatchers = ["on_freebsd"]

[rules.stanza-grouping]
enabled = true
# severity = "warning"  # Override default severity
allow_comments = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("stanza-lint.toml"), force)?;

    println!("Created stanza-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit stanza-lint.toml to configure rules");
    println!("  2. Run: stanza-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
