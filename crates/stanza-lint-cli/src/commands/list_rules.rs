//! List rules command implementation.

use stanza_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<18} {:<8} Description", "Code", "Name", "Fixable");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<8} {:<18} {:<8} {}",
            rule.code(),
            rule.name(),
            if rule.is_fixable() { "yes" } else { "no" },
            rule.description()
        );
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  stanza-lint check --rules stanza-grouping");
    println!("  stanza-lint check --rules SL001");
}
