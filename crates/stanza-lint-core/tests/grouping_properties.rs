//! Property tests for the grouping detector and edit planner.
//!
//! Sources are generated as one statement per line, named by its group
//! (`g0`, `g1`, `g2`), with at most one blank line between statements.

use proptest::prelude::*;
use stanza_lint_core::edits::plan_edit;
use stanza_lint_core::fixes::apply_edits;
use stanza_lint_core::grouping::{classify, detect, LineOps, Origin, SpacingKind};
use stanza_lint_core::{GroupKey, SourceText, Span, Statement};

fn render(items: &[(u16, bool)]) -> String {
    let mut text = String::new();
    for (idx, (group, blank_after)) in items.iter().enumerate() {
        text.push_str(&format!("g{group}\n"));
        if *blank_after && idx + 1 < items.len() {
            text.push('\n');
        }
    }
    text
}

fn statements(text: &str) -> Vec<Statement> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let group = line.strip_prefix('g')?.parse::<u16>().ok()?;
            Some(Statement::new(line, GroupKey::new(group), Span::line(idx + 1)))
        })
        .collect()
}

fn check(text: &str) -> Vec<stanza_lint_core::grouping::SpacingViolation> {
    let source = SourceText::new(text);
    detect(&statements(text), Origin::TopLevel, &source, &mut LineOps::new())
        .expect("anchors are in range")
}

fn fix(text: &str) -> String {
    let source = SourceText::new(text);
    let edits = check(text)
        .iter()
        .map(|v| plan_edit(v, &source).expect("planned").edit)
        .collect();
    apply_edits(text, edits).expect("edits apply").text
}

fn items() -> impl Strategy<Value = Vec<(u16, bool)>> {
    prop::collection::vec((0u16..3, any::<bool>()), 0..12)
}

proptest! {
    #[test]
    fn one_pass_fixes_everything(items in items()) {
        let fixed = fix(&render(&items));
        prop_assert!(check(&fixed).is_empty(), "left violations in {fixed:?}");
    }

    #[test]
    fn fixing_is_idempotent(items in items()) {
        let once = fix(&render(&items));
        prop_assert_eq!(fix(&once), once);
    }

    #[test]
    fn one_violation_per_anchor(items in items()) {
        let found = check(&render(&items));
        let mut anchors: Vec<usize> = found.iter().map(|v| v.anchor).collect();
        anchors.dedup();
        prop_assert_eq!(anchors.len(), found.len());
    }

    #[test]
    fn findings_match_decision_table(items in items()) {
        let text = render(&items);
        let source = SourceText::new(&text);
        let stmts = statements(&text);
        let found = check(&text);
        let expected: Vec<(usize, SpacingKind)> = stmts
            .windows(2)
            .filter_map(|pair| {
                let blank = source.is_blank(pair[0].anchor_line()).ok()?;
                classify(pair[0].same_group(&pair[1]), blank).map(|k| (pair[0].anchor_line(), k))
            })
            .collect();
        let actual: Vec<(usize, SpacingKind)> = found.iter().map(|v| (v.anchor, v.kind)).collect();
        prop_assert_eq!(actual, expected);
    }
}

#[test]
fn single_statement_never_violates() {
    assert!(check("g1\n").is_empty());
    assert!(check("").is_empty());
}

#[test]
fn scenario_missing_separator_fix() {
    // A and C in different groups, touching
    let fixed = fix("g0\ng2\n");
    insta::assert_snapshot!(fixed, @r"
    g0

    g2
    ");
}

#[test]
fn scenario_extra_separator_fix() {
    let fixed = fix("g0\n\ng0\n");
    insta::assert_snapshot!(fixed, @r"
    g0
    g0
    ");
}
