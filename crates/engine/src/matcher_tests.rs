// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use dwell_core::test_support::{exact_rule, wildcard_rule};

#[yare::parameterized(
    dash_shipped    = { "Complete - Shipped", true },
    lowercase       = { "complete - done",    true },
    upper           = { "COMPLETE - QA",      true },
    suffix_only     = { "Almost Complete",    false },
    no_space        = { "Completed",          false },
    empty           = { "",                   false },
)]
fn wildcard_prefix(stage: &str, expected: bool) {
    let rule = wildcard_rule("Delivery", "Complete *", "Fully Complete", "completeFlag");
    assert_eq!(rule_matches(&rule, "Delivery", stage), expected);
}

#[yare::parameterized(
    same       = { "Ready for Package Prep", false, true },
    case_diff  = { "ready for package prep", false, false },
    case_ok    = { "ready for package prep", true,  true },
    longer     = { "Ready for Package Prep 2", true, false },
)]
fn exact_match(stage: &str, case_insensitive: bool, expected: bool) {
    let mut rule = exact_rule("Designer", "Ready for Package Prep", "Package Prep", "packagePrepFlag");
    rule.case_insensitive = case_insensitive;
    assert_eq!(rule_matches(&rule, "Designer", stage), expected);
}

#[test]
fn wildcard_without_star_is_case_insensitive_equality() {
    let rule = wildcard_rule("B", "Done", "Done", "done");
    assert!(rule_matches(&rule, "B", "done"));
    assert!(!rule_matches(&rule, "B", "Done and dusted"));
}

#[test]
fn rules_are_scoped_to_their_board() {
    let rule = wildcard_rule("Delivery", "Complete *", "Complete", "completeFlag");
    assert!(!rule_matches(&rule, "Designer", "Complete - QA"));
}

#[test]
fn first_matching_rule_wins() {
    let rules = vec![
        exact_rule("B", "Other", "Other", "other"),
        wildcard_rule("B", "Complete *", "First", "first"),
        wildcard_rule("B", "Comp*", "Second", "second"),
    ];
    let hit = match_rule(&rules, "B", "Complete - QA").unwrap();
    assert_eq!(hit.flag_key, "first");

    let hit = match_rule(&rules, "B", "Compost").unwrap();
    assert_eq!(hit.flag_key, "second");
    assert!(match_rule(&rules, "B", "Backlog").is_none());
}
