//! Tests for the NPM range grammar.

use assert_matches::assert_matches;
use simple_test_case::test_case;

use semantic_version::{InvalidSpec, InvalidVersion, Level, Spec, Syntax, version};

#[test_case(">=1.2.7", &["1.2.7", "1.2.8", "1.3.9"], &["1.2.6", "1.1.0"]; "greater_equal")]
#[test_case(">=1.2.7 <1.3.0", &["1.2.7", "1.2.8", "1.2.99"], &["1.2.6", "1.3.0", "1.1.0"]; "window")]
#[test_case("1.2.7 || >=1.2.9 <2.0.0", &["1.2.7", "1.2.9", "1.4.6"], &["1.2.8", "2.0.0"]; "alternatives")]
#[test_case(">1.2.3-alpha.3", &["1.2.3-alpha.7", "3.4.5"], &["1.2.3-alpha.3", "3.4.5-alpha.9"]; "greater_prerelease")]
#[test_case(">=1.2.3-alpha.3", &["1.2.3-alpha.3", "1.2.3-alpha.7", "3.4.5"], &["1.2.3-alpha.2", "3.4.5-alpha.9"]; "greater_equal_prerelease")]
#[test_case(">1.2.3-alpha <1.2.3-beta", &["1.2.3-alpha.0", "1.2.3-alpha.1"], &["1.2.3", "1.2.3-beta.0", "1.2.3-bravo"]; "prerelease_window")]
#[test_case("1.2.3 - 2.3.4", &["1.2.3", "1.2.99", "2.2.0", "2.3.4", "2.3.4+b42"], &["1.2.0", "1.2.3-alpha.1", "2.3.5"]; "hyphen")]
#[test_case("~1.2.3-beta.2", &["1.2.3-beta.2", "1.2.3-beta.4", "1.2.4"], &["1.2.4-beta.2", "1.3.0"]; "tilde_prerelease")]
#[test_case("^0.0.3", &["0.0.3"], &["0.0.4", "0.0.3-rc.1", "0.1.0"]; "caret_patch")]
#[test_case("^1.2.3-beta.2", &["1.2.3-beta.2", "1.2.3-beta.4", "1.9.0"], &["1.2.4-beta.2", "2.0.0", "1.2.3-beta.1"]; "caret_prerelease")]
#[test_case("*", &["0.0.0", "1.2.3", "1.2.3+build"], &["1.2.3-rc.1", "0.0.0-alpha"]; "any")]
#[test_case("", &["0.0.0", "1.2.3"], &["1.2.3-rc.1"]; "empty")]
#[test_case("1.2.3+build", &["1.2.3", "1.2.3+other"], &["1.2.4"]; "build_ignored")]
#[test_case("v1.2.3", &["1.2.3"], &["1.2.4"]; "v_prefix")]
#[test_case("<=1.2", &["1.2.9", "0.1.0"], &["1.3.0"]; "less_equal_partial")]
#[test]
fn npm_matches(expression: &str, matching: &[&str], failing: &[&str]) {
    let spec = Spec::npm(expression).expect("must parse");
    for input in matching {
        assert!(
            spec.matches(&version!(*input)),
            "'{input}' should match '{expression}'"
        );
    }
    for input in failing {
        assert!(
            !spec.matches(&version!(*input)),
            "'{input}' should not match '{expression}'"
        );
    }
}

// Basic
#[test_case(">1.2.3", ">1.2.3"; "greater")]
#[test_case("<1.2.3", "<1.2.3"; "less")]
#[test_case("<=1.2.3", "<=1.2.3"; "less_equal")]
// Hyphen ranges
#[test_case("1.2.3 - 2.3.4", ">=1.2.3 <=2.3.4"; "hyphen")]
#[test_case("1.2 - 2.3.4", ">=1.2.0 <=2.3.4"; "hyphen_partial_low")]
#[test_case("1.2.3 - 2.3", ">=1.2.3 <2.4.0"; "hyphen_partial_minor")]
#[test_case("1.2.3 - 2", ">=1.2.3 <3"; "hyphen_partial_major")]
#[test_case("1.2.3    - 2", ">=1.2.3 <3"; "hyphen_spaces")]
#[test_case("1.2.3 - *", ">=1.2.3"; "hyphen_unbounded")]
// X-Ranges
#[test_case("*", ">=0.0.0"; "any")]
#[test_case(">=*", ">=0.0.0"; "greater_equal_any")]
#[test_case("1.x", ">=1.0.0 <2.0.0"; "major_x")]
#[test_case("1.2.x", ">=1.2.0 <1.3.0"; "minor_x")]
#[test_case("", "*"; "empty")]
#[test_case("x", "*"; "x")]
#[test_case("1", "1.x.x"; "major_only")]
#[test_case("1.x.x", ">=1.0.0 <2.0.0"; "major_x_x")]
#[test_case("1.2", "1.2.x"; "minor_only")]
// Partial comparisons
#[test_case(">=1", ">=1.0.0"; "greater_equal_major")]
#[test_case(">1", ">=2.0.0"; "greater_major")]
#[test_case(">1.2", ">=1.3.0"; "greater_minor")]
#[test_case("<1", "<1.0.0"; "less_major")]
// Tilde ranges
#[test_case("~1.2.3", ">=1.2.3 <1.3.0"; "tilde")]
#[test_case("~1.2", ">=1.2.0 <1.3.0"; "tilde_minor")]
#[test_case("~1", ">=1.0.0 <2.0.0"; "tilde_major")]
#[test_case("~0.2.3", ">=0.2.3 <0.3.0"; "tilde_zero")]
#[test_case("~0.2", ">=0.2.0 <0.3.0"; "tilde_zero_minor")]
#[test_case("~0", ">=0.0.0 <1.0.0"; "tilde_zero_major")]
#[test_case("~1.2.3-beta.2", ">=1.2.3-beta.2 <1.3.0"; "tilde_prerelease")]
#[test_case("~ 1.2.3", ">=1.2.3 <1.3.0"; "tilde_space")]
#[test_case("~    1.2.3", ">=1.2.3 <1.3.0"; "tilde_spaces")]
#[test_case("~>1.2.3", ">=1.2.3 <1.3.0"; "pessimistic")]
#[test_case("~> 1.2.3", ">=1.2.3 <1.3.0"; "pessimistic_space")]
// Caret ranges
#[test_case("^1.2.3", ">=1.2.3 <2.0.0"; "caret")]
#[test_case("^0.2.3", ">=0.2.3 <0.3.0"; "caret_zero")]
#[test_case("^0.0.3", ">=0.0.3 <0.0.4"; "caret_zero_zero")]
#[test_case("^1.2.3-beta.2", ">=1.2.3-beta.2 <2.0.0"; "caret_prerelease")]
#[test_case("^0.0.3-beta", ">=0.0.3-beta <0.0.4"; "caret_zero_prerelease")]
#[test_case("^1.2.x", ">=1.2.0 <2.0.0"; "caret_minor_x")]
#[test_case("^0.0.x", ">=0.0.0 <0.1.0"; "caret_zero_x")]
#[test_case("^0.0", ">=0.0.0 <0.1.0"; "caret_zero_minor")]
#[test_case("^1.x", ">=1.0.0 <2.0.0"; "caret_major_x")]
#[test_case("^0.x", ">=0.0.0 <1.0.0"; "caret_zero_major_x")]
#[test_case("^0", ">=0.0.0 <1.0.0"; "caret_zero_major")]
#[test_case("^ 1.2.3", ">=1.2.3 <2.0.0"; "caret_space")]
#[test_case("^   1.2.3", ">=1.2.3 <2.0.0"; "caret_spaces")]
// Whitespace
#[test_case(">= 1.2.3", ">=1.2.3"; "operator_space")]
#[test_case(">=\t1.2.3", ">=1.2.3"; "operator_tab")]
#[test_case(">=   1.2.3", ">=1.2.3"; "operator_spaces")]
#[test_case(">=1.2.3      <2.0.0", ">=1.2.3 <2.0.0"; "separator_spaces")]
#[test_case("   >=1.2.3 <2.0.0    ", ">=1.2.3 <2.0.0"; "padded")]
#[test_case(">= 1.2.3 <  2.0.0", ">=1.2.3 <2.0.0"; "mixed_spaces")]
#[test_case(">=1.2.3 < 2.0.0", ">=1.2.3 <2.0.0"; "second_operator_space")]
#[test_case(">= 1.2.3 < 2.0.0", ">=1.2.3 <2.0.0"; "both_operator_spaces")]
#[test_case("1.2.7 ||    >=1.2.9 <2.0.0", "1.2.7 || >=1.2.9 <2.0.0"; "alternative_spaces")]
#[test_case("1.2.7 ||    >= 1.2.9 < 2.0.0", "1.2.7 || >=1.2.9 <2.0.0"; "alternative_operator_spaces")]
// Equivalences
#[test_case("||", "*"; "empty_alternatives")]
#[test_case("=1.2.3", "1.2.3"; "explicit_equal")]
#[test_case("<2.0.0 >=1.2.3", ">=1.2.3 <2.0.0"; "order_independent")]
#[test_case("^1.2.3 || ^1.2.3", "^1.2.3"; "duplicate_alternatives")]
#[test]
fn npm_expansions(expression: &str, expanded: &str) {
    pretty_assertions::assert_eq!(
        Spec::npm(expression).expect("must parse"),
        Spec::npm(expanded).expect("must parse"),
    );
}

#[test_case("==0.1.2"; "double_equal")]
#[test_case(">>0.1.2"; "double_greater")]
#[test_case("> = 0.1.2"; "split_operator")]
#[test_case("<=>0.1.2"; "spaceship")]
#[test_case("~1.2.3beta"; "glued_prerelease")]
#[test_case("~=1.2.3"; "compatible")]
#[test_case("!0.1.2"; "bang")]
#[test_case("!=0.1.2"; "not_equal")]
#[test_case(">=1.2.3,<2.0.0"; "comma")]
#[test_case("1.2.3 -2.3.4"; "half_hyphen")]
#[test]
fn npm_invalid_syntax(expression: &str) {
    assert_matches!(
        Spec::npm(expression),
        Err(InvalidSpec::Syntax { syntax: Syntax::Npm, .. })
    );
}

#[test]
fn npm_invalid() {
    assert_matches!(Spec::npm(">01.02.03"), Err(InvalidSpec::Version { .. }));
    assert_matches!(Spec::npm("<*"), Err(InvalidSpec::Wildcard { .. }));
    assert_matches!(Spec::npm("^x"), Err(InvalidSpec::Wildcard { .. }));
    assert_matches!(Spec::npm("^1.2-rc.1"), Err(InvalidSpec::Incomplete { .. }));
}

#[test]
fn npm_differs_from_simple() {
    let npm = Spec::npm(">=1.2.3").unwrap();
    let simple = Spec::simple(">=1.2.3").unwrap();
    assert_ne!(npm, simple);

    let prerelease = version!("2.0.0-rc.1");
    assert!(simple.matches(&prerelease));
    assert!(!npm.matches(&prerelease));
}

#[test]
fn npm_hyphen_bounds_are_inclusive() {
    let spec = Spec::npm("1.2.3 - 2.3.4").unwrap();
    let candidates = ["1.2.2", "1.2.3", "2.3.4", "2.3.5"].map(|input| version!(input));
    pretty_assertions::assert_eq!(spec.select(&candidates), Some(&version!(2, 3, 4)));
    pretty_assertions::assert_eq!(spec.filter(&candidates).count(), 2);
}

#[test_case("^18446744073709551615.0.0", Level::Major; "caret")]
#[test_case("~1.18446744073709551615.0", Level::Minor; "tilde")]
#[test_case("^0.0.18446744073709551615", Level::Patch; "caret_patch")]
#[test_case("18446744073709551615.x", Level::Major; "major_x")]
#[test_case("1.2.3 - 1.18446744073709551615", Level::Minor; "hyphen_partial")]
#[test]
fn npm_rejects_unbounded_ceiling(expression: &str, level: Level) {
    assert_matches!(
        Spec::npm(expression),
        Err(InvalidSpec::Version { source: InvalidVersion::Overflow { component, .. }, .. }) if component == level
    );
}

#[test]
fn npm_prerelease_at_top_patch() {
    let spec = Spec::npm(">=1.2.18446744073709551615-rc.1").unwrap();
    assert!(spec.matches(&version!("1.2.18446744073709551615-rc.2")));
    assert!(spec.matches(&version!("1.2.18446744073709551615")));
    assert!(spec.matches(&version!("1.3.0")));
    assert!(!spec.matches(&version!("1.2.18446744073709551615-rc.0")));
    assert!(!spec.matches(&version!("1.3.0-alpha")));
}
