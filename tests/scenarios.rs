//! End-to-end checks of a fixture package through `Checker`.
//!
//! In the fixture, a parameter named `r` can be an `io.Reader` and one named
//! `rc` can be an `io.ReadCloser`. Other parameter names cannot be
//! decoupled, except where a test says otherwise.

mod common;

use common::{fixture_checker, M};
use decouple::CheckOutcome;
use pretty_assertions::assert_eq;

const READ_SIG: &str = "func([]byte) (int, error)";
const CLOSE_SIG: &str = "func() error";

fn outcome() -> CheckOutcome {
    let outcome = fixture_checker(false).check();
    assert!(outcome.is_clean(), "failures: {:?}", outcome.failures);
    outcome
}

/// Parameter names reported for `function`, or `None` when it is absent
fn reported(outcome: &CheckOutcome, function: &str) -> Option<Vec<String>> {
    outcome
        .report(function)
        .map(|report| report.params.iter().map(|p| p.name.clone()).collect())
}

fn methods(outcome: &CheckOutcome, function: &str, param: &str) -> Vec<String> {
    let Some(report) = outcome.report(function) else {
        panic!("{function} not reported");
    };
    let Some(param_report) = report.param(param) else {
        panic!("{function} has no report for {param}");
    };
    param_report.methods.clone()
}

#[test]
fn test_readers() {
    let outcome = outcome();
    for function in [
        "F1", "F2", "F5", "F8", "F10", "F11", "F14", "F17", "F17b", "F20", "F25", "F27", "F28",
        "F29", "F31",
    ] {
        assert_eq!(
            reported(&outcome, function),
            Some(vec!["r".to_string()]),
            "{function}"
        );
        assert_eq!(methods(&outcome, function, "r"), vec!["Read"], "{function}");
    }
}

#[test]
fn test_read_closers() {
    let outcome = outcome();
    for function in ["F7", "F22", "F24"] {
        assert_eq!(
            reported(&outcome, function),
            Some(vec!["rc".to_string()]),
            "{function}"
        );
        let Some(rc) = outcome.report(function).and_then(|r| r.param("rc")) else {
            panic!("{function} has no rc");
        };
        assert_eq!(rc.methods, vec!["Close", "Read"]);
        assert_eq!(rc.signatures["Close"], CLOSE_SIG);
        assert_eq!(rc.signatures["Read"], READ_SIG);
    }
}

#[test]
fn test_functions_with_nothing_to_suggest_are_absent() {
    let outcome = outcome();
    for function in [
        "F3", "F4", "F6", "F9", "F12", "F15", "F16", "F18", "F19", "F21", "F23", "F26", "F30",
        "F32", "F33", "F34", "F36", "F37", "F38",
    ] {
        assert_eq!(reported(&outcome, function), None, "{function}");
    }
    // Methods whose only parameter is blank
    assert_eq!(reported(&outcome, "Read"), None);
}

#[test]
fn test_several_parameters_of_one_function() {
    let outcome = outcome();
    assert_eq!(
        reported(&outcome, "F13"),
        Some(vec!["ctx".to_string(), "r".to_string()])
    );
    let Some(report) = outcome.report("F13") else {
        panic!("F13 not reported");
    };
    let Some(ctx) = report.param("ctx") else {
        panic!("no ctx");
    };
    assert_eq!(ctx.methods, vec!["Done"]);
    assert_eq!(ctx.signatures["Done"], "func() <-chan struct{}");
    assert_eq!(ctx.interface, None);
    assert_eq!(methods(&outcome, "F13", "r"), vec!["Read"]);
}

#[test]
fn test_signature_of_read() {
    let outcome = outcome();
    let Some(r) = outcome.report("F1").and_then(|report| report.param("r")) else {
        panic!("F1 has no r");
    };
    assert_eq!(r.signatures.len(), 1);
    assert_eq!(r.signatures["Read"], READ_SIG);
}

#[test]
fn test_interface_parameter_narrowed() {
    let outcome = outcome();
    assert_eq!(methods(&outcome, "F29", "r"), vec!["Read"]);

    assert_eq!(reported(&outcome, "F35"), Some(vec!["x".to_string()]));
    let Some(x) = outcome.report("F35").and_then(|report| report.param("x")) else {
        panic!("F35 has no x");
    };
    assert_eq!(x.methods, vec!["foo"]);
    assert_eq!(x.signatures["foo"], "func()");
    // No declared interface has exactly {foo}
    assert_eq!(x.interface, None);
}

#[test]
fn test_suggested_names() {
    let outcome = outcome();
    let interface = |function: &str, param: &str| {
        outcome
            .report(function)
            .and_then(|report| report.param(param))
            .and_then(|p| p.interface.clone())
    };

    assert_eq!(interface("F1", "r"), Some("io.Reader".to_string()));
    assert_eq!(interface("F7", "rc"), Some("io.ReadCloser".to_string()));
    assert_eq!(interface("F13", "r"), Some("io.Reader".to_string()));
    assert_eq!(interface("F35", "x"), None);
}

#[test]
fn test_names_can_be_turned_off() {
    let outcome = fixture_checker(true).check();
    assert!(outcome
        .reports
        .iter()
        .flat_map(|report| &report.params)
        .all(|param| param.interface.is_none()));
    assert_eq!(reported(&outcome, "F1"), Some(vec!["r".to_string()]));
}

#[test]
fn test_reports_follow_declaration_order() {
    let outcome = outcome();
    let names: Vec<&str> = outcome
        .reports
        .iter()
        .map(|report| report.function.as_str())
        .collect();
    assert_eq!(names.first(), Some(&"F1"));
    assert_eq!(names.last(), Some(&"F35"));
    let position = |name: &str| names.iter().position(|n| *n == name);
    assert!(position("F7") < position("F13"));
    assert!(position("F13") < position("F22"));
    assert!(outcome.reports.iter().all(|report| report.package == M));
}

#[test]
fn test_index_built_from_reachable_packages() {
    let checker = fixture_checker(false);
    let names: Vec<&str> = checker.index().names().collect();
    assert!(names.contains(&"io.Reader"));
    assert!(names.contains(&"context.Context"));
    assert!(names.contains(&"fmt.Stringer"));
    assert!(!names.iter().any(|name| name.starts_with("internal/")));
}
