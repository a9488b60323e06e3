//! Integration tests for the process-wide registry and its helpers.
//!
//! These tests share one registry, so every test clears it first and runs
//! serially.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use gherkin_runner::{execution, given, registry, then, when};
use serial_test::serial;

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap_or_else(|err| panic!("failed to build runtime: {err}"));
    runtime.block_on(future)
}

fn run(feature: &str, scenario: &str) -> Result<(), execution::ExecutionError> {
    block_on(execution::execute_scenario(
        registry::global(),
        feature,
        scenario,
    ))
}

fn parse_capture(value: Option<&str>) -> Result<i64, gherkin_runner::StepError> {
    value
        .unwrap_or_default()
        .parse()
        .map_err(|err| gherkin_runner::StepError::new(format!("not an integer: {err}")))
}

#[test]
#[serial]
fn definitions_registered_once_serve_many_feature_documents() {
    registry::global().clear();
    let total = Arc::new(AtomicI64::new(0));

    let state = Arc::clone(&total);
    given("a calculator", move |_args| {
        state.store(0, Ordering::Relaxed);
        Ok(())
    });
    let state = Arc::clone(&total);
    when("I add {int}", move |args| {
        let value = parse_capture(args.capture(0))?;
        state.fetch_add(value, Ordering::Relaxed);
        Ok(())
    });
    let state = Arc::clone(&total);
    then("the total is {int}", move |args| {
        let expected = parse_capture(args.capture(0))?;
        let actual = state.load(Ordering::Relaxed);
        if actual == expected {
            Ok(())
        } else {
            Err(format!("expected {expected}, got {actual}").into())
        }
    });

    let first = "\
Feature: Sums
Background:
    Given a calculator
Scenario: Small numbers
    When I add 2
    When I add 3
    Then the total is 5";
    let second = "\
Feature: More sums
Background:
    Given a calculator
Scenario: Negative numbers
    When I add -7
    Then the total is -7";

    assert!(run(first, "Small numbers").is_ok());
    assert!(run(second, "Negative numbers").is_ok());
    registry::global().clear();
}

#[test]
#[serial]
fn clear_isolates_subsequent_runs() {
    registry::global().clear();
    given("an ephemeral step", |_args| Ok(()));

    let feature = "Feature: F\nScenario: S\nGiven an ephemeral step";
    assert!(run(feature, "S").is_ok());

    registry::global().clear();
    let err = match run(feature, "S") {
        Err(err) => err,
        Ok(()) => panic!("cleared registry should no longer match"),
    };
    assert!(err.to_string().contains("an ephemeral step"));
}

#[test]
#[serial]
fn helpers_register_in_first_wins_order() {
    registry::global().clear();
    let chosen = Arc::new(AtomicI64::new(0));

    let state = Arc::clone(&chosen);
    given("overlapping {int}", move |_args| {
        state.store(1, Ordering::Relaxed);
        Ok(())
    });
    let state = Arc::clone(&chosen);
    given("overlapping {word}", move |_args| {
        state.store(2, Ordering::Relaxed);
        Ok(())
    });

    let feature = "Feature: F\nScenario: S\nGiven overlapping 42";
    assert!(run(feature, "S").is_ok());
    assert_eq!(chosen.load(Ordering::Relaxed), 1);
    registry::global().clear();
}

#[test]
#[serial]
#[should_panic(expected = "invalid step pattern")]
fn helpers_panic_on_invalid_patterns() {
    registry::global().clear();
    given("broken (", |_args| Ok(()));
}
