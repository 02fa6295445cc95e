//! Integration tests for CircuitGuard library

use circuitguard::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_validate_valid_blink() {
    let result = CircuitGuardCore::validate_file(
        &fixture_path("valid_blink.json"),
        &ValidationOptions::default(),
    );

    assert!(result.is_ok(), "Valid circuit should load successfully");

    let result = result.unwrap();
    assert!(
        result.is_valid(),
        "Valid circuit should have no violations: {:?}",
        result.violations()
    );
    assert_eq!(result.stats.components, 2);
    assert_eq!(result.stats.wires, 3);
    assert_eq!(result.stats.nets, 3);
    assert_eq!(result.file, Some(fixture_path("valid_blink.json")));
}

#[test]
fn test_validate_led_without_resistor() {
    let result = CircuitGuardCore::validate_file(
        &fixture_path("led_without_resistor.json"),
        &ValidationOptions::default(),
    )
    .expect("Should load circuit");

    assert!(!result.is_valid());
    assert_eq!(result.stats.errors, 1);

    let issue = &result.issues[0];
    assert_eq!(issue.rule_id, "led");
    assert_eq!(issue.component.as_deref(), Some("led-1"));
    assert_eq!(issue.terminal.as_deref(), Some("anode"));
    assert!(issue.message.contains("Red LED"));
    assert!(issue.message.contains("resistor"));
    assert!(issue.suggestion.is_some());
}

#[test]
fn test_validate_through_breadboard() {
    let result = CircuitGuardCore::validate_file(
        &fixture_path("protoboard_button.json"),
        &ValidationOptions::default(),
    )
    .expect("Should load circuit");

    assert!(result.is_valid(), "{:?}", result.violations());
}

#[test]
fn test_validate_broken_sensors() {
    let result = CircuitGuardCore::validate_file(
        &fixture_path("broken_sensors.json"),
        &ValidationOptions::default(),
    )
    .expect("Should load circuit");

    let violations = result.violations();
    assert_eq!(violations.len(), 2, "{:?}", violations);
    assert!(violations[0].starts_with("Sonar"));
    assert!(violations[0].contains("trig"));
    assert!(violations[1].starts_with("Arm"));
    assert!(violations[1].contains("5V"));
}

#[test]
fn test_strict_mode_flags_unknown_type() {
    let options = ValidationOptions {
        strict_unknown_types: true,
        ..Default::default()
    };
    let result = CircuitGuardCore::validate_file(&fixture_path("broken_sensors.json"), &options)
        .expect("Should load circuit");

    let violations = result.violations();
    assert_eq!(violations.len(), 3);
    assert!(violations[2].starts_with("Flux"));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let err = CircuitGuardCore::validate_file(
        &fixture_path("malformed.json"),
        &ValidationOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CircuitGuardError::Parse(_)));
}

#[test]
fn test_check_circuit_matches_core_result() {
    let snapshot = circuitguard::load_snapshot(&fixture_path("broken_sensors.json")).unwrap();
    let direct = check_circuit(&snapshot.components, &snapshot.wires);
    let via_core = CircuitGuardCore::validate(&snapshot, &ValidationOptions::default());
    assert_eq!(direct, via_core.violations());
}

#[test]
fn test_result_serializes_to_json() {
    let result = CircuitGuardCore::validate_file(
        &fixture_path("led_without_resistor.json"),
        &ValidationOptions::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["stats"]["errors"], 1);
    assert_eq!(json["issues"][0]["severity"], "Error");
    assert_eq!(json["issues"][0]["rule_id"], "led");
}
