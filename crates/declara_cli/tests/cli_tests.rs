use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn store_path() -> String {
    fixture_path("store")
}

/// Helper to create a Command for the declara binary
fn declara() -> Command {
    Command::cargo_bin("declara").expect("Failed to find declara binary")
}

// ============================================================================
// info command tests
// ============================================================================

#[test]
fn test_info_shows_schema_details() {
    declara()
        .arg("info")
        .arg("1879")
        .arg("--store")
        .arg(store_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Retenciones sobre honorarios"))
        .stdout(predicate::str::contains("Line width: 27"))
        .stdout(predicate::str::contains(".879"))
        .stdout(predicate::str::contains("C1"))
        .stdout(predicate::str::contains("H003"));
}

#[test]
fn test_info_composite_shows_record_key() {
    declara()
        .arg("info")
        .arg("1887")
        .arg("--store")
        .arg(store_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("composite"))
        .stdout(predicate::str::contains("Record key: C1"));
}

#[test]
fn test_info_unknown_code_fails() {
    declara()
        .arg("info")
        .arg("9999")
        .arg("--store")
        .arg(store_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("9999"));
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_clean_input_passes() {
    declara()
        .arg("validate")
        .arg("1879")
        .arg("--input")
        .arg(fixture_path("good_1879.csv"))
        .arg("--store")
        .arg(store_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("Rows examined:  2"));
}

#[test]
fn test_validate_bad_input_fails_with_findings() {
    declara()
        .arg("validate")
        .arg("1879")
        .arg("--input")
        .arg(fixture_path("bad_1879.csv"))
        .arg("--store")
        .arg(store_path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("RUT obligatorio en fila 2"))
        .stdout(predicate::str::contains("monto negativo en fila 2"))
        .stdout(predicate::str::contains("comuna desconocida en fila 2"));
}

#[test]
fn test_validate_json_output() {
    let output = declara()
        .arg("validate")
        .arg("1879")
        .arg("--input")
        .arg(fixture_path("good_1879.csv"))
        .arg("--store")
        .arg(store_path())
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let output_str = String::from_utf8_lossy(&output);
    let json_start = output_str.find('{').expect("Should contain JSON object");
    let parsed: serde_json::Value =
        serde_json::from_str(&output_str[json_start..]).expect("valid JSON");
    assert_eq!(parsed["valid"], serde_json::Value::Bool(true));
}

#[test]
fn test_validate_composite_sections() {
    declara()
        .arg("validate")
        .arg("1887")
        .arg("--section")
        .arg(format!("A={}", fixture_path("1887_section_a.csv")))
        .arg("--section")
        .arg(format!("B={}", fixture_path("1887_section_b.csv")))
        .arg("--store")
        .arg(store_path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("Rows examined:  2"));
}

#[test]
fn test_validate_requires_input_or_sections() {
    declara()
        .arg("validate")
        .arg("1879")
        .arg("--store")
        .arg(store_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_validate_rejects_both_input_kinds() {
    declara()
        .arg("validate")
        .arg("1879")
        .arg("--input")
        .arg(fixture_path("good_1879.csv"))
        .arg("--section")
        .arg(format!("A={}", fixture_path("1887_section_a.csv")))
        .arg("--store")
        .arg(store_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn test_validate_missing_input_file() {
    declara()
        .arg("validate")
        .arg("1879")
        .arg("--input")
        .arg("nonexistent.csv")
        .arg("--store")
        .arg(store_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent.csv"));
}

// ============================================================================
// generate command tests
// ============================================================================

#[test]
fn test_generate_writes_fixed_width_file() {
    let temp_dir = TempDir::new().unwrap();

    declara()
        .arg("generate")
        .arg("1879")
        .arg("--input")
        .arg(fixture_path("good_1879.csv"))
        .arg("--store")
        .arg(store_path())
        .arg("--output")
        .arg(temp_dir.path().to_str().unwrap())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("DJ1879_"), "name: {}", entries[0]);
    assert!(entries[0].ends_with(".879"), "name: {}", entries[0]);

    let content = fs::read_to_string(temp_dir.path().join(&entries[0])).unwrap();
    let lines: Vec<&str> = content.split_terminator('\n').collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.len() == 27), "lines: {lines:?}");
    assert_eq!(lines[0], "12345678-500000000150013101");
}

#[test]
fn test_generate_strict_withholds_file_on_failure() {
    let temp_dir = TempDir::new().unwrap();

    declara()
        .arg("generate")
        .arg("1879")
        .arg("--input")
        .arg(fixture_path("bad_1879.csv"))
        .arg("--store")
        .arg(store_path())
        .arg("--output")
        .arg(temp_dir.path().to_str().unwrap())
        .assert()
        .failure()
        .stdout(predicate::str::contains("no output file"));

    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_generate_no_strict_still_writes() {
    let temp_dir = TempDir::new().unwrap();

    declara()
        .arg("generate")
        .arg("1879")
        .arg("--input")
        .arg(fixture_path("bad_1879.csv"))
        .arg("--store")
        .arg(store_path())
        .arg("--output")
        .arg(temp_dir.path().to_str().unwrap())
        .arg("--no-strict")
        .assert()
        .failure() // validation still failed
        .stdout(predicate::str::contains("Wrote"));

    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
}

#[test]
fn test_generate_composite() {
    let temp_dir = TempDir::new().unwrap();

    declara()
        .arg("generate")
        .arg("1887")
        .arg("--section")
        .arg(format!("A={}", fixture_path("1887_section_a.csv")))
        .arg("--section")
        .arg(format!("B={}", fixture_path("1887_section_b.csv")))
        .arg("--store")
        .arg(store_path())
        .arg("--output")
        .arg(temp_dir.path().to_str().unwrap())
        .assert()
        .success();

    let entries: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert!(entries[0].ends_with(".887"));

    let content = fs::read_to_string(temp_dir.path().join(&entries[0])).unwrap();
    let lines: Vec<&str> = content.split_terminator('\n').collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "1-9       000012000000000000900000");
}

// ============================================================================
// General CLI tests
// ============================================================================

#[test]
fn test_cli_help() {
    declara()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_cli_version() {
    declara()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_generate_help() {
    declara()
        .arg("generate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("no-strict"))
        .stdout(predicate::str::contains("section"))
        .stdout(predicate::str::contains("output"));
}
