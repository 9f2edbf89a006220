//! Integration tests for the srclint binary.
//!
//! Documents here only use URLs that fail before any network traffic, so the
//! tests run offline.

use std::process::{Command, Output};
use tempfile::TempDir;

/// Create a temporary directory holding `conandata.yml`.
fn create_test_env(document: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(temp_dir.path().join("conandata.yml"), document).unwrap();
    temp_dir
}

fn srclint(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_srclint"))
        .args(args)
        .output()
        .expect("Failed to run srclint")
}

const FTP_DOCUMENT: &str = r#"
sources:
  "1.0":
    url: "ftp://example.invalid/pkg-1.0.tar.gz"
    sha256: "aaaa"
"#;

#[test]
fn test_findings_do_not_fail_the_run() {
    let env = create_test_env(FTP_DOCUMENT);
    let output = srclint(&[env.path().to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unknown url scheme ftp://example.invalid/pkg-1.0.tar.gz"));
    assert!(stdout.contains("url ftp://example.invalid/pkg-1.0.tar.gz is not available"));
}

#[test]
fn test_strict_mode_fails_on_errors() {
    let env = create_test_env(FTP_DOCUMENT);
    let output = srclint(&[env.path().to_str().unwrap(), "--strict"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_json_output() {
    let env = create_test_env(FTP_DOCUMENT);
    let document = env.path().join("conandata.yml");
    let output = srclint(&[document.to_str().unwrap(), "--format", "json"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let kinds: Vec<String> = stdout
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["kind"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(kinds, vec!["unknown_scheme", "unreachable_url"]);
}

#[test]
fn test_missing_document_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = srclint(&[temp_dir.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_malformed_document_fails() {
    let env = create_test_env("patches: {}\n");
    let output = srclint(&[env.path().to_str().unwrap()]);
    assert!(!output.status.success());
}
