//! Integration tests for the XCL frontend and file-based import resolution

use std::fs;
use std::path::Path;

use xcl::cli::commands::parse_path;
use xcl::syntax::values::Value;

/// Test that all valid fixtures parse successfully
#[test]
fn test_valid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/valid");

    let mut seen = 0;
    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().map(|e| e == "xcl").unwrap_or(false) {
            seen += 1;
            let result = parse_path(&path.to_string_lossy());
            assert!(
                result.is_ok(),
                "Expected {} to parse successfully, got error: {}",
                path.display(),
                result.unwrap_err()
            );
        }
    }
    assert!(seen > 0, "No valid fixtures found");
}

/// Test that invalid fixtures produce errors
#[test]
fn test_invalid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/invalid");

    let mut seen = 0;
    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().map(|e| e == "xcl").unwrap_or(false) {
            seen += 1;
            assert!(
                parse_path(&path.to_string_lossy()).is_err(),
                "Expected {} to fail parsing",
                path.display()
            );
        }
    }
    assert!(seen > 0, "No invalid fixtures found");
}

/// Imports merge type declarations from the sibling file
#[test]
fn test_import_merges_sibling_document() {
    let doc = parse_path("tests/fixtures/valid/imports.xcl").unwrap();

    assert_eq!(doc.get("appName").and_then(Value::as_string), Some("demo"));

    // Binding using a type declared in the imported document
    match doc.get("level").unwrap() {
        Value::Enumeration(v) => {
            assert_eq!(v.type_name, "LogLevel");
            assert_eq!(v.name, "info");
            assert_eq!(v.index, 2);
        }
        other => panic!("expected enumeration value, got {other:?}"),
    }

    assert_eq!(doc.get("workers").and_then(Value::as_integer), Some(4));
}

/// Section defaults apply when a field is left out of the body
#[test]
fn test_section_defaults_through_document() {
    let doc = parse_path("tests/fixtures/valid/sections.xcl").unwrap();

    let web = doc.get("web").and_then(Value::as_section).unwrap();
    let server = match doc.resolve_type("Server").unwrap() {
        xcl::syntax::types::Type::Section(s) => s,
        other => panic!("expected section type, got {other:?}"),
    };

    assert_eq!(web.get(server, "port").unwrap().as_integer(), Some(443));
    assert_eq!(web.get(server, "tls").unwrap().as_boolean(), Some(true));
    // `host` was never set explicitly; the declared default answers.
    assert_eq!(web.get(server, "host").unwrap().as_string(), Some("0.0.0.0"));
}

/// Parse errors surface with file, line, and column context
#[test]
fn test_error_rendering_includes_location() {
    let err = parse_path("tests/fixtures/invalid/missing_equals.xcl").unwrap_err();
    assert!(err.message.contains("Unexpected token `8080` found at 1:10."));
    assert!(err.message.contains("missing_equals.xcl:1:10"));
}
