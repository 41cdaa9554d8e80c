//! Manifest loading and validation tests against on-disk files.

use std::io::Write;
use std::path::Path;

use sls_config::{ManifestError, ServiceManifest};
use tempfile::NamedTempFile;

fn write_manifest(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn missing_file_reports_not_found() {
    let result = ServiceManifest::from_file(Path::new("/nonexistent/service.yml"));
    assert!(matches!(result, Err(ManifestError::NotFound(_))));
}

#[test]
fn malformed_yaml_reports_parse_error() {
    let file = write_manifest("service: [unclosed");
    let result = ServiceManifest::from_file(file.path());
    assert!(matches!(result, Err(ManifestError::Parse(_))));
}

#[test]
fn handler_required_per_function() {
    let file = write_manifest(
        r#"
service: orders
functions:
  create:
    memorySize: 512
"#,
    );

    let err = ServiceManifest::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ManifestError::Validation(_)));
    assert!(err.to_string().contains("handler"));
}

#[test]
fn provider_bounds_checked() {
    let file = write_manifest(
        r#"
service: orders
provider:
  memorySize: 20480
functions: {}
"#,
    );

    let err = ServiceManifest::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("memorySize"));
}

#[test]
fn function_timeout_bounds_checked() {
    let file = write_manifest(
        r#"
service: orders
functions:
  slow:
    handler: orders.slow
    timeout: 0
"#,
    );

    let err = ServiceManifest::from_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("timeout"));
}

#[test]
fn manifest_without_functions_is_valid() {
    let file = write_manifest(
        r#"
service: orders
provider:
  runtime: nodejs20.x
"#,
    );

    let manifest = ServiceManifest::from_file(file.path()).unwrap();
    assert!(manifest.functions.is_empty());
}

#[test]
fn digest_matches_file_bytes() {
    let contents = "service: orders\nfunctions: {}\n";
    let file = write_manifest(contents);

    let manifest = ServiceManifest::from_file(file.path()).unwrap();
    let digest = manifest.source_digest.unwrap();

    // Stable hex sha-256, 64 chars
    assert_eq!(digest.len(), 64);
    let again = ServiceManifest::from_file(file.path()).unwrap();
    assert_eq!(again.source_digest.unwrap(), digest);
}
