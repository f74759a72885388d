//! Round-trip tests for GenerationRequest serialization
//!
//! Tests that a request survives save/load and that serialization is deterministic.

use restgate_ir::{FileDefinition, GenerationRequest, IrError, MessageDefinition, MethodDefinition, ServiceDefinition};
use tempfile::TempDir;

fn create_sample_request() -> GenerationRequest {
    GenerationRequest {
        files: vec![FileDefinition {
            name: "flavor.proto".to_string(),
            services: vec![ServiceDefinition {
                name: "FlavorApi".to_string(),
                methods: vec![MethodDefinition {
                    name: "CreateFlavor".to_string(),
                    input_type: "Flavor".to_string(),
                    output_type: "Result".to_string(),
                    mc2_api: Some("flavor,ActionManage,Key.Organization".to_string()),
                    summary: Some("Create a Flavor. Flavors define compute sizes.".to_string()),
                    ..Default::default()
                }],
            }],
            messages: vec![MessageDefinition {
                name: "Flavor".to_string(),
                generate_cud_test: true,
                ..Default::default()
            }],
        }],
        files_to_generate: vec![],
        parameter: Some("genapi".to_string()),
    }
}

#[test]
fn test_roundtrip_serialization() {
    let original = create_sample_request();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("nested").join("request.json");

    original.to_file(&file_path).expect("Failed to save request to file");
    let loaded = GenerationRequest::from_file(&file_path).expect("Failed to load request");

    assert_eq!(loaded.files.len(), 1);
    assert_eq!(loaded.files[0].name, "flavor.proto");
    let method = &loaded.files[0].services[0].methods[0];
    assert_eq!(method.annotation(), Some("flavor,ActionManage,Key.Organization"));
    assert!(!method.server_streaming);
    assert!(loaded.files[0].messages[0].generate_cud_test);
    assert_eq!(loaded.parameters(), vec!["genapi"]);

    let contents = std::fs::read_to_string(&file_path).expect("Failed to read saved request");
    assert!(contents.ends_with('\n'));
}

#[test]
fn test_serialization_is_deterministic() {
    let request = create_sample_request();
    let first = serde_json::to_string(&request).expect("serialize");
    let second = serde_json::to_string(&request).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn test_from_file_errors() {
    let missing = GenerationRequest::from_file(std::path::Path::new("does/not/exist.json"));
    assert!(matches!(missing, Err(IrError::Io(_))));

    let malformed = GenerationRequest::from_json_str("{ not json");
    assert!(matches!(malformed, Err(IrError::Json(_))));
}
