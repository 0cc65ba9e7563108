use super::*;

#[test]
fn test_content_digest_matches_known_md5_values() {
    assert_eq!(
        ContentDigest::md5_base64(b"").as_str(),
        "1B2M2Y8AsgTpgAmY7PhCfg=="
    );
    assert_eq!(
        ContentDigest::md5_base64(b"hello").as_str(),
        "XUFAKrxLKna5cZ2REBfFkg=="
    );
}

#[test]
fn test_state_artifact_digest_tracks_exact_bytes() {
    let key = WorkspaceName::new("networking-prod").unwrap();
    let a = StateArtifact::new(key.clone(), b"{\"version\":4}".to_vec());
    let b = StateArtifact::new(key, b"{\"version\":4}\n".to_vec());

    assert_eq!(a.digest(), &ContentDigest::md5_base64(a.body()));
    assert_ne!(a.digest(), b.digest());
    assert_eq!(a.len(), 13);
    assert!(!a.is_empty());
}

#[test]
fn test_secret_types_redact_debug_output() {
    let secret = SecretValue::new("super-salt");
    let token = ApiToken::new("tfc-token").unwrap();

    assert!(!format!("{secret:?}").contains("super-salt"));
    assert!(!format!("{token:?}").contains("tfc-token"));
    assert_eq!(token.bearer(), "Bearer tfc-token");
}

#[test]
fn test_api_token_rejects_empty() {
    assert!(ApiToken::new("").is_none());
}

#[test]
fn test_download_url_debug_hides_signed_path() {
    let url = DownloadUrl::new("https://archivist.terraform.io/v1/object/secret-token").unwrap();
    let rendered = format!("{url:?}");

    assert!(rendered.contains("archivist.terraform.io"));
    assert!(!rendered.contains("secret-token"));
}

#[test]
fn test_task_result_document_shape() {
    let result = TaskResult::failed("boom");
    let json = serde_json::to_value(result.to_document()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "data": {
                "type": "task-result",
                "attributes": { "status": "failed", "message": "boom" }
            }
        })
    );
}

#[test]
fn test_task_result_status_display_is_lowercase() {
    assert_eq!(TaskResultStatus::Running.to_string(), "running");
    assert_eq!(TaskResultStatus::Passed.to_string(), "passed");
    assert_eq!(TaskResultStatus::Failed.to_string(), "failed");
}
