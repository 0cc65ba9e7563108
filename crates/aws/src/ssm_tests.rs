use super::*;
use aws_sdk_ssm::config::{BehaviorVersion, Credentials, Region};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AMZ_JSON: &str = "application/x-amz-json-1.1";

fn resolver_for(server: &MockServer) -> SsmSecretResolver {
    let config = aws_sdk_ssm::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(server.uri())
        .build();
    SsmSecretResolver::new(Client::from_conf(config))
}

fn salt_name() -> SecretName {
    SecretName::new("/statesave/salt").unwrap()
}

#[tokio::test]
async fn test_resolve_reads_decrypted_parameter() {
    let server = MockServer::start().await;
    let body = json!({
        "Parameter": {
            "Name": "/statesave/salt",
            "Type": "SecureString",
            "Value": "s3cret-salt",
            "Version": 4
        }
    });

    Mock::given(method("POST"))
        .and(header("x-amz-target", "AmazonSSM.GetParameter"))
        .and(body_partial_json(
            json!({ "Name": "/statesave/salt", "WithDecryption": true }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), AMZ_JSON))
        .expect(2)
        .mount(&server)
        .await;

    let resolver = resolver_for(&server);
    let first = resolver.resolve(&salt_name()).await.unwrap();
    let second = resolver.resolve(&salt_name()).await.unwrap();

    assert_eq!(first.as_bytes(), b"s3cret-salt");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_missing_parameter_is_not_found() {
    let server = MockServer::start().await;
    let body = json!({ "__type": "ParameterNotFound", "message": "" });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(body.to_string(), AMZ_JSON))
        .mount(&server)
        .await;

    let err = resolver_for(&server)
        .resolve(&salt_name())
        .await
        .unwrap_err();

    assert!(matches!(err, SecretError::NotFound { .. }));
}

#[tokio::test]
async fn test_access_denied_is_unavailable_without_leaking_value() {
    let server = MockServer::start().await;
    let body = json!({
        "__type": "AccessDeniedException",
        "message": "not authorized to perform ssm:GetParameter"
    });

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(body.to_string(), AMZ_JSON))
        .mount(&server)
        .await;

    let err = resolver_for(&server)
        .resolve(&salt_name())
        .await
        .unwrap_err();

    match err {
        SecretError::Unavailable { name, .. } => assert_eq!(name, salt_name()),
        other => panic!("expected unavailable, got {other:?}"),
    }
}
